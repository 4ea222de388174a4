//! Benchmarks for chunk storage and meshing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{IVec3, Vec3};
use voxel_terrain::store::rle;
use voxel_terrain::{
  build_chunk, build_lod_chunk, index_to_coord, Block, BlockConfig, Channel, MeshConfig, CHUNK_SIZE,
  CHUNK_VOLUME,
};

/// Density of overlapping spheres, in voxels scaled to the i8 range.
fn spheres_density(p: IVec3) -> u8 {
  let spheres = [
    (Vec3::new(10.0, 16.0, 16.0), 8.0),
    (Vec3::new(22.0, 16.0, 16.0), 8.0),
    (Vec3::new(16.0, 10.0, 16.0), 6.0),
    (Vec3::new(16.0, 22.0, 16.0), 6.0),
    (Vec3::new(16.0, 16.0, 16.0), 10.0),
  ];
  let mut min_dist = f32::MAX;
  for (center, radius) in spheres {
    min_dist = min_dist.min((p.as_vec3() - center).length() - radius);
  }
  ((min_dist * 16.0).clamp(-127.0, 127.0) as i8) as u8
}

/// 2³-chunk block (32³ voxels) filled from `density`.
fn make_block(density: impl Fn(IVec3) -> u8) -> Block {
  let mut block = Block::new(BlockConfig::new(IVec3::splat(2)));
  let mut raster = [0u8; CHUNK_VOLUME];
  for i in 0..8 {
    let chunk = IVec3::new(i & 1, (i >> 1) & 1, i >> 2);
    for (idx, value) in raster.iter_mut().enumerate() {
      let (x, y, z) = index_to_coord(idx);
      *value = density(chunk * CHUNK_SIZE as i32 + IVec3::new(x as i32, y as i32, z as i32));
    }
    block
      .store_voxels(Channel::Density, 0, chunk, &raster, CHUNK_SIZE, CHUNK_SIZE * CHUNK_SIZE)
      .unwrap();
  }
  block
}

fn bench_rle(c: &mut Criterion) {
  let mut raster = [0u8; CHUNK_VOLUME];
  for (idx, value) in raster.iter_mut().enumerate() {
    let (x, y, z) = index_to_coord(idx);
    *value = spheres_density(IVec3::new(x as i32, y as i32, z as i32) + 8);
  }
  let stream = rle::compress(&raster);

  let mut group = c.benchmark_group("rle");
  group.bench_function("compress", |b| b.iter(|| rle::compress(black_box(&raster))));
  group.bench_function("decompress", |b| {
    let mut out = [0u8; CHUNK_VOLUME];
    b.iter(|| rle::decompress(black_box(&stream), &mut out).unwrap())
  });
  group.finish();
}

fn bench_build_chunk(c: &mut Criterion) {
  let snapshot = make_block(spheres_density).snapshot();
  let config = MeshConfig::default();

  c.bench_function("build_chunk (5 spheres, 16³)", |b| {
    b.iter(|| build_chunk(black_box(&snapshot), IVec3::ZERO, &config).unwrap())
  });
}

fn bench_build_lod_chunk(c: &mut Criterion) {
  let snapshot = make_block(spheres_density).snapshot();
  let mut group = c.benchmark_group("build_lod_chunk");

  for choose in [false, true] {
    let config = MeshConfig::default().with_choose_triangulation(choose);
    group.bench_with_input(
      BenchmarkId::new("level1", format!("choose={}", choose)),
      &choose,
      |b, _| b.iter(|| build_lod_chunk(black_box(&snapshot), IVec3::ZERO, 1, &config).unwrap()),
    );
  }

  group.finish();
}

criterion_group!(benches, bench_rle, bench_build_chunk, bench_build_lod_chunk);
criterion_main!(benches);
