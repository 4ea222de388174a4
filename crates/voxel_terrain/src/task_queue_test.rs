use glam::Vec3;

use super::*;
use crate::error::TerrainError;
use crate::test_utils::{block_from_fn, odd_sphere};

fn sphere_snapshot() -> BlockSnapshot {
  block_from_fn(IVec3::splat(2), odd_sphere(Vec3::splat(16.0), 10.5)).snapshot()
}

#[test]
fn test_single_request() {
  let mut stage = BuildStage::new();

  let id = stage.enqueue(sphere_snapshot(), IVec3::ZERO, MeshConfig::default());
  assert_eq!(id, 0);
  assert_eq!(stage.pending_count(), 1);

  let processed = stage.tick();
  assert_eq!(processed, 1);
  assert_eq!(stage.pending_count(), 0);
  assert_eq!(stage.completed_count(), 1);

  let completions = stage.drain_completions();
  assert_eq!(completions.len(), 1);
  assert_eq!(completions[0].id, 0);
  let built = completions[0].result.as_ref().unwrap();
  assert!(!built.mesh.vertices.is_empty());
  assert_eq!(built.border.built_mask, 0);
  assert_eq!(built.border.interior_triangle_count as usize, built.mesh.triangle_count());
}

#[test]
fn test_multiple_requests() {
  let mut stage = BuildStage::new();
  let snapshot = sphere_snapshot();

  // all eight base chunks of the block
  for i in 0..8 {
    let chunk = IVec3::new(i & 1, (i >> 1) & 1, i >> 2);
    stage.enqueue(snapshot.clone(), chunk, MeshConfig::default());
  }

  assert_eq!(stage.pending_count(), 8);

  let processed = stage.tick();
  assert_eq!(processed, 8);
  assert_eq!(stage.completed_count(), 8);

  let completions = stage.drain_completions();
  let ids: Vec<u64> = completions.iter().map(|c| c.id).collect();
  assert_eq!(ids, (0..8).collect::<Vec<_>>());
  assert!(completions.iter().all(|c| c.result.is_ok()));
}

#[test]
fn test_lod_request() {
  let mut stage = BuildStage::new();
  stage.enqueue_lod(sphere_snapshot(), IVec3::ZERO, 1, Face::ALL_MASK, MeshConfig::default());
  stage.tick();

  let completions = stage.drain_completions();
  assert_eq!(completions[0].level, 1);
  let built = completions[0].result.as_ref().unwrap();
  assert_eq!(built.border.built_mask, Face::ALL_MASK);
  assert!(built.border.interior_triangle_count > 0);
}

#[test]
fn test_failed_build_is_reported() {
  let mut stage = BuildStage::new();
  stage.enqueue(sphere_snapshot(), IVec3::new(5, 0, 0), MeshConfig::default());
  stage.tick();

  let completions = stage.drain_completions();
  assert_eq!(
    completions[0].result.as_ref().unwrap_err(),
    &TerrainError::ChunkOutOfBounds { chunk: IVec3::new(5, 0, 0) }
  );
}

#[test]
fn test_sink_receives_completions() {
  let (sender, receiver) = crossbeam_channel::unbounded();
  let mut stage = BuildStage::new().with_sink(sender);

  stage.enqueue(sphere_snapshot(), IVec3::ZERO, MeshConfig::default());
  stage.enqueue(sphere_snapshot(), IVec3::X, MeshConfig::default());
  stage.tick();

  assert!(stage.is_idle());
  let mut ids: Vec<u64> = receiver.try_iter().map(|c| c.id).collect();
  ids.sort_unstable();
  assert_eq!(ids, vec![0, 1]);
}

#[test]
fn test_dropped_sink_falls_back_to_buffer() {
  let (sender, receiver) = crossbeam_channel::unbounded();
  drop(receiver);
  let mut stage = BuildStage::new().with_sink(sender);

  stage.enqueue(sphere_snapshot(), IVec3::ZERO, MeshConfig::default());
  stage.tick();
  assert_eq!(stage.completed_count(), 1);
}

#[test]
fn test_empty_tick() {
  let mut stage = BuildStage::new();
  assert!(stage.is_idle());

  let processed = stage.tick();
  assert_eq!(processed, 0);
  assert!(stage.is_idle());
}
