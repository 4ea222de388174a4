use super::*;

fn decode(stream: &[u8]) -> Result<Vec<u8>> {
  let mut out = [0u8; CHUNK_VOLUME];
  decompress(stream, &mut out)?;
  Ok(out.to_vec())
}

#[test]
fn test_constant_chunk_is_three_bytes() {
  let raster = [0x7Fu8; CHUNK_VOLUME];
  let stream = compress(&raster);
  assert_eq!(stream, vec![0x00, 0x90, 0x7F]);
  assert_eq!(constant_value(&stream), Some(0x7F));
}

#[test]
fn test_roundtrip_mixed_raster() {
  let raster: Vec<u8> = (0..CHUNK_VOLUME)
    .map(|i| match i % 97 {
      0..=40 => 0x81,
      41..=42 => (i % 7) as u8,
      _ => (i / 13) as u8,
    })
    .collect();
  let stream = compress(&raster);
  assert!(stream.len() < CHUNK_VOLUME);
  assert_eq!(decode(&stream).unwrap(), raster);
  assert_eq!(constant_value(&stream), None);
}

#[test]
fn test_roundtrip_incompressible_raster() {
  let raster: Vec<u8> = (0..CHUNK_VOLUME).map(|i| (i * 31 % 251) as u8).collect();
  let stream = compress(&raster);
  assert_eq!(decode(&stream).unwrap(), raster);
}

#[test]
fn test_short_runs_stay_literal() {
  let mut raster = vec![5u8; CHUNK_VOLUME];
  raster[0] = 1;
  raster[1] = 1;
  raster[2] = 2;
  let stream = compress(&raster);
  // literal [1, 1, 2] then a constant run of 5s
  assert_eq!(&stream[..5], &[3, 0, 1, 1, 2]);
  assert_eq!(decode(&stream).unwrap(), raster);
}

#[test]
fn test_zero_run_is_corrupt() {
  let err = decode(&[0x00, 0x00, 0x7F]).unwrap_err();
  assert!(matches!(err, TerrainError::CorruptVoxelData { offset: 0, .. }));
}

#[test]
fn test_overflowing_run_is_corrupt() {
  // constant run of 4097
  let header = (0x8000u16 | 4097).to_le_bytes();
  let err = decode(&[header[0], header[1], 1]).unwrap_err();
  assert!(matches!(err, TerrainError::CorruptVoxelData { .. }));
}

#[test]
fn test_short_stream_is_corrupt() {
  let header = (0x8000u16 | 100).to_le_bytes();
  let err = decode(&[header[0], header[1], 1]).unwrap_err();
  assert!(matches!(err, TerrainError::CorruptVoxelData { offset: 3, .. }));
}

#[test]
fn test_truncated_literal_is_corrupt() {
  let header = 10u16.to_le_bytes();
  let err = decode(&[header[0], header[1], 1, 2, 3]).unwrap_err();
  assert!(matches!(err, TerrainError::CorruptVoxelData { offset: 2, .. }));
}

#[test]
fn test_alignment_padding_is_tolerated() {
  let mut stream = compress(&[9u8; CHUNK_VOLUME]);
  stream.push(0);
  assert_eq!(decode(&stream).unwrap(), vec![9u8; CHUNK_VOLUME]);

  stream.extend_from_slice(&[0, 0, 0]);
  let err = decode(&stream).unwrap_err();
  assert!(matches!(err, TerrainError::CorruptVoxelData { offset: 3, .. }));
}
