//! Run-length codec for one chunk raster (4096 bytes).
//!
//! # Stream Format
//!
//! ```text
//! ┌──────────────┬──────────────────────────────┐
//! │ header (u16) │ payload                      │
//! ├──────────────┼──────────────────────────────┤
//! │ 1ccc...c     │ 1 byte, repeated `c` times   │  constant run
//! │ 0ccc...c     │ `c` literal bytes            │  literal run
//! └──────────────┴──────────────────────────────┘
//!
//! header: little-endian, bit 15 = constant flag, bits 0..15 = count (≥ 1)
//! ```
//!
//! A well-formed stream decodes to exactly [`CHUNK_VOLUME`] bytes. Up to
//! three trailing bytes (buffer alignment padding) are ignored.

use crate::constants::CHUNK_VOLUME;
use crate::error::{Result, TerrainError};

const CONSTANT_FLAG: u16 = 0x8000;
const COUNT_MASK: u16 = 0x7FFF;

/// Shortest repetition emitted as a constant run.
const MIN_CONSTANT_RUN: usize = 3;

/// Trailing bytes tolerated after the last run.
const MAX_PADDING: usize = 3;

/// Encode a raster into a run-length stream.
pub fn compress(raster: &[u8]) -> Vec<u8> {
  let mut out = Vec::with_capacity(64);
  let mut literal_start = 0;
  let mut i = 0;

  while i < raster.len() {
    let value = raster[i];
    let mut run = 1;
    while i + run < raster.len() && raster[i + run] == value && run < COUNT_MASK as usize {
      run += 1;
    }

    if run >= MIN_CONSTANT_RUN {
      flush_literals(&mut out, &raster[literal_start..i]);
      push_header(&mut out, CONSTANT_FLAG | run as u16);
      out.push(value);
      i += run;
      literal_start = i;
    } else {
      i += run;
    }
  }
  flush_literals(&mut out, &raster[literal_start..]);

  out
}

fn flush_literals(out: &mut Vec<u8>, literals: &[u8]) {
  for chunk in literals.chunks(COUNT_MASK as usize) {
    push_header(out, chunk.len() as u16);
    out.extend_from_slice(chunk);
  }
}

#[inline]
fn push_header(out: &mut Vec<u8>, header: u16) {
  out.extend_from_slice(&header.to_le_bytes());
}

/// Decode a stream into a full chunk raster, validating every run.
pub fn decompress(stream: &[u8], out: &mut [u8; CHUNK_VOLUME]) -> Result<()> {
  let mut pos = 0;
  let mut written = 0;

  while written < CHUNK_VOLUME {
    if pos + 2 > stream.len() {
      return Err(TerrainError::corrupt(pos, "stream ends before chunk is filled"));
    }
    let header = u16::from_le_bytes([stream[pos], stream[pos + 1]]);
    let count = (header & COUNT_MASK) as usize;
    if count == 0 {
      return Err(TerrainError::corrupt(pos, "zero-length run"));
    }
    if written + count > CHUNK_VOLUME {
      return Err(TerrainError::corrupt(pos, "run overflows chunk"));
    }
    pos += 2;

    if header & CONSTANT_FLAG != 0 {
      let Some(&value) = stream.get(pos) else {
        return Err(TerrainError::corrupt(pos, "missing constant run value"));
      };
      out[written..written + count].fill(value);
      pos += 1;
    } else {
      let Some(literals) = stream.get(pos..pos + count) else {
        return Err(TerrainError::corrupt(pos, "truncated literal run"));
      };
      out[written..written + count].copy_from_slice(literals);
      pos += count;
    }
    written += count;
  }

  if stream.len() - pos > MAX_PADDING {
    return Err(TerrainError::corrupt(pos, "trailing bytes after chunk"));
  }
  Ok(())
}

/// Value of a stream that is a single constant run covering the whole chunk.
pub fn constant_value(stream: &[u8]) -> Option<u8> {
  if stream.len() != 3 {
    return None;
  }
  let header = u16::from_le_bytes([stream[0], stream[1]]);
  let full = CONSTANT_FLAG | CHUNK_VOLUME as u16;
  (header == full).then_some(stream[2])
}

#[cfg(test)]
#[path = "rle_test.rs"]
mod rle_test;
