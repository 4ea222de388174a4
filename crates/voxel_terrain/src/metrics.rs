//! Engine-agnostic metrics collection for chunk builds.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use voxel_terrain::metrics::{BuildMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // Record a finished build:
//! metrics.record_build(level, build_time_us, triangle_count, truncated);
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::constants::MAX_DETAIL_LEVEL;
use crate::task_queue::BuildCompletion;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a new rolling window with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Iterate over values (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Get the most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
    /// Compute the sum of all values.
    pub fn sum(&self) -> T {
        self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
    }
}

impl RollingWindow<u64> {
    /// Compute the average of all values.
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    /// Get min and max values.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = *self.buffer.iter().min()?;
        let max = *self.buffer.iter().max()?;
        Some((min, max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128)
    }
}

/// Chunk build statistics.
#[derive(Debug, Clone)]
pub struct BuildMetrics {
    /// Builds per detail level (index = level).
    pub builds_per_level: [u64; MAX_DETAIL_LEVEL as usize + 1],

    // Timing
    /// Rolling window of build times in microseconds.
    pub build_timings: RollingWindow<u64>,
    /// Rolling window of emitted triangle counts.
    pub triangle_counts: RollingWindow<u64>,
    /// Last build time in microseconds.
    pub last_build_us: u64,

    // Outcomes
    /// Builds that hit the triangle cap.
    pub truncated_builds: u64,
    /// Builds that returned an error.
    pub failed_builds: u64,
    /// Total chunks built this session.
    pub total_chunks_built: u64,
}

impl Default for BuildMetrics {
    fn default() -> Self {
        Self {
            builds_per_level: [0; MAX_DETAIL_LEVEL as usize + 1],
            build_timings: RollingWindow::new(128),
            triangle_counts: RollingWindow::new(128),
            last_build_us: 0,
            truncated_builds: 0,
            failed_builds: 0,
            total_chunks_built: 0,
        }
    }
}

impl BuildMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the rolling windows and counters.
    pub fn reset(&mut self) {
        self.builds_per_level.fill(0);
        self.build_timings.clear();
        self.triangle_counts.clear();
        self.last_build_us = 0;
        self.truncated_builds = 0;
        self.failed_builds = 0;
        // total_chunks_built is cumulative
    }

    /// Record a successful build.
    pub fn record_build(&mut self, level: u32, timing_us: u64, triangles: usize, truncated: bool) {
        if !is_enabled() {
            return;
        }

        let level_idx = (level as usize).min(MAX_DETAIL_LEVEL as usize);
        self.builds_per_level[level_idx] += 1;
        self.build_timings.push(timing_us);
        self.triangle_counts.push(triangles as u64);
        self.last_build_us = timing_us;
        if truncated {
            self.truncated_builds += 1;
        }
        self.total_chunks_built += 1;
    }

    /// Record a build that failed.
    pub fn record_failure(&mut self) {
        if is_enabled() {
            self.failed_builds += 1;
        }
    }

    pub fn record_completion(&mut self, completion: &BuildCompletion) {
        match &completion.result {
            Ok(built) => self.record_build(
                completion.level,
                completion.build_time_us,
                built.mesh.triangle_count(),
                built.mesh.is_truncated(),
            ),
            Err(_) => self.record_failure(),
        }
    }

    /// Get average build timing in microseconds.
    pub fn avg_build_timing_us(&self) -> f64 {
        self.build_timings.average()
    }

    /// Get average triangle count per build.
    pub fn avg_triangles(&self) -> f64 {
        self.triangle_counts.average()
    }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_window() {
        let mut window = RollingWindow::new(3);
        assert!(window.is_empty());

        window.push(10u64);
        window.push(20);
        window.push(30);
        assert_eq!(window.len(), 3);
        assert_eq!(window.sum(), 60);
        assert_eq!(window.average(), 20.0);

        // Push one more, oldest should be evicted
        window.push(40);
        assert_eq!(window.len(), 3);
        assert_eq!(window.sum(), 90);
        assert_eq!(window.min_max(), Some((20, 40)));
    }

    #[test]
    fn test_build_recording() {
        let mut metrics = BuildMetrics::new();

        metrics.record_build(0, 1000, 512, false);
        metrics.record_build(2, 3000, 10240, true);
        metrics.record_failure();

        assert_eq!(metrics.builds_per_level[0], 1);
        assert_eq!(metrics.builds_per_level[2], 1);
        assert_eq!(metrics.truncated_builds, 1);
        assert_eq!(metrics.failed_builds, 1);
        assert_eq!(metrics.total_chunks_built, 2);
        assert_eq!(metrics.avg_build_timing_us(), 2000.0);
        assert_eq!(metrics.last_build_us, 3000);

        metrics.reset();
        assert!(metrics.build_timings.is_empty());
        assert_eq!(metrics.total_chunks_built, 2);
    }
}
