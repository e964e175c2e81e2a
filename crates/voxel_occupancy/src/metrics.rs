//! Engine-agnostic metrics collection for voxelization passes.
//!
//! Recording is compiled in with the `metrics` feature and can be switched
//! off at runtime through [`COLLECT_METRICS`].
//!
//! # Usage
//!
//! ```ignore
//! use voxel_occupancy::metrics::{VoxelMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // The engine records every pass:
//! engine.voxelize(&region, 0.05)?;
//! println!("avg scan: {:.1}us", engine.metrics().avg_scan_timing_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::scan::ScanStats;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Scan timings kept for averaging.
pub const SCAN_TIMING_WINDOW: usize = 64;

/// Compiled with `metrics` and switched on at runtime.
#[inline]
pub fn is_enabled() -> bool {
    cfg!(feature = "metrics") && COLLECT_METRICS.load(Ordering::Relaxed)
}

/// Most recent scan durations in microseconds, oldest evicted first.
#[derive(Debug, Clone)]
pub struct ScanTimings {
    recent_us: VecDeque<u64>,
}

impl Default for ScanTimings {
    fn default() -> Self {
        Self {
            recent_us: VecDeque::with_capacity(SCAN_TIMING_WINDOW),
        }
    }
}

impl ScanTimings {
    pub fn push(&mut self, scan_us: u64) {
        if self.recent_us.len() == SCAN_TIMING_WINDOW {
            self.recent_us.pop_front();
        }
        self.recent_us.push_back(scan_us);
    }

    /// Mean over the window, 0 when nothing was recorded.
    pub fn average_us(&self) -> f64 {
        if self.recent_us.is_empty() {
            return 0.0;
        }
        self.recent_us.iter().sum::<u64>() as f64 / self.recent_us.len() as f64
    }

    pub fn last_us(&self) -> Option<u64> {
        self.recent_us.back().copied()
    }

    pub fn len(&self) -> usize {
        self.recent_us.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent_us.is_empty()
    }

    pub fn clear(&mut self) {
        self.recent_us.clear();
    }
}

/// Statistics accumulated over the passes of one engine.
#[derive(Debug, Clone, Default)]
pub struct VoxelMetrics {
    // Timing
    /// Recent scan times.
    pub scan_timings: ScanTimings,
    /// Last BVH build time in microseconds.
    pub bvh_build_us: u64,

    // Totals (cumulative)
    /// Completed passes.
    pub passes: u64,
    /// Passes that returned an error (limits, cancellation).
    pub failed_passes: u64,
    /// Occupancy queries across all completed passes.
    pub occupancy_tests: u64,
    /// Pruned regions across all completed passes.
    pub pruned: u64,
    /// Cells emitted across all completed passes.
    pub cells_emitted: u64,

    // Last pass snapshot
    /// Cells in the last completed pass.
    pub last_cells: usize,
    /// Effective resolution of the last completed pass.
    pub last_effective_resolution: f64,
}

impl VoxelMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the timing windows and the last-pass snapshot.
    pub fn reset(&mut self) {
        self.scan_timings.clear();
        self.bvh_build_us = 0;
        self.last_cells = 0;
        self.last_effective_resolution = 0.0;
        // Totals are cumulative
    }

    /// Record a BVH build timing.
    pub fn record_bvh_build(&mut self, timing_us: u64) {
        if is_enabled() {
            self.bvh_build_us = timing_us;
        }
    }

    /// Record a completed pass.
    pub fn record_pass(&mut self, stats: &ScanStats, effective_resolution: f64) {
        if !is_enabled() {
            return;
        }

        self.scan_timings.push(stats.scan_us);
        self.passes += 1;
        self.occupancy_tests += stats.occupancy_tests as u64;
        self.pruned += stats.pruned as u64;
        self.cells_emitted += stats.cells_emitted as u64;
        self.last_cells = stats.cells_emitted;
        self.last_effective_resolution = effective_resolution;
    }

    /// Record a pass that returned an error.
    pub fn record_failure(&mut self) {
        if is_enabled() {
            self.failed_passes += 1;
        }
    }

    /// Get average scan timing in microseconds.
    pub fn avg_scan_timing_us(&self) -> f64 {
        self.scan_timings.average_us()
    }

    /// Duration of the last completed scan.
    pub fn last_scan_us(&self) -> Option<u64> {
        self.scan_timings.last_us()
    }

    /// Average cells per completed pass.
    pub fn avg_cells_per_pass(&self) -> f64 {
        if self.passes == 0 {
            0.0
        } else {
            self.cells_emitted as f64 / self.passes as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_timings_window() {
        let mut timings = ScanTimings::default();
        assert!(timings.is_empty());
        assert_eq!(timings.average_us(), 0.0);
        assert_eq!(timings.last_us(), None);

        for us in 1..=SCAN_TIMING_WINDOW as u64 + 2 {
            timings.push(us);
        }

        // 1 and 2 were evicted
        assert_eq!(timings.len(), SCAN_TIMING_WINDOW);
        assert_eq!(timings.last_us(), Some(SCAN_TIMING_WINDOW as u64 + 2));
        assert_eq!(timings.average_us(), (3 + SCAN_TIMING_WINDOW as u64 + 2) as f64 / 2.0);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_record_pass() {
        let mut metrics = VoxelMetrics::new();
        let stats = ScanStats {
            occupancy_tests: 100,
            pruned: 60,
            cells_emitted: 30,
            scan_us: 500,
            ..Default::default()
        };

        metrics.record_pass(&stats, 0.375);
        metrics.record_pass(&stats, 0.375);
        metrics.record_failure();

        assert_eq!(metrics.passes, 2);
        assert_eq!(metrics.failed_passes, 1);
        assert_eq!(metrics.occupancy_tests, 200);
        assert_eq!(metrics.cells_emitted, 60);
        assert_eq!(metrics.avg_cells_per_pass(), 30.0);
        assert_eq!(metrics.avg_scan_timing_us(), 500.0);
        assert_eq!(metrics.last_scan_us(), Some(500));
        assert_eq!(metrics.last_effective_resolution, 0.375);

        metrics.reset();
        assert!(metrics.scan_timings.is_empty());
        assert_eq!(metrics.passes, 2);
    }

    #[cfg(not(feature = "metrics"))]
    #[test]
    fn test_disabled_records_nothing() {
        let mut metrics = VoxelMetrics::new();
        metrics.record_pass(&ScanStats::default(), 1.0);
        metrics.record_failure();
        assert_eq!(metrics.passes, 0);
        assert_eq!(metrics.failed_passes, 0);
    }
}
