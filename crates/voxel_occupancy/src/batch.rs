//! Parallel and background voxelization over a shared BVH.
//!
//! # Flow
//!
//! ```text
//! Caller                            rayon pool
//! ┌────────────────┐
//! │ start(request) │──────────────► ┌──────────────────┐
//! └────────────────┘                │ plan + limits    │
//!                                   │ scan (cancelable)│
//! ┌────────────────┐                └────────┬─────────┘
//! │ poll()         │◄──────────────────────────┘ bounded(1)
//! └────────────────┘
//! ```
//!
//! Passes never share mutable state: each one owns its [`CellContainer`], and
//! the BVH is read-only.

use std::sync::Arc;

use crossbeam_channel::{self as channel, Receiver, TryRecvError};
use rayon::prelude::*;

use crate::bounds::DAabb3;
use crate::bvh::MeshBvh;
use crate::cells::CellContainer;
use crate::error::VoxelizeError;
use crate::occupancy::OccupancyTest;
use crate::scan::{self, CancelToken, ScanConfig, ScanStats, ScanVolume};

/// One pass to run: a navigable region at a resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanRequest {
	pub region: DAabb3,
	pub resolution: f64,
}

impl ScanRequest {
	pub fn new(region: DAabb3, resolution: f64) -> Self {
		Self { region, resolution }
	}
}

/// Owned result of one pass.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
	/// Occupied cells, unit size = requested resolution.
	pub cells: CellContainer,
	/// Edge length of the cells (at or below the requested resolution).
	pub effective_resolution: f64,
	pub stats: ScanStats,
	/// Plan the pass ran with.
	pub volume: ScanVolume,
}

/// Run one complete pass into a fresh container.
pub fn voxelize_once<O: OccupancyTest + ?Sized>(
	occupancy: &O,
	request: &ScanRequest,
	config: &ScanConfig,
	cancel: Option<&CancelToken>,
) -> Result<VoxelGrid, VoxelizeError> {
	let volume = ScanVolume::plan(&request.region, request.resolution, config)?;
	volume.check_limits(&config.budget)?;

	let mut cells = CellContainer::new(request.resolution);
	let stats = scan::scan(occupancy, &volume, &config.budget, cancel, &mut cells)?;

	Ok(VoxelGrid {
		cells,
		effective_resolution: volume.effective_resolution,
		stats,
		volume,
	})
}

/// Run independent passes in parallel over one BVH.
///
/// Results come back in request order; a failing request does not affect the
/// others.
#[tracing::instrument(skip_all, name = "batch::voxelize_batch", fields(requests = requests.len()))]
pub fn voxelize_batch(
	bvh: &MeshBvh,
	requests: &[ScanRequest],
	config: &ScanConfig,
) -> Vec<Result<VoxelGrid, VoxelizeError>> {
	requests
		.par_iter()
		.map(|request| voxelize_once(bvh, request, config, None))
		.collect()
}

/// Non-blocking single-pass voxelizer.
///
/// Runs one pass at a time on rayon's thread pool.
pub struct AsyncVoxelizer {
	bvh: Arc<MeshBvh>,
	config: ScanConfig,
	/// Receiver for pending result.
	receiver: Option<Receiver<Result<VoxelGrid, VoxelizeError>>>,
	/// Token of the running pass.
	cancel: Option<CancelToken>,
}

impl AsyncVoxelizer {
	pub fn new(bvh: Arc<MeshBvh>, config: ScanConfig) -> Self {
		Self {
			bvh,
			config,
			receiver: None,
			cancel: None,
		}
	}

	/// Check if a pass is running.
	pub fn is_busy(&self) -> bool {
		self.receiver.is_some()
	}

	/// Configuration for passes started after this call.
	pub fn set_config(&mut self, config: ScanConfig) {
		self.config = config;
	}

	/// Start a pass.
	///
	/// Returns `true` if started, `false` if already busy.
	pub fn start(&mut self, request: ScanRequest) -> bool {
		if self.is_busy() {
			return false;
		}

		let (sender, receiver) = channel::bounded(1);
		let cancel = CancelToken::new();
		self.receiver = Some(receiver);
		self.cancel = Some(cancel.clone());

		let bvh = Arc::clone(&self.bvh);
		let config = self.config.clone();
		rayon::spawn(move || {
			let result = voxelize_once(bvh.as_ref(), &request, &config, Some(&cancel));
			// Ignore send error (receiver dropped = cancelled)
			let _ = sender.send(result);
		});

		true
	}

	/// Poll for the result (non-blocking).
	///
	/// Returns `Some(result)` when the pass finished, `None` if still running
	/// or idle. A worker that went away without sending (it panicked) yields
	/// `Some(Err(VoxelizeError::PassLost))` once.
	pub fn poll(&mut self) -> Option<Result<VoxelGrid, VoxelizeError>> {
		let receiver = self.receiver.as_ref()?;

		let result = match receiver.try_recv() {
			Ok(result) => result,
			Err(TryRecvError::Empty) => return None,
			Err(TryRecvError::Disconnected) => {
				tracing::warn!("voxelization worker exited without a result");
				Err(VoxelizeError::PassLost)
			}
		};

		self.receiver = None;
		self.cancel = None;
		Some(result)
	}

	/// Stop the running pass and discard its result.
	pub fn cancel(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel.cancel();
		}
		self.receiver = None;
	}
}

impl Drop for AsyncVoxelizer {
	fn drop(&mut self) {
		self.cancel();
	}
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod batch_test;
