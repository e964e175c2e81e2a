//! VoxelizationEngine - caller-owned voxelization state for one mesh.
//!
//! Holds the mesh BVH, the scan configuration and the cells of the last pass.
//! Several engines can share one BVH through [`VoxelizationEngine::from_bvh`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use web_time::Instant;

use crate::bounds::DAabb3;
use crate::bvh::MeshBvh;
use crate::cells::{CellContainer, CellSink};
use crate::error::VoxelizeError;
use crate::mesh::TriangleMesh;
use crate::metrics::VoxelMetrics;
use crate::scan::{self, CancelToken, ScanConfig, ScanStats, ScanVolume};

// =============================================================================
// EngineId - unique identifier
// =============================================================================

/// Atomic counter for generating unique EngineIds.
static ENGINE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque engine identifier, unique within the process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EngineId(u64);

impl EngineId {
    pub fn new() -> Self {
        Self(ENGINE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for EngineId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// VoxelizationEngine
// =============================================================================

/// Voxelizes navigable regions of one mesh.
///
/// ```ignore
/// let mut engine = VoxelizationEngine::new(&room_mesh, ScanConfig::default())?;
/// let cells = engine.voxelize(&navigable, 0.05)?;
/// renderer.draw(build_cell_mesh(cells));
/// ```
pub struct VoxelizationEngine {
    id: EngineId,
    bvh: Arc<MeshBvh>,
    config: ScanConfig,
    cells: CellContainer,
    last_volume: Option<ScanVolume>,
    last_stats: Option<ScanStats>,
    metrics: VoxelMetrics,
}

impl VoxelizationEngine {
    /// Build the mesh BVH and an engine around it.
    ///
    /// Mesh problems surface here as [`VoxelizeError::Geometry`], before any scan.
    pub fn new(mesh: &TriangleMesh, config: ScanConfig) -> Result<Self, VoxelizeError> {
        let start = Instant::now();
        let bvh = MeshBvh::build(mesh)?;
        let build_us = start.elapsed().as_micros() as u64;

        let mut engine = Self::from_bvh(Arc::new(bvh), config);
        engine.metrics.record_bvh_build(build_us);
        Ok(engine)
    }

    /// Engine over an existing, possibly shared, BVH.
    pub fn from_bvh(bvh: Arc<MeshBvh>, config: ScanConfig) -> Self {
        Self {
            id: EngineId::new(),
            bvh,
            config,
            cells: CellContainer::default(),
            last_volume: None,
            last_stats: None,
            metrics: VoxelMetrics::new(),
        }
    }

    /// Voxelize `region` at `resolution`, replacing the previous pass.
    ///
    /// On error the container is left empty and no effective resolution is
    /// reported.
    pub fn voxelize(
        &mut self,
        region: &DAabb3,
        resolution: f64,
    ) -> Result<&CellContainer, VoxelizeError> {
        self.run(region, resolution, None)
    }

    /// Like [`voxelize`](Self::voxelize), stopping with
    /// [`VoxelizeError::Cancelled`] once `cancel` is tripped.
    pub fn voxelize_with_cancel(
        &mut self,
        region: &DAabb3,
        resolution: f64,
        cancel: &CancelToken,
    ) -> Result<&CellContainer, VoxelizeError> {
        self.run(region, resolution, Some(cancel))
    }

    #[tracing::instrument(skip_all, fields(engine = self.id.raw(), resolution = resolution))]
    fn run(
        &mut self,
        region: &DAabb3,
        resolution: f64,
        cancel: Option<&CancelToken>,
    ) -> Result<&CellContainer, VoxelizeError> {
        self.cells.clear();
        self.cells.set_unit_size(resolution);
        self.last_volume = None;
        self.last_stats = None;

        match self.scan_into_cells(region, resolution, cancel) {
            Ok((volume, stats)) => {
                tracing::debug!(
                    cells = stats.cells_emitted,
                    effective_resolution = volume.effective_resolution,
                    scan_us = stats.scan_us,
                    "voxelization pass complete"
                );
                self.metrics.record_pass(&stats, volume.effective_resolution);
                self.last_volume = Some(volume);
                self.last_stats = Some(stats);
                Ok(&self.cells)
            }
            Err(err) => {
                self.cells.clear();
                self.metrics.record_failure();
                tracing::debug!(error = %err, "voxelization pass failed");
                Err(err)
            }
        }
    }

    fn scan_into_cells(
        &mut self,
        region: &DAabb3,
        resolution: f64,
        cancel: Option<&CancelToken>,
    ) -> Result<(ScanVolume, ScanStats), VoxelizeError> {
        let volume = ScanVolume::plan(region, resolution, &self.config)?;
        volume.check_limits(&self.config.budget)?;
        let stats = scan::scan(
            self.bvh.as_ref(),
            &volume,
            &self.config.budget,
            cancel,
            &mut self.cells,
        )?;
        Ok((volume, stats))
    }

    /// Cells of the last pass (empty after an error).
    pub fn cells(&self) -> &CellContainer {
        &self.cells
    }

    /// Move the cells out, leaving an empty container behind.
    ///
    /// The pass description goes with them: [`Self::effective_resolution`],
    /// [`Self::last_volume`] and [`Self::last_stats`] read `None` afterwards.
    /// Read those first if the caller needs them alongside the cells.
    pub fn take_cells(&mut self) -> CellContainer {
        let unit_size = self.cells.unit_size();
        self.last_volume = None;
        self.last_stats = None;
        std::mem::replace(&mut self.cells, CellContainer::new(unit_size))
    }

    /// Edge length of the cells of the last successful pass.
    ///
    /// At or below the requested resolution; `None` before the first pass and
    /// after a failed one.
    pub fn effective_resolution(&self) -> Option<f64> {
        self.last_volume.map(|volume| volume.effective_resolution)
    }

    /// Plan of the last successful pass.
    pub fn last_volume(&self) -> Option<&ScanVolume> {
        self.last_volume.as_ref()
    }

    pub fn last_stats(&self) -> Option<&ScanStats> {
        self.last_stats.as_ref()
    }

    pub fn bvh(&self) -> &Arc<MeshBvh> {
        &self.bvh
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Replace the configuration used by later passes.
    pub fn set_config(&mut self, config: ScanConfig) {
        self.config = config;
    }

    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn metrics(&self) -> &VoxelMetrics {
        &self.metrics
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;
