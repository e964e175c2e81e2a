//! Region scanning: plan a cubic scan volume around the navigable region and
//! subdivide it top-down, keeping only occupied cells.
//!
//! - [`ScanConfig`] / [`ScanBudget`]: how the cube is sized and split, and the
//!   resource limits of a pass
//! - [`ScanVolume`]: validated plan for one pass (cube, depth, effective
//!   resolution)
//! - [`scan`]: the worklist-driven subdivision itself
//! - [`CancelToken`]: cooperative cancellation

mod budget;
mod cancel;
mod config;
mod scanner;
mod volume;

pub use budget::{ScanBudget, ScanStats};
pub use cancel::CancelToken;
pub use config::{ScanConfig, MAX_SUBDIVISIONS};
pub use scanner::scan;
pub use volume::ScanVolume;
