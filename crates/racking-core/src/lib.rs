//! Mounting hardware estimation for solar panel racking arrays.
//!
//! Given panel rows, panel dimensions, a racking configuration and the rail
//! stock lengths on hand, [`Estimator`] works out rail cuts and splices,
//! brackets, clamps and optional per-row deadload.

pub mod catalog;
mod estimator;
mod num;
pub mod preview;
mod types;
pub mod validate;

pub use estimator::{
    deadload, estimate, row_deadload, row_geometry, row_mounts, select_rails,
    CombinationsWithReplacement, Estimator, RailOptimizer, RowGeometry, TRUSS_FOOTPRINT_OFFSET,
};
pub use types::*;
