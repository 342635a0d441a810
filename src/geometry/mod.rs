//! Locations and the pairwise distance table.
//!
//! Both are built once before a run and shared read-only by every worker,
//! so neither needs synchronization.
//!
//! # Key Types
//!
//! - [`Location`]: An identified point in 3D space
//! - [`LocationBounds`]: Axis ranges for random location generation
//! - [`DistanceTable`]: Symmetric Euclidean cost matrix with O(1) lookup

mod distance;
mod location;

pub use distance::DistanceTable;
pub use location::{generate_locations, Location, LocationBounds};
