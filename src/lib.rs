//! Concurrent discrete Particle Swarm Optimization for closed-tour routing.
//!
//! Searches for a low-cost ordering of a fixed set of 3D points:
//!
//! - **Geometry**: Locations and the immutable pairwise [`DistanceTable`]
//!   shared read-only by every worker.
//! - **PSO**: Particles, the lock-guarded global best, the per-particle
//!   update engine, and the iteration driver that fans out one task per
//!   particle on a reusable worker pool.
//! - **Trace**: Sinks for the per-(iteration, particle) record stream, plus
//!   CSV export of locations and routes.
//!
//! # Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use u_pso_tsp::geometry::{generate_locations, DistanceTable, LocationBounds};
//! use u_pso_tsp::pso::{PsoConfig, PsoRunner};
//! use u_pso_tsp::trace::NullSink;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let locations = generate_locations(20, &LocationBounds::default(), &mut rng);
//! let table = DistanceTable::from_locations(&locations).unwrap();
//!
//! let config = PsoConfig::default()
//!     .with_particle_count(16)
//!     .with_iterations(50)
//!     .with_seed(7);
//! let result = PsoRunner::run(&table, &config, &NullSink).unwrap();
//! assert!(result.best_cost <= result.cost_history[0]);
//! ```
//!
//! [`DistanceTable`]: geometry::DistanceTable

pub mod error;
pub mod geometry;
pub mod pso;
pub mod trace;

pub use error::PsoError;
