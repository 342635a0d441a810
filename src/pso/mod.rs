//! Discrete Particle Swarm Optimization over closed tours.
//!
//! Each particle carries a permutation of location ids and a real-valued
//! velocity with one component per position slot. The classic PSO velocity
//! rule is applied positionally, treating ids as reals, and the resulting
//! vector is turned into a new permutation by a [`MoveEncoding`].
//!
//! # Key Types
//!
//! - [`PsoConfig`]: Swarm size, iteration budget, weights, velocity limit
//! - [`Tour`]: One particle's order, velocity, and personal best
//! - [`SwarmState`]: The lock-guarded global best
//! - [`UpdateEngine`]: The per-particle transition
//! - [`Swarm`] / [`PsoRunner`]: Lifecycle and the iteration driver
//! - [`PsoResult`]: Final best order with run statistics
//!
//! # Concurrency
//!
//! Iterations run strictly in sequence. Within an iteration every particle
//! is updated by its own task on a rayon pool that is built once per run;
//! the pool's join is the barrier between iterations. Only
//! [`SwarmState::compare_and_update`] takes a lock.
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Clerc & Kennedy (2002), "The Particle Swarm — Explosion, Stability,
//!   and Convergence in a Multidimensional Complex Space"

mod config;
pub mod moves;
mod runner;
mod swarm;
mod types;
mod update;

pub use config::{PsoConfig, VelocityLimit};
pub use moves::{MoveEncoding, PositionalSwap, SegmentReversal};
pub use runner::{build_pool, Phase, PsoResult, PsoRunner, Swarm};
pub use swarm::{GlobalBest, SwarmState};
pub use types::{TraceRecord, Tour};
pub use update::{StepOutcome, UpdateEngine};
