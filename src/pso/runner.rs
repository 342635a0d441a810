//! Swarm lifecycle and the iteration driver.
//!
//! # Algorithm
//!
//! 1. Validate the configuration (no location data is touched)
//! 2. Create every particle with a shuffled order and random velocity;
//!    seed personal bests and the global best
//! 3. For each of the K iterations:
//!    a. Snapshot the global best order
//!    b. Run one update task per particle on the worker pool
//!    c. Join all tasks before the next iteration starts
//! 4. Report the global best
//!
//! The join in step 3c is a full barrier: iteration `k + 1` always reads a
//! global best that includes every commit of iteration `k`.

use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info, warn};

use super::config::PsoConfig;
use super::moves::{MoveEncoding, PositionalSwap};
use super::swarm::{GlobalBest, SwarmState};
use super::types::Tour;
use super::update::UpdateEngine;
use crate::error::PsoError;
use crate::geometry::{DistanceTable, Location};
use crate::trace::TraceSink;

/// Result of a PSO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoResult {
    /// Best order found by any particle.
    pub best_order: Vec<usize>,

    /// Closed-tour cost of `best_order`.
    pub best_cost: f64,

    /// Wall-clock time from initialization to the last barrier.
    pub elapsed: Duration,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Candidates rejected by the permutation check.
    pub consistency_faults: usize,

    /// Global best cost after initialization and after each iteration.
    pub cost_history: Vec<f64>,
}

impl PsoResult {
    /// Elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

impl fmt::Display for PsoResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Best Path:")?;
        for id in &self.best_order {
            write!(f, " {id}")?;
        }
        writeln!(f)?;
        writeln!(f, "Best Distance: {}", self.best_cost)?;
        write!(f, "Execution Time: {:.2} milliseconds", self.elapsed_ms())
    }
}

/// Lifecycle phase of a [`Swarm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Configured, no particles yet.
    Idle,
    /// Particles are being created and evaluated.
    Initializing,
    /// Ready for the next iteration; `completed` iterations have run.
    Running { completed: usize },
    /// The iteration budget is spent.
    Done,
}

/// A particle slot in the arena: its tour plus its own random stream.
#[derive(Debug)]
struct Particle {
    tour: Tour,
    rng: StdRng,
}

/// The particle arena plus shared best state for one run.
///
/// Particles are addressed by index. During an iteration each worker gets
/// `&mut` to exactly one slot and `&` to the distance table and the
/// [`SwarmState`].
#[derive(Debug)]
pub struct Swarm<'a> {
    table: &'a DistanceTable,
    config: PsoConfig,
    particles: Vec<Particle>,
    state: SwarmState,
    phase: Phase,
    cost_history: Vec<f64>,
}

impl<'a> Swarm<'a> {
    /// Creates an idle swarm.
    ///
    /// # Errors
    /// [`PsoError::InvalidConfig`] if the configuration is invalid or the
    /// table has no locations.
    pub fn new(table: &'a DistanceTable, config: PsoConfig) -> Result<Self, PsoError> {
        config.validate()?;
        if table.is_empty() {
            return Err(PsoError::InvalidConfig("location set is empty".into()));
        }

        Ok(Self {
            table,
            particles: Vec::with_capacity(config.particle_count),
            config,
            state: SwarmState::new(Vec::new(), f64::INFINITY),
            phase: Phase::Idle,
            cost_history: Vec::new(),
        })
    }

    /// Creates all particles and seeds personal and global bests.
    ///
    /// Each particle gets its own RNG seeded from `rng`, so results do not
    /// depend on which worker runs which particle. The first particle's tour
    /// becomes the global best unconditionally.
    ///
    /// # Errors
    /// [`PsoError::InvalidState`] unless the swarm is idle.
    pub fn initialize<R: Rng>(&mut self, rng: &mut R) -> Result<(), PsoError> {
        if self.phase != Phase::Idle {
            return Err(PsoError::InvalidState(format!(
                "swarm already initialized (phase {:?})",
                self.phase
            )));
        }
        self.phase = Phase::Initializing;

        for _ in 0..self.config.particle_count {
            let mut prng = StdRng::seed_from_u64(rng.random());
            let tour = Tour::random(self.table, self.config.initial_velocity, &mut prng);
            if self.particles.is_empty() {
                self.state =
                    SwarmState::new(tour.personal_best_order.clone(), tour.personal_best_cost);
            } else {
                self.state
                    .compare_and_update(&tour.personal_best_order, tour.personal_best_cost);
            }
            self.particles.push(Particle { tour, rng: prng });
        }

        let best = self.state.best_cost();
        self.cost_history.push(best);
        debug!(
            particles = self.particles.len(),
            best_cost = best,
            "swarm initialized"
        );
        self.phase = Phase::Running { completed: 0 };
        Ok(())
    }

    /// Runs one iteration: one task per particle on `pool`, then a join.
    ///
    /// Every particle emits exactly one record to `sink`. If the sink fails,
    /// the error is returned once the iteration's tasks have stopped.
    ///
    /// # Errors
    /// [`PsoError::InvalidState`] unless the swarm is running with
    /// iterations left, [`PsoError::Trace`] if the sink fails.
    pub fn iterate<M, S>(
        &mut self,
        pool: &ThreadPool,
        encoding: &M,
        sink: &S,
    ) -> Result<(), PsoError>
    where
        M: MoveEncoding,
        S: TraceSink + ?Sized,
    {
        let iteration = match self.phase {
            Phase::Running { completed } if completed < self.config.iterations => completed,
            phase => {
                return Err(PsoError::InvalidState(format!(
                    "cannot iterate in phase {phase:?}"
                )))
            }
        };

        let snapshot = self.state.snapshot();
        let engine = UpdateEngine::new(self.table, &self.state, encoding, &self.config)?;
        let particles = &mut self.particles;

        // (committed, improved personal, improved global)
        let (committed, improved_personal, improved_global) = pool
            .install(|| {
                particles
                    .par_iter_mut()
                    .enumerate()
                    .map(|(id, particle)| -> io::Result<(usize, usize, usize)> {
                        let outcome = engine.step(
                            iteration,
                            id,
                            &mut particle.tour,
                            &snapshot.order,
                            &mut particle.rng,
                        );
                        sink.record(&outcome.record)?;
                        Ok((
                            usize::from(outcome.committed),
                            usize::from(outcome.improved_personal),
                            usize::from(outcome.improved_global),
                        ))
                    })
                    .try_reduce(
                        || (0, 0, 0),
                        |a, b| Ok((a.0 + b.0, a.1 + b.1, a.2 + b.2)),
                    )
            })
            .map_err(|e| {
                warn!(iteration, error = %e, "trace sink failed");
                PsoError::Trace(e)
            })?;

        let best = self.state.best_cost();
        self.cost_history.push(best);
        debug!(
            iteration,
            best_cost = best,
            committed,
            improved_personal,
            improved_global,
            "iteration complete"
        );

        let completed = iteration + 1;
        self.phase = if completed == self.config.iterations {
            Phase::Done
        } else {
            Phase::Running { completed }
        };
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Copy of the current global best.
    pub fn global_best(&self) -> GlobalBest {
        self.state.snapshot()
    }

    /// Particles in id order.
    pub fn particles(&self) -> impl Iterator<Item = &Tour> + '_ {
        self.particles.iter().map(|p| &p.tour)
    }

    /// Global best cost after initialization and after each iteration.
    pub fn cost_history(&self) -> &[f64] {
        &self.cost_history
    }

    pub fn consistency_faults(&self) -> usize {
        self.state.consistency_faults()
    }

    /// Consumes a finished swarm and builds the result.
    ///
    /// # Errors
    /// [`PsoError::InvalidState`] unless every iteration has run.
    pub fn into_result(self, elapsed: Duration) -> Result<PsoResult, PsoError> {
        if self.phase != Phase::Done {
            return Err(PsoError::InvalidState(format!(
                "swarm not finished (phase {:?})",
                self.phase
            )));
        }
        let consistency_faults = self.state.consistency_faults();
        let best = self.state.into_best();

        Ok(PsoResult {
            best_order: best.order,
            best_cost: best.cost,
            elapsed,
            iterations: self.config.iterations,
            consistency_faults,
            cost_history: self.cost_history,
        })
    }
}

/// Executes the particle swarm.
///
/// # Usage
///
/// ```
/// use u_pso_tsp::geometry::{DistanceTable, Location};
/// use u_pso_tsp::pso::{PsoConfig, PsoRunner};
/// use u_pso_tsp::trace::MemorySink;
///
/// let locs: Vec<Location> = (0..6)
///     .map(|i| Location::new(i, (i as f64).cos(), (i as f64).sin(), 0.0))
///     .collect();
/// let table = DistanceTable::from_locations(&locs).unwrap();
/// let config = PsoConfig::default().with_particle_count(8).with_iterations(10).with_seed(1);
///
/// let sink = MemorySink::new();
/// let result = PsoRunner::run(&table, &config, &sink).unwrap();
/// assert_eq!(sink.len(), 80);
/// assert_eq!(result.best_order.len(), 6);
/// ```
pub struct PsoRunner;

impl PsoRunner {
    /// Runs PSO with the default [`PositionalSwap`] move encoding.
    pub fn run<S>(
        table: &DistanceTable,
        config: &PsoConfig,
        sink: &S,
    ) -> Result<PsoResult, PsoError>
    where
        S: TraceSink + ?Sized,
    {
        Self::run_with_encoding(table, config, &PositionalSwap, sink)
    }

    /// Validates `config`, then builds the distance table from `locations`
    /// and runs PSO.
    ///
    /// An invalid configuration is reported before the locations are read.
    pub fn run_on_locations<S>(
        locations: &[Location],
        config: &PsoConfig,
        sink: &S,
    ) -> Result<PsoResult, PsoError>
    where
        S: TraceSink + ?Sized,
    {
        config.validate()?;
        let table = DistanceTable::from_locations(locations)?;
        Self::run(&table, config, sink)
    }

    /// Runs PSO with a custom move encoding.
    pub fn run_with_encoding<M, S>(
        table: &DistanceTable,
        config: &PsoConfig,
        encoding: &M,
        sink: &S,
    ) -> Result<PsoResult, PsoError>
    where
        M: MoveEncoding,
        S: TraceSink + ?Sized,
    {
        let mut swarm = Swarm::new(table, config.clone())?;
        let pool = build_pool(config)?;

        info!(
            locations = table.len(),
            particles = config.particle_count,
            iterations = config.iterations,
            workers = pool.current_num_threads(),
            encoding = encoding.name(),
            "starting particle swarm"
        );

        let start = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        swarm.initialize(&mut rng)?;

        for _ in 0..config.iterations {
            swarm.iterate(&pool, encoding, sink)?;
        }

        let result = swarm.into_result(start.elapsed())?;
        info!(
            best_cost = result.best_cost,
            elapsed_ms = result.elapsed_ms(),
            consistency_faults = result.consistency_faults,
            "particle swarm finished"
        );
        Ok(result)
    }
}

/// Builds the worker pool reused across all iterations of a run.
pub fn build_pool(config: &PsoConfig) -> Result<ThreadPool, PsoError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.unwrap_or(0))
        .thread_name(|i| format!("pso-worker-{i}"))
        .build()?;
    Ok(pool)
}

// ============================================================================
// Tests
// ============================================================================
