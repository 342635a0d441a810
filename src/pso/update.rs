//! Per-particle transition: velocity update, move derivation, validation,
//! commit.

use rand::Rng;
use tracing::error;

use super::config::PsoConfig;
use super::moves::{permutation_defect, MoveEncoding};
use super::swarm::SwarmState;
use super::types::{TraceRecord, Tour};
use crate::error::PsoError;
use crate::geometry::DistanceTable;

/// What happened to one particle in one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// The record to hand to the trace sink.
    pub record: TraceRecord,
    /// Whether the candidate order replaced the particle's order.
    pub committed: bool,
    /// Whether the particle improved its personal best.
    pub improved_personal: bool,
    /// Whether the particle's order became the new global best.
    pub improved_global: bool,
}

/// Applies the PSO transition to a single particle.
///
/// Holds only shared references, so one engine serves every worker of an
/// iteration.
pub struct UpdateEngine<'a, M: MoveEncoding> {
    table: &'a DistanceTable,
    state: &'a SwarmState,
    encoding: &'a M,
    inertia: f64,
    cognitive: f64,
    social: f64,
    velocity_bound: Option<f64>,
}

impl<'a, M: MoveEncoding> UpdateEngine<'a, M> {
    /// Builds an engine from a validated copy of `config`.
    ///
    /// # Errors
    ///
    /// [`PsoError::InvalidConfig`] if `config` fails
    /// [`PsoConfig::validate`].
    pub fn new(
        table: &'a DistanceTable,
        state: &'a SwarmState,
        encoding: &'a M,
        config: &PsoConfig,
    ) -> Result<Self, PsoError> {
        config.validate()?;
        Ok(Self {
            table,
            state,
            encoding,
            inertia: config.inertia,
            cognitive: config.cognitive,
            social: config.social,
            velocity_bound: config.velocity_limit.bound(table.len()),
        })
    }

    /// Runs one transition for `tour`.
    ///
    /// `global_best` is the order snapshot taken at the start of the
    /// iteration; it may be stale relative to concurrent commits. The
    /// authoritative comparison happens in
    /// [`SwarmState::compare_and_update`].
    ///
    /// A snapshot whose length differs from the tour is a fault: the
    /// particle keeps its order and velocity for this iteration.
    pub fn step<R: Rng>(
        &self,
        iteration: usize,
        particle_id: usize,
        tour: &mut Tour,
        global_best: &[usize],
        rng: &mut R,
    ) -> StepOutcome {
        let n = self.table.len();
        let mut committed = false;
        let mut improved_personal = false;
        let mut improved_global = false;

        let candidate = if global_best.len() != n || tour.len() != n {
            Err(format!(
                "global best has length {}, tour has length {}, expected {n}",
                global_best.len(),
                tour.len()
            ))
        } else {
            self.update_velocity(tour, global_best, rng);
            let candidate = self.encoding.derive(&tour.order, &tour.velocity);
            match permutation_defect(&candidate, n) {
                None => Ok(candidate),
                Some(detail) => Err(detail),
            }
        };

        match candidate {
            Ok(candidate) => {
                let cost = self.table.tour_cost(&candidate);
                tour.order = candidate;
                tour.cost = cost;
                committed = true;

                if cost < tour.personal_best_cost {
                    tour.personal_best_order.clone_from(&tour.order);
                    tour.personal_best_cost = cost;
                    improved_personal = true;
                }
                improved_global = self.state.compare_and_update(&tour.order, cost);
            }
            Err(detail) => {
                self.state.record_fault();
                let fault = PsoError::InternalConsistency {
                    iteration,
                    particle: particle_id,
                    detail,
                };
                error!(
                    encoding = self.encoding.name(),
                    error = %fault,
                    "rejected candidate order"
                );
            }
        }

        StepOutcome {
            record: TraceRecord {
                iteration,
                particle_id,
                order: tour.order.clone(),
                cost: tour.cost,
            },
            committed,
            improved_personal,
            improved_global,
        }
    }

    /// `v[i] = w*v[i] + c1*r1*(pbest[i]-x[i]) + c2*r2*(gbest[i]-x[i])`,
    /// treating ids as reals, then clamped to the configured bound.
    fn update_velocity<R: Rng>(&self, tour: &mut Tour, global_best: &[usize], rng: &mut R) {
        let slots = tour
            .velocity
            .iter_mut()
            .zip(&tour.order)
            .zip(&tour.personal_best_order)
            .zip(global_best);

        for (((v, &x), &pbest), &gbest) in slots {
            let r1: f64 = rng.random_range(0.0..1.0);
            let r2: f64 = rng.random_range(0.0..1.0);
            let x = x as f64;

            let mut next = self.inertia * *v
                + self.cognitive * r1 * (pbest as f64 - x)
                + self.social * r2 * (gbest as f64 - x);

            if let Some(bound) = self.velocity_bound {
                next = next.clamp(-bound, bound);
            }
            *v = next;
        }
    }
}
