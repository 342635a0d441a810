//! PSO configuration and velocity limits.

use crate::error::PsoError;

/// Bound applied to each velocity component after the update step.
///
/// The swap index is `floor(|v|) mod N`, so velocity magnitude has no
/// natural ceiling. Clamping keeps it from growing without bound over long
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VelocityLimit {
    /// No clamping; velocities may grow for the whole run.
    Unbounded,

    /// Clamp every component to `[-vmax, vmax]`.
    Fixed(f64),

    /// Clamp every component to `[-N, N]` where N is the location count.
    #[default]
    LocationCount,
}

impl VelocityLimit {
    /// Resolves the clamp magnitude for a problem with `n` locations.
    pub fn bound(&self, n: usize) -> Option<f64> {
        match *self {
            VelocityLimit::Unbounded => None,
            VelocityLimit::Fixed(vmax) => Some(vmax),
            VelocityLimit::LocationCount => Some(n as f64),
        }
    }
}

/// Configuration for the particle swarm.
///
/// # Examples
///
/// ```
/// use u_pso_tsp::pso::{PsoConfig, VelocityLimit};
///
/// let config = PsoConfig::default()
///     .with_particle_count(16)
///     .with_iterations(200)
///     .with_weights(0.729, 1.49, 1.49)
///     .with_velocity_limit(VelocityLimit::Fixed(8.0))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoConfig {
    /// Number of particles in the swarm.
    pub particle_count: usize,

    /// Fixed iteration budget. The only stopping criterion.
    pub iterations: usize,

    /// Inertia weight `w`: how much of the previous velocity is kept.
    pub inertia: f64,

    /// Cognitive weight `c1`: pull toward the particle's own best.
    pub cognitive: f64,

    /// Social weight `c2`: pull toward the swarm's global best.
    pub social: f64,

    /// Velocity clamp applied after each update.
    pub velocity_limit: VelocityLimit,

    /// Initial velocity components are drawn from `[-a, a)`.
    pub initial_velocity: f64,

    /// Worker threads in the pool. `None` uses rayon's default.
    pub workers: Option<usize>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            particle_count: 4,
            iterations: 5,
            inertia: 0.729,
            cognitive: 1.49,
            social: 1.49,
            velocity_limit: VelocityLimit::default(),
            initial_velocity: 1.0,
            workers: None,
            seed: None,
        }
    }
}

impl PsoConfig {
    pub fn with_particle_count(mut self, n: usize) -> Self {
        self.particle_count = n;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_inertia(mut self, w: f64) -> Self {
        self.inertia = w;
        self
    }

    pub fn with_cognitive(mut self, c1: f64) -> Self {
        self.cognitive = c1;
        self
    }

    pub fn with_social(mut self, c2: f64) -> Self {
        self.social = c2;
        self
    }

    /// Sets inertia, cognitive, and social weights at once.
    pub fn with_weights(mut self, inertia: f64, cognitive: f64, social: f64) -> Self {
        self.inertia = inertia;
        self.cognitive = cognitive;
        self.social = social;
        self
    }

    pub fn with_velocity_limit(mut self, limit: VelocityLimit) -> Self {
        self.velocity_limit = limit;
        self
    }

    pub fn with_initial_velocity(mut self, a: f64) -> Self {
        self.initial_velocity = a;
        self
    }

    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = Some(n);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Touches no location data, so it can run before inputs are loaded.
    pub fn validate(&self) -> Result<(), PsoError> {
        if self.particle_count == 0 {
            return Err(invalid("particle_count must be positive"));
        }
        if self.iterations == 0 {
            return Err(invalid("iterations must be positive"));
        }
        for (name, w) in [
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
        ] {
            if !w.is_finite() {
                return Err(PsoError::InvalidConfig(format!(
                    "{name} weight must be finite, got {w}"
                )));
            }
        }
        if let VelocityLimit::Fixed(vmax) = self.velocity_limit {
            if !(vmax.is_finite() && vmax > 0.0) {
                return Err(PsoError::InvalidConfig(format!(
                    "velocity limit must be positive and finite, got {vmax}"
                )));
            }
        }
        if !(self.initial_velocity.is_finite() && self.initial_velocity >= 0.0) {
            return Err(PsoError::InvalidConfig(format!(
                "initial_velocity must be non-negative and finite, got {}",
                self.initial_velocity
            )));
        }
        if self.workers == Some(0) {
            return Err(invalid("workers must be positive when set"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> PsoError {
    PsoError::InvalidConfig(msg.into())
}
