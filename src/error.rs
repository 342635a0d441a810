//! Error taxonomy for the optimizer.

use thiserror::Error;

/// Errors raised while building inputs or running the swarm.
///
/// `InvalidConfig` and `InvalidInput` are fatal and raised before any
/// worker starts. `InvalidState` is a caller error against the `Swarm`
/// phase machine. `InternalConsistency` is never returned from a run: it
/// is logged and counted, and the affected particle keeps its previous
/// order for that iteration.
#[derive(Debug, Error)]
pub enum PsoError {
    /// Non-positive counts, non-finite weights, or an empty location set.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Degenerate location data or a malformed distance matrix.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A swarm operation was called in the wrong phase.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A derived candidate order was not a permutation.
    #[error("internal consistency fault at iteration {iteration}, particle {particle}: {detail}")]
    InternalConsistency {
        iteration: usize,
        particle: usize,
        detail: String,
    },

    /// A trace sink failed to persist a record.
    #[error("trace sink failed: {0}")]
    Trace(#[from] std::io::Error),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = PsoError::InvalidConfig("particle_count must be positive".into());
        assert_eq!(
            e.to_string(),
            "invalid configuration: particle_count must be positive"
        );

        let e = PsoError::InternalConsistency {
            iteration: 3,
            particle: 1,
            detail: "id 2 repeated".into(),
        };
        assert!(e.to_string().contains("iteration 3, particle 1"));

        let e = PsoError::InvalidState("iterate called before initialize".into());
        assert_eq!(e.to_string(), "invalid state: iterate called before initialize");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let e: PsoError = io.into();
        assert!(matches!(e, PsoError::Trace(_)));
    }
}
