//! Particle state and trace records.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::DistanceTable;

/// State of one particle: a permutation with a positional velocity and
/// the best permutation this particle has seen.
///
/// A tour is owned by a single worker during an iteration; nothing else
/// mutates it concurrently.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    /// Current permutation of location ids.
    pub order: Vec<usize>,
    /// One velocity component per position slot.
    pub velocity: Vec<f64>,
    /// Closed-tour cost of `order`.
    pub cost: f64,
    /// Best permutation this particle has visited.
    pub personal_best_order: Vec<usize>,
    /// Cost of `personal_best_order`. Never increases.
    pub personal_best_cost: f64,
}

impl Tour {
    /// Creates a tour with a shuffled order and velocity components drawn
    /// from `[-initial_velocity, initial_velocity)`.
    pub fn random<R: Rng>(table: &DistanceTable, initial_velocity: f64, rng: &mut R) -> Self {
        let n = table.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);

        let velocity = (0..n)
            .map(|_| {
                if initial_velocity > 0.0 {
                    rng.random_range(-initial_velocity..initial_velocity)
                } else {
                    0.0
                }
            })
            .collect();

        Self::with_velocity(table, order, velocity)
    }

    /// Creates a tour from an explicit order and velocity. The personal
    /// best starts at the given order.
    pub fn with_velocity(table: &DistanceTable, order: Vec<usize>, velocity: Vec<f64>) -> Self {
        let cost = table.tour_cost(&order);
        Self {
            personal_best_order: order.clone(),
            personal_best_cost: cost,
            order,
            velocity,
            cost,
        }
    }

    /// Number of position slots.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// One row of the per-iteration trace stream.
///
/// Emitted once per (iteration, particle) whether or not the particle's
/// candidate was committed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceRecord {
    pub iteration: usize,
    pub particle_id: usize,
    pub order: Vec<usize>,
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate_locations, LocationBounds};
    use crate::pso::moves::is_permutation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table(n: usize) -> DistanceTable {
        let mut rng = StdRng::seed_from_u64(3);
        let locs = generate_locations(n, &LocationBounds::default(), &mut rng);
        DistanceTable::from_locations(&locs).unwrap()
    }

    #[test]
    fn test_random_tour_is_permutation() {
        let table = table(25);
        let mut rng = StdRng::seed_from_u64(11);
        let tour = Tour::random(&table, 1.0, &mut rng);

        assert_eq!(tour.len(), 25);
        assert!(is_permutation(&tour.order, 25));
        assert_eq!(tour.velocity.len(), 25);
        assert!(tour.velocity.iter().all(|v| (-1.0..1.0).contains(v)));
        assert_eq!(tour.order, tour.personal_best_order);
        assert_eq!(tour.cost, tour.personal_best_cost);
        assert!((tour.cost - table.tour_cost(&tour.order)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_initial_velocity() {
        let table = table(6);
        let mut rng = StdRng::seed_from_u64(0);
        let tour = Tour::random(&table, 0.0, &mut rng);
        assert!(tour.velocity.iter().all(|&v| v == 0.0));
    }
}
