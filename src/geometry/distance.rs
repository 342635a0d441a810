//! Precomputed pairwise distance table.

use super::location::Location;
use crate::error::PsoError;

/// Symmetric N×N cost matrix stored row-major.
///
/// Every entry is non-negative, `get(i, j) == get(j, i)` holds bit-for-bit,
/// and the diagonal is zero. The table is immutable after construction.
///
/// # Examples
///
/// ```
/// use u_pso_tsp::geometry::{DistanceTable, Location};
///
/// let locs = vec![
///     Location::new(0, 0.0, 0.0, 0.0),
///     Location::new(1, 3.0, 4.0, 0.0),
/// ];
/// let table = DistanceTable::from_locations(&locs).unwrap();
/// assert_eq!(table.get(0, 1), 5.0);
/// assert_eq!(table.tour_cost(&[0, 1]), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable {
    n: usize,
    data: Vec<f64>,
}

impl DistanceTable {
    /// Builds the Euclidean table for `locations`. O(N²).
    ///
    /// Each unordered pair is computed once and mirrored, so the result is
    /// exactly symmetric and construction is reproducible.
    ///
    /// # Errors
    ///
    /// [`PsoError::InvalidInput`] if the list is empty, ids are not
    /// `0..N` in order, any coordinate is non-finite, or the distances are
    /// large enough that a tour cost would overflow.
    pub fn from_locations(locations: &[Location]) -> Result<Self, PsoError> {
        if locations.is_empty() {
            return Err(PsoError::InvalidInput("location list is empty".into()));
        }
        for (i, loc) in locations.iter().enumerate() {
            if loc.id != i {
                return Err(PsoError::InvalidInput(format!(
                    "location at index {i} has id {}",
                    loc.id
                )));
            }
            if loc.coords.iter().any(|c| !c.is_finite()) {
                return Err(PsoError::InvalidInput(format!(
                    "location {i} has non-finite coordinates {:?}",
                    loc.coords
                )));
            }
        }

        let n = locations.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = locations[i].distance_to(&locations[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        check_total(&data)?;
        Ok(Self { n, data })
    }

    /// Builds a table from an explicit square matrix.
    ///
    /// # Errors
    ///
    /// [`PsoError::InvalidInput`] unless the matrix is non-empty, square,
    /// finite, non-negative, symmetric, and zero on the diagonal, and no
    /// tour cost can overflow.
    pub fn from_matrix(matrix: Vec<Vec<f64>>) -> Result<Self, PsoError> {
        let n = matrix.len();
        if n == 0 {
            return Err(PsoError::InvalidInput("distance matrix is empty".into()));
        }
        if let Some((i, row)) = matrix.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(PsoError::InvalidInput(format!(
                "row {i} has length {}, expected {n}",
                row.len()
            )));
        }

        for i in 0..n {
            if matrix[i][i] != 0.0 {
                return Err(PsoError::InvalidInput(format!(
                    "diagonal entry ({i}, {i}) is {}",
                    matrix[i][i]
                )));
            }
            for j in (i + 1)..n {
                let d = matrix[i][j];
                if !d.is_finite() || d < 0.0 {
                    return Err(PsoError::InvalidInput(format!(
                        "entry ({i}, {j}) = {d} is not a finite non-negative distance"
                    )));
                }
                if d != matrix[j][i] {
                    return Err(PsoError::InvalidInput(format!(
                        "matrix is not symmetric at ({i}, {j})"
                    )));
                }
            }
        }

        let data: Vec<f64> = matrix.into_iter().flatten().collect();
        check_total(&data)?;
        Ok(Self { n, data })
    }

    /// Number of locations.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false` for a constructed table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between locations `i` and `j`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Closed-tour cost of `order`, including the edge from the last
    /// element back to the first. O(N).
    ///
    /// An empty or single-element order costs 0.
    pub fn tour_cost(&self, order: &[usize]) -> f64 {
        let (first, last) = match (order.first(), order.last()) {
            (Some(&f), Some(&l)) => (f, l),
            _ => return 0.0,
        };
        let open: f64 = order.windows(2).map(|w| self.get(w[0], w[1])).sum();
        open + self.get(last, first)
    }
}

/// Every closed tour uses each unordered pair at most twice, so a finite
/// sum over the full matrix bounds every tour cost.
fn check_total(data: &[f64]) -> Result<(), PsoError> {
    let total: f64 = data.iter().sum();
    if total.is_finite() {
        Ok(())
    } else {
        Err(PsoError::InvalidInput(
            "distances are too large: tour costs would overflow".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square_with_apex() -> Vec<Location> {
        vec![
            Location::new(0, 0.0, 0.0, 0.0),
            Location::new(1, 1.0, 0.0, 0.0),
            Location::new(2, 1.0, 1.0, 0.0),
            Location::new(3, 0.0, 1.0, 0.0),
            Location::new(4, 0.5, 0.5, 1.0),
        ]
    }

    #[test]
    fn test_symmetric_zero_diagonal() {
        let table = DistanceTable::from_locations(&square_with_apex()).unwrap();
        assert_eq!(table.len(), 5);
        for i in 0..5 {
            assert_eq!(table.get(i, i), 0.0);
            for j in 0..5 {
                assert_eq!(table.get(i, j).to_bits(), table.get(j, i).to_bits());
                assert!(table.get(i, j) >= 0.0);
            }
        }
        assert!((table.get(0, 2) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_construction_idempotent() {
        let locs = square_with_apex();
        let a = DistanceTable::from_locations(&locs).unwrap();
        let b = DistanceTable::from_locations(&locs).unwrap();
        let bits_a: Vec<u64> = a.data.iter().map(|d| d.to_bits()).collect();
        let bits_b: Vec<u64> = b.data.iter().map(|d| d.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            DistanceTable::from_locations(&[]),
            Err(PsoError::InvalidInput(_))
        ));
        assert!(matches!(
            DistanceTable::from_matrix(vec![]),
            Err(PsoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_ids_rejected() {
        let locs = vec![Location::new(0, 0.0, 0.0, 0.0), Location::new(5, 1.0, 0.0, 0.0)];
        assert!(matches!(
            DistanceTable::from_locations(&locs),
            Err(PsoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let locs = vec![
            Location::new(0, 0.0, 0.0, 0.0),
            Location::new(1, f64::NAN, 0.0, 0.0),
        ];
        assert!(DistanceTable::from_locations(&locs).is_err());
    }

    #[test]
    fn test_from_matrix_validation() {
        let ok = DistanceTable::from_matrix(vec![vec![0.0, 2.0], vec![2.0, 0.0]]).unwrap();
        assert_eq!(ok.get(1, 0), 2.0);

        assert!(DistanceTable::from_matrix(vec![vec![0.0, 2.0], vec![3.0, 0.0]]).is_err());
        assert!(DistanceTable::from_matrix(vec![vec![1.0]]).is_err());
        assert!(DistanceTable::from_matrix(vec![vec![0.0, -1.0], vec![-1.0, 0.0]]).is_err());
        assert!(DistanceTable::from_matrix(vec![vec![0.0, 1.0], vec![1.0]]).is_err());
    }

    #[test]
    fn test_overflowing_distances_rejected() {
        let big = f64::MAX / 2.0;
        let matrix = vec![
            vec![0.0, big, big],
            vec![big, 0.0, big],
            vec![big, big, 0.0],
        ];
        assert!(matches!(
            DistanceTable::from_matrix(matrix),
            Err(PsoError::InvalidInput(_))
        ));

        let locs = vec![
            Location::new(0, -1e300, 0.0, 0.0),
            Location::new(1, 1e300, 0.0, 0.0),
        ];
        assert!(matches!(
            DistanceTable::from_locations(&locs),
            Err(PsoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_single_location_cost_zero() {
        let table = DistanceTable::from_locations(&[Location::new(0, 3.0, 4.0, 5.0)]).unwrap();
        assert_eq!(table.tour_cost(&[0]), 0.0);
        assert_eq!(table.tour_cost(&[]), 0.0);
    }

    #[test]
    fn test_unit_square_tour() {
        let table = DistanceTable::from_locations(&square_with_apex()[..4]).unwrap();
        assert!((table.tour_cost(&[0, 1, 2, 3]) - 4.0).abs() < 1e-12);
        assert!((table.tour_cost(&[0, 2, 1, 3]) - (2.0 + 2.0 * 2f64.sqrt())).abs() < 1e-12);
    }

    fn coords_strategy() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
        prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64, -100.0..100.0f64), 1..12)
    }

    proptest! {
        #[test]
        fn prop_cost_invariant_under_rotation_and_reversal(
            (coords, order, shift) in coords_strategy().prop_flat_map(|coords| {
                let n = coords.len();
                (
                    Just(coords),
                    Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
                    0..n,
                )
            }),
        ) {
            let locs: Vec<Location> = coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y, z))| Location::new(i, x, y, z))
                .collect();
            let table = DistanceTable::from_locations(&locs).unwrap();
            let base = table.tour_cost(&order);

            let mut rotated = order.clone();
            rotated.rotate_left(shift);
            prop_assert!((table.tour_cost(&rotated) - base).abs() <= 1e-9 * base.max(1.0));

            let mut reversed = order.clone();
            reversed.reverse();
            prop_assert!((table.tour_cost(&reversed) - base).abs() <= 1e-9 * base.max(1.0));
        }
    }
}
