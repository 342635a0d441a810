//! Location type and random generation.

use rand::Rng;

/// A point in 3D space identified by its index in the location list.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Index of this location; must equal its position in the list.
    pub id: usize,
    /// `[x, y, z]` coordinates.
    pub coords: [f64; 3],
}

impl Location {
    pub fn new(id: usize, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            coords: [x, y, z],
        }
    }

    /// Euclidean distance to another location.
    pub fn distance_to(&self, other: &Location) -> f64 {
        let dx = self.coords[0] - other.coords[0];
        let dy = self.coords[1] - other.coords[1];
        let dz = self.coords[2] - other.coords[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Half-open coordinate ranges used by [`generate_locations`].
///
/// # Examples
///
/// ```
/// use u_pso_tsp::geometry::LocationBounds;
///
/// let bounds = LocationBounds::default().with_z(0.0, 10.0);
/// assert_eq!(bounds.z, (0.0, 10.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl Default for LocationBounds {
    fn default() -> Self {
        Self {
            x: (-2.0, 8.0),
            y: (-5.0, 5.0),
            z: (0.0, 2.5),
        }
    }
}

impl LocationBounds {
    pub fn with_x(mut self, lo: f64, hi: f64) -> Self {
        self.x = (lo, hi);
        self
    }

    pub fn with_y(mut self, lo: f64, hi: f64) -> Self {
        self.y = (lo, hi);
        self
    }

    pub fn with_z(mut self, lo: f64, hi: f64) -> Self {
        self.z = (lo, hi);
        self
    }
}

/// Generates `count` locations with ids `0..count`, each coordinate drawn
/// uniformly from its axis range.
///
/// A degenerate range (`lo >= hi`) pins that axis to `lo`.
pub fn generate_locations<R: Rng>(
    count: usize,
    bounds: &LocationBounds,
    rng: &mut R,
) -> Vec<Location> {
    (0..count)
        .map(|id| {
            let x = sample_axis(bounds.x, rng);
            let y = sample_axis(bounds.y, rng);
            let z = sample_axis(bounds.z, rng);
            Location::new(id, x, y, z)
        })
        .collect()
}

fn sample_axis<R: Rng>((lo, hi): (f64, f64), rng: &mut R) -> f64 {
    if lo < hi {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_distance_to() {
        let a = Location::new(0, 0.0, 0.0, 0.0);
        let b = Location::new(1, 1.0, 2.0, 2.0);
        assert!((a.distance_to(&b) - 3.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 3.0).abs() < 1e-12);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn test_generate_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = LocationBounds::default();
        let locs = generate_locations(200, &bounds, &mut rng);

        assert_eq!(locs.len(), 200);
        for (i, loc) in locs.iter().enumerate() {
            assert_eq!(loc.id, i);
            assert!(loc.coords[0] >= -2.0 && loc.coords[0] < 8.0);
            assert!(loc.coords[1] >= -5.0 && loc.coords[1] < 5.0);
            assert!(loc.coords[2] >= 0.0 && loc.coords[2] < 2.5);
        }
    }

    #[test]
    fn test_generate_flat_axis() {
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = LocationBounds::default().with_z(1.0, 1.0);
        let locs = generate_locations(10, &bounds, &mut rng);
        assert!(locs.iter().all(|l| l.coords[2] == 1.0));
    }

    #[test]
    fn test_generate_deterministic_with_seed() {
        let bounds = LocationBounds::default();
        let a = generate_locations(20, &bounds, &mut StdRng::seed_from_u64(99));
        let b = generate_locations(20, &bounds, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
