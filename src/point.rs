use crate::error::KMedoidsError;
use ndarray::Array1;

/// Reference from a point to a medoid: the medoid's index in the point
/// arena plus the Euclidean distance to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedoidRef {
    /// Index of the medoid in the arena that owns both points
    pub index: usize,
    /// Distance from the referring point to the medoid
    pub distance: f64,
}

/// A single observation: a stable identifier plus a fixed coordinate vector.
///
/// Coordinates are immutable after construction. The nearest/second-nearest
/// medoid bookkeeping is the only mutable state; it is rewritten wholesale on
/// every reassignment pass, never patched incrementally across iterations.
#[derive(Debug, Clone)]
pub struct Point {
    id: usize,
    coordinates: Array1<f64>,
    nearest: Option<MedoidRef>,
    second_nearest: Option<MedoidRef>,
}

impl Point {
    /// Create a new point with no medoid assigned yet
    pub fn new(id: usize, coordinates: Array1<f64>) -> Self {
        Self {
            id,
            coordinates,
            nearest: None,
            second_nearest: None,
        }
    }

    /// Identifier, unique within the dataset
    pub fn id(&self) -> usize {
        self.id
    }

    /// Coordinate vector
    pub fn coordinates(&self) -> &Array1<f64> {
        &self.coordinates
    }

    /// Number of coordinate dimensions
    pub fn dimensions(&self) -> usize {
        self.coordinates.len()
    }

    /// Nearest medoid, if an assignment pass has run. A point that is
    /// itself a medoid references itself at distance 0.
    pub fn nearest(&self) -> Option<MedoidRef> {
        self.nearest
    }

    /// Second-nearest medoid. `None` for medoids (no meaningful second
    /// choice) and whenever fewer than two medoids exist.
    pub fn second_nearest(&self) -> Option<MedoidRef> {
        self.second_nearest
    }

    /// Euclidean (L2) distance between two points.
    ///
    /// # Errors
    ///
    /// Returns [`KMedoidsError::DimensionMismatch`] if the coordinate
    /// vectors have different lengths.
    pub fn distance(&self, other: &Point) -> Result<f64, KMedoidsError> {
        if self.coordinates.len() != other.coordinates.len() {
            return Err(KMedoidsError::DimensionMismatch(format!(
                "point {} has {} coordinates, point {} has {}",
                self.id,
                self.coordinates.len(),
                other.id,
                other.coordinates.len()
            )));
        }

        let diff = &self.coordinates - &other.coordinates;
        Ok(diff.dot(&diff).sqrt())
    }

    /// This point's contribution to the change in total dissimilarity if
    /// the medoid at arena index `old_medoid` were replaced by `new_medoid`,
    /// computed without a full reassignment.
    ///
    /// This is the primitive that lets the swap search evaluate a candidate
    /// in O(n) instead of O(n * k). Rules, in order:
    ///
    /// 1. A medoid other than `old_medoid` never reassigns: cost 0.
    /// 2. If the nearest medoid is the one being removed, the point either
    ///    falls back to its second-nearest (cost = second - nearest, >= 0)
    ///    or adopts the candidate (cost = d_new - nearest, possibly < 0),
    ///    whichever is closer. An unset second-nearest compares as infinite.
    /// 3. Otherwise the nearest medoid survives the swap; cost is 0 unless
    ///    the candidate is strictly closer (cost = d_new - nearest, < 0).
    ///
    /// `index` is this point's own position in the arena shared with
    /// `medoids`.
    ///
    /// # Panics
    ///
    /// Panics if no assignment pass has set this point's nearest medoid.
    pub fn replacement_cost(
        &self,
        index: usize,
        old_medoid: usize,
        new_medoid: &Point,
        medoids: &[usize],
    ) -> Result<f64, KMedoidsError> {
        if medoids.contains(&index) && index != old_medoid {
            return Ok(0.0);
        }

        let nearest = self
            .nearest
            .expect("assignment pass must run before swap costs are evaluated");
        let new_medoid_distance = self.distance(new_medoid)?;

        if nearest.index == old_medoid {
            let second_distance = self
                .second_nearest
                .map_or(f64::INFINITY, |second| second.distance);
            if new_medoid_distance >= second_distance {
                // falls back to the second-nearest medoid
                Ok(second_distance - nearest.distance)
            } else {
                // the candidate becomes the nearest medoid
                Ok(new_medoid_distance - nearest.distance)
            }
        } else if new_medoid_distance >= nearest.distance {
            Ok(0.0)
        } else {
            Ok(new_medoid_distance - nearest.distance)
        }
    }

    pub(crate) fn set_assignment(
        &mut self,
        nearest: Option<MedoidRef>,
        second_nearest: Option<MedoidRef>,
    ) {
        self.nearest = nearest;
        self.second_nearest = second_nearest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_distance_symmetric_and_zero_on_self() {
        let a = Point::new(0, array![1.0, 2.0, 3.0]);
        let b = Point::new(1, array![4.0, 6.0, 3.0]);

        assert_relative_eq!(a.distance(&b).unwrap(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(
            a.distance(&b).unwrap(),
            b.distance(&a).unwrap(),
            epsilon = 1e-12
        );
        assert_relative_eq!(a.distance(&a).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_one_dimensional_exact() {
        let a = Point::new(0, array![0.0]);
        let b = Point::new(1, array![9458.0]);

        assert_eq!(a.distance(&b).unwrap(), 9458.0);
    }

    #[test]
    fn test_distance_dimension_mismatch() {
        let a = Point::new(0, array![0.0, 1.0]);
        let b = Point::new(1, array![0.0, 1.0, 2.0]);

        assert!(matches!(
            a.distance(&b),
            Err(KMedoidsError::DimensionMismatch(_))
        ));
    }

    /// Fixture from the replacement-cost rules: a point at x=0 whose nearest
    /// medoid (arena index 1) sits at distance 10 and whose second-nearest
    /// (arena index 2) sits at distance 20.
    fn assigned_point() -> Point {
        let mut point = Point::new(0, array![0.0]);
        point.set_assignment(
            Some(MedoidRef {
                index: 1,
                distance: 10.0,
            }),
            Some(MedoidRef {
                index: 2,
                distance: 20.0,
            }),
        );
        point
    }

    #[test]
    fn test_cost_of_replacing_nearest_medoid_with_closer_candidate() {
        let point = assigned_point();
        let candidate = Point::new(3, array![5.0]);

        let cost = point
            .replacement_cost(0, 1, &candidate, &[1, 2])
            .unwrap();
        assert_relative_eq!(cost, 5.0 - 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cost_of_replacing_nearest_medoid_with_farther_candidate() {
        let point = assigned_point();
        let candidate = Point::new(3, array![25.0]);

        // the point falls back to its second-nearest medoid
        let cost = point
            .replacement_cost(0, 1, &candidate, &[1, 2])
            .unwrap();
        assert_relative_eq!(cost, 20.0 - 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cost_of_replacing_unaffected_medoid_with_closer_candidate() {
        let point = assigned_point();
        let candidate = Point::new(3, array![5.0]);

        let cost = point
            .replacement_cost(0, 2, &candidate, &[1, 2])
            .unwrap();
        assert_relative_eq!(cost, 5.0 - 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cost_of_replacing_unaffected_medoid_with_distant_candidate() {
        let point = assigned_point();
        let candidate = Point::new(3, array![555.0]);

        let cost = point
            .replacement_cost(0, 2, &candidate, &[1, 2])
            .unwrap();
        assert_relative_eq!(cost, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cost_is_zero_for_a_surviving_medoid() {
        let mut medoid = Point::new(0, array![14.0]);
        medoid.set_assignment(
            Some(MedoidRef {
                index: 4,
                distance: 0.0,
            }),
            None,
        );
        let candidate = Point::new(5, array![11.0]);

        // arena index 4 is a medoid and is not the one being replaced
        let cost = medoid
            .replacement_cost(4, 0, &candidate, &[0, 4])
            .unwrap();
        assert_relative_eq!(cost, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unset_second_nearest_compares_as_infinite() {
        // k = 1: the point has a nearest medoid but no second-nearest
        let mut point = Point::new(0, array![0.0]);
        point.set_assignment(
            Some(MedoidRef {
                index: 1,
                distance: 10.0,
            }),
            None,
        );
        let candidate = Point::new(2, array![7.0]);

        // with no fallback, the candidate always becomes the nearest medoid
        let cost = point.replacement_cost(0, 1, &candidate, &[1]).unwrap();
        assert_relative_eq!(cost, 7.0 - 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_replacement_cost_dimension_mismatch() {
        let point = assigned_point();
        let candidate = Point::new(3, array![5.0, 5.0]);

        assert!(matches!(
            point.replacement_cost(0, 1, &candidate, &[1, 2]),
            Err(KMedoidsError::DimensionMismatch(_))
        ));
    }
}
