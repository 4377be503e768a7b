use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::assignment::{Assignment, Clustering};
use crate::config::KMedoidsConfig;
use crate::error::KMedoidsError;
use crate::pam::Pam;
use crate::point::Point;

/// Number of sampled PAM trials per run
const TRIALS: usize = 5;

/// Clustering LARge Applications: a sampling approximation of [`Pam`].
///
/// Each of five trials draws a random subsample, runs the PAM swap search
/// to convergence on the subsample alone, and scores the resulting medoid
/// set against the full dataset by mean nearest-medoid distance. The best
/// scoring set wins; the final assignment and export cover the full
/// dataset. The initial random medoid set is scored first and kept if no
/// trial beats it.
///
/// The sample size defaults to `min(40 + 2 * k, n)` and can be overridden
/// through the configuration.
///
/// # Example
///
/// ```
/// use kmedoids_rs::{Clara, KMedoidsConfig, Point};
/// use ndarray::array;
///
/// let points: Vec<Point> = (0..20)
///     .map(|id| {
///         let x = if id < 10 { id as f64 } else { 90.0 + id as f64 };
///         Point::new(id, array![x])
///     })
///     .collect();
///
/// let mut clara = Clara::new(points, KMedoidsConfig::new(2).with_seed(7)).unwrap();
/// let result = clara.fit().unwrap();
/// assert_eq!(result.len(), 20);
/// ```
pub struct Clara {
    assignment: Assignment,
    config: KMedoidsConfig,
    sample_size: usize,
    rng: ChaCha8Rng,
    /// Best dissimilarity seen after each trial; non-increasing
    trial_best: Vec<f64>,
}

impl Clara {
    /// Validate the configuration, select the initial medoid set, and fix
    /// the sample size for the trials.
    ///
    /// # Errors
    ///
    /// Returns [`KMedoidsError::InvalidConfiguration`] for the same
    /// conditions as [`Pam::new`], or when the requested sample size
    /// exceeds the number of points; [`KMedoidsError::DegenerateSample`]
    /// when the sample size does not exceed `k`, which would leave the
    /// inner swap search without candidates.
    pub fn new(points: Vec<Point>, config: KMedoidsConfig) -> Result<Self, KMedoidsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let n = points.len();
        let sample_size = config
            .sample_size
            .unwrap_or_else(|| (40 + 2 * config.k).min(n));

        let assignment = Assignment::new(points, &config, &mut rng)?;

        if sample_size > n {
            return Err(KMedoidsError::InvalidConfiguration(format!(
                "sample size ({}) exceeds the number of points ({})",
                sample_size, n
            )));
        }
        if sample_size <= config.k {
            return Err(KMedoidsError::DegenerateSample(format!(
                "sample size ({}) must exceed k ({})",
                sample_size, config.k
            )));
        }

        Ok(Self {
            assignment,
            config,
            sample_size,
            rng,
            trial_best: Vec::new(),
        })
    }

    /// Run the sampled trials and export the full-dataset result table
    /// under the best-seen medoid set.
    pub fn fit(&mut self) -> Result<Clustering, KMedoidsError> {
        self.run()?;
        Ok(self.assignment.export())
    }

    /// Identifiers of the current medoids, in medoid-set order
    pub fn medoid_ids(&self) -> Vec<usize> {
        self.assignment.medoid_ids()
    }

    /// Mean nearest-medoid distance of the current assignment
    pub fn dissimilarity(&self) -> f64 {
        self.assignment.dissimilarity()
    }

    /// Sample size used for the trials
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    fn run(&mut self) -> Result<(), KMedoidsError> {
        // the initial random medoid set is the baseline candidate
        self.assignment.reassign_all()?;
        let mut best_medoids = self.assignment.medoid_indices().to_vec();
        let mut best_dissimilarity = self.assignment.dissimilarity();
        self.trial_best.clear();

        let trial_config = KMedoidsConfig {
            labels: None,
            coordinate_names: None,
            sample_size: None,
            verbose: false,
            ..self.config.clone()
        };

        for trial in 0..TRIALS {
            let sample_indices = self.draw_sample();
            let sample: Vec<Point> = sample_indices
                .iter()
                .map(|&index| {
                    let point = &self.assignment.points()[index];
                    Point::new(point.id(), point.coordinates().clone())
                })
                .collect();

            let mut pam = Pam::with_rng(sample, &trial_config, &mut self.rng)?;
            pam.run()?;

            // medoid positions in the sample arena map back to the full
            // arena through the drawn index list
            let candidate: Vec<usize> = pam
                .medoid_indices()
                .iter()
                .map(|&position| sample_indices[position])
                .collect();

            self.assignment.set_medoids(candidate.clone());
            self.assignment.reassign_all()?;
            let dissimilarity = self.assignment.dissimilarity();

            if dissimilarity < best_dissimilarity {
                best_dissimilarity = dissimilarity;
                best_medoids = candidate;
            }
            self.trial_best.push(best_dissimilarity);

            if self.config.verbose {
                eprintln!(
                    "  Trial {}/{}: dissimilarity = {:.6} (best = {:.6})",
                    trial + 1,
                    TRIALS,
                    dissimilarity,
                    best_dissimilarity
                );
            }
        }

        self.assignment.set_medoids(best_medoids);
        self.assignment.reassign_all()?;
        Ok(())
    }

    /// Draw `sample_size` distinct arena indices uniformly at random
    fn draw_sample(&mut self) -> Vec<usize> {
        let indices: Vec<usize> = (0..self.assignment.points().len()).collect();
        indices
            .choose_multiple(&mut self.rng, self.sample_size)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn line_points(n: usize) -> Vec<Point> {
        (0..n).map(|id| Point::new(id, array![id as f64])).collect()
    }

    /// Two tight groups far apart: ids 0..5 near zero, ids 5..10 near 100
    fn two_group_points() -> Vec<Point> {
        (0..10)
            .map(|id| {
                let x = if id < 5 {
                    id as f64
                } else {
                    100.0 + id as f64
                };
                Point::new(id, array![x])
            })
            .collect()
    }

    #[test]
    fn test_default_sample_size_is_capped_by_point_count() {
        let clara = Clara::new(line_points(100), KMedoidsConfig::new(2)).unwrap();
        assert_eq!(clara.sample_size(), 44);

        let clara = Clara::new(line_points(10), KMedoidsConfig::new(2)).unwrap();
        assert_eq!(clara.sample_size(), 10);
    }

    #[test]
    fn test_sample_size_not_exceeding_k_is_degenerate() {
        let result = Clara::new(
            line_points(10),
            KMedoidsConfig::new(3).with_sample_size(3),
        );
        assert!(matches!(result, Err(KMedoidsError::DegenerateSample(_))));
    }

    #[test]
    fn test_sample_size_beyond_point_count_is_rejected() {
        let result = Clara::new(
            line_points(10),
            KMedoidsConfig::new(2).with_sample_size(11),
        );
        assert!(matches!(
            result,
            Err(KMedoidsError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_best_seen_dissimilarity_is_non_increasing_across_trials() {
        let points: Vec<Point> = (0..30)
            .map(|id| {
                let x = if id < 15 {
                    id as f64
                } else {
                    200.0 + id as f64
                };
                Point::new(id, array![x])
            })
            .collect();
        let config = KMedoidsConfig::new(2).with_sample_size(8).with_seed(11);
        let mut clara = Clara::new(points, config).unwrap();
        clara.run().unwrap();

        assert_eq!(clara.trial_best.len(), TRIALS);
        for window in clara.trial_best.windows(2) {
            assert!(window[1] <= window[0]);
        }
        // the final state carries the best-seen set
        assert_eq!(clara.dissimilarity(), *clara.trial_best.last().unwrap());
    }

    #[test]
    fn test_medoids_are_members_of_the_dataset() {
        let mut clara = Clara::new(
            two_group_points(),
            KMedoidsConfig::new(2).with_seed(3),
        )
        .unwrap();
        clara.fit().unwrap();

        let medoids = clara.medoid_ids();
        assert_eq!(medoids.len(), 2);
        for id in &medoids {
            assert!(*id < 10);
        }
        assert_ne!(medoids[0], medoids[1]);
    }

    #[test]
    fn test_well_separated_groups_land_in_distinct_clusters() {
        // sample size defaults to the full set here, so every trial runs
        // the exact swap search
        let mut clara = Clara::new(
            two_group_points(),
            KMedoidsConfig::new(2).with_seed(9),
        )
        .unwrap();
        let result = clara.fit().unwrap();

        let near = &result.points[0].cluster;
        let far = &result.points[9].cluster;
        assert_ne!(near, far);
        for row in &result.points {
            let expected = if row.id < 5 { near } else { far };
            assert_eq!(&row.cluster, expected);
        }
    }

    #[test]
    fn test_labels_map_onto_clusters() {
        let config = KMedoidsConfig::new(2)
            .with_labels(vec!["near".to_string(), "far".to_string()])
            .with_seed(4);
        let mut clara = Clara::new(two_group_points(), config).unwrap();
        let result = clara.fit().unwrap();

        for row in &result.points {
            assert!(row.cluster == "near" || row.cluster == "far");
        }
    }

    #[test]
    fn test_same_seed_reproduces_the_same_clustering() {
        let run = |seed: u64| {
            let config = KMedoidsConfig::new(3).with_sample_size(12).with_seed(seed);
            let mut clara = Clara::new(line_points(40), config).unwrap();
            let result = clara.fit().unwrap();
            result
                .points
                .iter()
                .map(|row| (row.id, row.nearest_medoid, row.cluster.clone()))
                .collect::<Vec<_>>()
        };

        assert_eq!(run(21), run(21));
    }
}
