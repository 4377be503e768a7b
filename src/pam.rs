use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::assignment::{Assignment, Clustering};
use crate::config::KMedoidsConfig;
use crate::error::KMedoidsError;
use crate::point::Point;

/// One evaluated (medoid, candidate) replacement pair. The positions record
/// where the pair sits in the deterministic evaluation order and break ties
/// between equal-cost pairs.
#[derive(Debug, Clone, Copy)]
struct SwapCandidate {
    medoid_position: usize,
    old_medoid: usize,
    candidate_position: usize,
    new_medoid: usize,
    cost: f64,
}

/// Partitioning Around Medoids: exhaustive swap-based local search.
///
/// Starting from a random medoid set, every (medoid, non-medoid candidate)
/// pair is scored by the incremental replacement cost and the single best
/// swap is applied, until no swap strictly decreases the total
/// dissimilarity. The search is exact but O(k * (n - k) * n) per iteration,
/// which is what makes [`Clara`](crate::Clara) necessary on large datasets.
///
/// # Example
///
/// ```
/// use kmedoids_rs::{KMedoidsConfig, Pam, Point};
/// use ndarray::array;
///
/// let points = vec![
///     Point::new(0, array![0.0]),
///     Point::new(1, array![1.0]),
///     Point::new(2, array![2.0]),
///     Point::new(3, array![10.0]),
///     Point::new(4, array![11.0]),
///     Point::new(5, array![12.0]),
/// ];
///
/// let mut pam = Pam::new(points, KMedoidsConfig::new(2)).unwrap();
/// let result = pam.fit().unwrap();
/// assert_eq!(result.len(), 6);
///
/// // the two well-separated groups are represented by their middle points
/// let mut medoids = pam.medoid_ids();
/// medoids.sort_unstable();
/// assert_eq!(medoids, vec![1, 4]);
/// ```
pub struct Pam {
    assignment: Assignment,
    max_iters: usize,
    verbose: bool,
}

impl Pam {
    /// Validate the configuration and select the initial medoid set using a
    /// generator seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`KMedoidsError::InvalidConfiguration`] if `k` is zero, `k`
    /// is not smaller than the number of points, or a supplied label or
    /// coordinate-name list has the wrong length.
    pub fn new(points: Vec<Point>, config: KMedoidsConfig) -> Result<Self, KMedoidsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(points, &config, &mut rng)
    }

    /// Construct with an externally owned generator. CLARA threads its own
    /// generator through here so that every trial draws from one stream.
    pub(crate) fn with_rng(
        points: Vec<Point>,
        config: &KMedoidsConfig,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self, KMedoidsError> {
        let assignment = Assignment::new(points, config, rng)?;
        Ok(Self {
            assignment,
            max_iters: config.max_iters,
            verbose: config.verbose,
        })
    }

    /// Run the swap search to convergence and export the result table.
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

    pub(crate) fn medoid_indices(&self) -> &[usize] {
        self.assignment.medoid_indices()
    }

    /// The INIT -> ITERATE -> CONVERGED loop. Each round evaluates every
    /// (medoid, candidate) pair against the frozen assignment snapshot and
    /// applies the single cheapest swap if it is strictly improving.
    pub(crate) fn run(&mut self) -> Result<(), KMedoidsError> {
        self.assignment.reassign_all()?;

        for iteration in 0..self.max_iters {
            let iter_start = Instant::now();
            let best = self.best_swap()?;

            if best.cost >= 0.0 {
                if self.verbose {
                    eprintln!(
                        "  Converged after {} swaps (best remaining cost {:.6})",
                        iteration, best.cost
                    );
                }
                return Ok(());
            }

            let old_id = self.assignment.points()[best.old_medoid].id();
            let new_id = self.assignment.points()[best.new_medoid].id();
            self.assignment.swap_medoids(best.old_medoid, best.new_medoid);
            self.assignment.reassign_all()?;

            if self.verbose {
                eprintln!(
                    "  Iteration {}/{}: swapped medoid {} for {} (cost {:.6}), time = {:.4}s",
                    iteration + 1,
                    self.max_iters,
                    old_id,
                    new_id,
                    best.cost,
                    iter_start.elapsed().as_secs_f64()
                );
            }
        }

        if self.verbose {
            eprintln!(
                "  Stopped after the iteration cap ({}) without convergence",
                self.max_iters
            );
        }
        Ok(())
    }

    /// Evaluate every (medoid, candidate) pair and return the cheapest.
    ///
    /// The pair grid is evaluated in parallel against the frozen snapshot;
    /// results are collected in pair order and reduced sequentially, and
    /// ties on cost fall back to (medoid order, candidate order), so the
    /// outcome does not depend on worker timing.
    fn best_swap(&self) -> Result<SwapCandidate, KMedoidsError> {
        let medoids = self.assignment.medoid_indices();
        let candidates: Vec<usize> = (0..self.assignment.points().len())
            .filter(|index| !medoids.contains(index))
            .collect();

        if candidates.is_empty() {
            return Err(KMedoidsError::DegenerateSample(
                "no non-medoid candidates left to evaluate".to_string(),
            ));
        }

        let mut pairs = Vec::with_capacity(medoids.len() * candidates.len());
        for (medoid_position, &old_medoid) in medoids.iter().enumerate() {
            for (candidate_position, &new_medoid) in candidates.iter().enumerate() {
                pairs.push((medoid_position, old_medoid, candidate_position, new_medoid));
            }
        }

        let evaluated: Result<Vec<SwapCandidate>, KMedoidsError> = pairs
            .par_iter()
            .map(
                |&(medoid_position, old_medoid, candidate_position, new_medoid)| {
                    let cost = self.swap_cost(old_medoid, new_medoid)?;
                    Ok(SwapCandidate {
                        medoid_position,
                        old_medoid,
                        candidate_position,
                        new_medoid,
                        cost,
                    })
                },
            )
            .collect();

        let best = evaluated?
            .into_iter()
            .min_by(|a, b| {
                a.cost.total_cmp(&b.cost).then_with(|| {
                    (a.medoid_position, a.candidate_position)
                        .cmp(&(b.medoid_position, b.candidate_position))
                })
            })
            .expect("candidate list is non-empty");

        Ok(best)
    }

    /// Total cost of replacing `old_medoid` with `new_medoid`: the sum of
    /// per-point replacement costs over every point that is neither a
    /// medoid nor the candidate itself. O(n) per pair.
    pub(crate) fn swap_cost(
        &self,
        old_medoid: usize,
        new_medoid: usize,
    ) -> Result<f64, KMedoidsError> {
        let points = self.assignment.points();
        let medoids = self.assignment.medoid_indices();
        let candidate = &points[new_medoid];

        let mut cost = 0.0;
        for (index, point) in points.iter().enumerate() {
            if index == new_medoid || medoids.contains(&index) {
                continue;
            }
            cost += point.replacement_cost(index, old_medoid, candidate, medoids)?;
        }
        Ok(cost)
    }
}
