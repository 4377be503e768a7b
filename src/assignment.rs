use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::config::KMedoidsConfig;
use crate::error::KMedoidsError;
use crate::point::{MedoidRef, Point};

/// One row of the exported result table
#[derive(Debug, Clone)]
pub struct ClusteredPoint {
    /// Identifier of the input point
    pub id: usize,
    /// Coordinates of the input point
    pub coordinates: Vec<f64>,
    /// Identifier of the nearest medoid
    pub nearest_medoid: usize,
    /// Distance to the nearest medoid
    pub nearest_distance: f64,
    /// Identifier of the second-nearest medoid (`None` for medoids and
    /// single-medoid runs)
    pub second_nearest_medoid: Option<usize>,
    /// Distance to the second-nearest medoid
    pub second_nearest_distance: Option<f64>,
    /// Label of the cluster the point belongs to
    pub cluster: String,
}

/// Result of a clustering run: one record per input point, in input order
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Names of the coordinate dimensions
    pub coordinate_names: Vec<String>,
    /// One row per input point
    pub points: Vec<ClusteredPoint>,
}

impl Clustering {
    /// Number of clustered points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the result holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Column names of the tabular view of this result, in order:
    /// idx, one column per coordinate dimension, the medoid bookkeeping
    /// columns, and the mapped cluster label.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec!["idx".to_string()];
        columns.extend(self.coordinate_names.iter().cloned());
        columns.extend(
            [
                "nearest_medoid",
                "nearest_medoid_distance",
                "second_nearest_medoid",
                "second_nearest_medoid_distance",
                "cluster",
            ]
            .map(String::from),
        );
        columns
    }
}

/// Shared medoid-set bookkeeping used by both optimizers: the point arena,
/// the ordered medoid index set, and the label mapping. Mutation happens
/// through full reassignment passes and explicit swaps only.
#[derive(Debug, Clone)]
pub(crate) struct Assignment {
    points: Vec<Point>,
    /// Arena indices of the current medoids. Order is the swap order
    /// (remove old, append new) and drives the label mapping.
    medoids: Vec<usize>,
    labels: Option<Vec<String>>,
    coordinate_names: Vec<String>,
}

impl Assignment {
    /// Validate the configuration against the point set and select the
    /// initial medoids: a uniform sample of k distinct arena indices.
    pub(crate) fn new(
        points: Vec<Point>,
        config: &KMedoidsConfig,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self, KMedoidsError> {
        let k = config.k;

        if k == 0 {
            return Err(KMedoidsError::InvalidConfiguration(
                "k must be greater than 0".to_string(),
            ));
        }
        if k >= points.len() {
            return Err(KMedoidsError::InvalidConfiguration(format!(
                "k ({}) must be smaller than the number of points ({})",
                k,
                points.len()
            )));
        }
        if let Some(labels) = &config.labels {
            if labels.len() != k {
                return Err(KMedoidsError::InvalidConfiguration(format!(
                    "{} labels were supplied for {} clusters",
                    labels.len(),
                    k
                )));
            }
        }

        let dimensions = points[0].dimensions();
        let coordinate_names = match &config.coordinate_names {
            Some(names) => {
                if names.len() != dimensions {
                    return Err(KMedoidsError::InvalidConfiguration(format!(
                        "{} coordinate names were supplied for {} dimensions",
                        names.len(),
                        dimensions
                    )));
                }
                names.clone()
            }
            None => (0..dimensions).map(|i| format!("x{}", i)).collect(),
        };

        let indices: Vec<usize> = (0..points.len()).collect();
        let medoids: Vec<usize> = indices.choose_multiple(rng, k).copied().collect();

        Ok(Self {
            points,
            medoids,
            labels: config.labels.clone(),
            coordinate_names,
        })
    }

    pub(crate) fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn medoid_indices(&self) -> &[usize] {
        &self.medoids
    }

    /// Identifiers of the current medoids, in medoid-set order
    pub(crate) fn medoid_ids(&self) -> Vec<usize> {
        self.medoids.iter().map(|&m| self.points[m].id()).collect()
    }

    /// Replace the whole medoid set (CLARA adopting a trial's candidate)
    pub(crate) fn set_medoids(&mut self, medoids: Vec<usize>) {
        self.medoids = medoids;
    }

    /// Swap one medoid for a candidate: remove the old index, append the
    /// new one. Changes medoid order, and with it the label mapping.
    pub(crate) fn swap_medoids(&mut self, old_medoid: usize, new_medoid: usize) {
        self.medoids.retain(|&m| m != old_medoid);
        self.medoids.push(new_medoid);
    }

    /// Recompute nearest and second-nearest medoid for every point from
    /// scratch. O(n * k).
    pub(crate) fn reassign_all(&mut self) -> Result<(), KMedoidsError> {
        for index in 0..self.points.len() {
            let (nearest, second_nearest) = self.scan_medoids(index)?;
            self.points[index].set_assignment(nearest, second_nearest);
        }
        Ok(())
    }

    /// O(k) scan over the medoid set in its current order, keeping the
    /// running minimum and second-minimum. Ties keep the first-encountered
    /// medoid, so the scan order (the medoid-set order) is significant for
    /// reproducibility.
    fn scan_medoids(
        &self,
        index: usize,
    ) -> Result<(Option<MedoidRef>, Option<MedoidRef>), KMedoidsError> {
        if self.medoids.contains(&index) {
            return Ok((
                Some(MedoidRef {
                    index,
                    distance: 0.0,
                }),
                None,
            ));
        }

        let point = &self.points[index];
        let mut nearest: Option<MedoidRef> = None;
        let mut second_nearest: Option<MedoidRef> = None;

        for &medoid in &self.medoids {
            let distance = point.distance(&self.points[medoid])?;
            match nearest {
                Some(current) if distance >= current.distance => {
                    if second_nearest.map_or(true, |second| distance < second.distance) {
                        second_nearest = Some(MedoidRef {
                            index: medoid,
                            distance,
                        });
                    }
                }
                _ => {
                    second_nearest = nearest;
                    nearest = Some(MedoidRef {
                        index: medoid,
                        distance,
                    });
                }
            }
        }

        Ok((nearest, second_nearest))
    }

    /// Mean distance from each point to its nearest medoid; the objective
    /// both optimizers minimize. Valid after a reassignment pass.
    pub(crate) fn dissimilarity(&self) -> f64 {
        let total: f64 = self
            .points
            .iter()
            .filter_map(|point| point.nearest())
            .map(|nearest| nearest.distance)
            .sum();
        total / self.points.len() as f64
    }

    /// Map each medoid arena index to its cluster label: caller-supplied
    /// labels paired positionally with the current medoid order, or the
    /// positions themselves when no labels were given.
    fn cluster_labels(&self) -> HashMap<usize, String> {
        self.medoids
            .iter()
            .enumerate()
            .map(|(position, &medoid)| {
                let label = match &self.labels {
                    Some(labels) => labels[position].clone(),
                    None => position.to_string(),
                };
                (medoid, label)
            })
            .collect()
    }

    /// Export one record per point. Valid after a reassignment pass.
    pub(crate) fn export(&self) -> Clustering {
        let labels = self.cluster_labels();
        let points = self
            .points
            .iter()
            .map(|point| {
                let nearest = point
                    .nearest()
                    .expect("every point is assigned after a reassignment pass");
                ClusteredPoint {
                    id: point.id(),
                    coordinates: point.coordinates().to_vec(),
                    nearest_medoid: self.points[nearest.index].id(),
                    nearest_distance: nearest.distance,
                    second_nearest_medoid: point
                        .second_nearest()
                        .map(|second| self.points[second.index].id()),
                    second_nearest_distance: point.second_nearest().map(|second| second.distance),
                    cluster: labels[&nearest.index].clone(),
                }
            })
            .collect();

        Clustering {
            coordinate_names: self.coordinate_names.clone(),
            points,
        }
    }
}
