//! # kmedoids-rs
//!
//! k-medoids clustering in Rust: the PAM swap-search optimizer and the
//! CLARA sampling wrapper.
//!
//! Unlike k-means, k-medoids picks cluster representatives from the data
//! itself, minimizing the mean distance between each point and its nearest
//! representative (the "medoid").
//!
//! ## Features
//!
//! - **Incremental swap costs**: per-point nearest/second-nearest medoid
//!   bookkeeping makes evaluating a candidate swap O(n) instead of O(n * k)
//! - **PAM**: exhaustive swap-based local search, exact on small datasets
//! - **CLARA**: five sampled PAM trials scored against the full dataset,
//!   making large datasets tractable
//! - **Parallel search**: the swap-candidate grid is evaluated with rayon,
//!   with deterministic tie-breaking
//! - **Reproducible**: all randomness flows from one explicit seeded
//!   generator; equal seeds give equal clusterings
//!
//! ## Example
//!
//! ```rust
//! use kmedoids_rs::{KMedoidsConfig, Pam, Point};
//! use ndarray::array;
//!
//! let points = vec![
//!     Point::new(0, array![0.0, 0.0]),
//!     Point::new(1, array![1.0, 0.5]),
//!     Point::new(2, array![0.5, 1.0]),
//!     Point::new(3, array![10.0, 10.0]),
//!     Point::new(4, array![11.0, 10.5]),
//!     Point::new(5, array![10.5, 11.0]),
//! ];
//!
//! let mut pam = Pam::new(points, KMedoidsConfig::new(2).with_seed(42)).unwrap();
//! let result = pam.fit().unwrap();
//!
//! assert_eq!(result.len(), 6);
//! assert_ne!(result.points[0].cluster, result.points[5].cluster);
//! ```
//!
//! ## Custom configuration
//!
//! ```rust
//! use kmedoids_rs::{Clara, KMedoidsConfig, Point};
//! use ndarray::array;
//!
//! let points: Vec<Point> = (0..200)
//!     .map(|id| {
//!         let x = if id % 2 == 0 { id as f64 } else { 1000.0 + id as f64 };
//!         Point::new(id, array![x])
//!     })
//!     .collect();
//!
//! let config = KMedoidsConfig::new(2)
//!     .with_labels(vec!["even".to_string(), "odd".to_string()])
//!     .with_sample_size(30)
//!     .with_seed(7);
//!
//! let mut clara = Clara::new(points, config).unwrap();
//! let result = clara.fit().unwrap();
//! assert_eq!(result.len(), 200);
//! ```
//!
//! Parsing datasets into [`Point`] collections and rendering the exported
//! [`Clustering`] table are left to callers.

mod assignment;
mod clara;
mod config;
mod error;
mod pam;
mod point;

pub use assignment::{ClusteredPoint, Clustering};
pub use clara::Clara;
pub use config::KMedoidsConfig;
pub use error::KMedoidsError;
pub use pam::Pam;
pub use point::{MedoidRef, Point};
