//! Basic example demonstrating kmedoids-rs usage
//!
//! Run with: cargo run --example basic --release

use kmedoids_rs::{Clara, KMedoidsConfig, Pam, Point};
use ndarray::array;
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn generate_blobs(centers: &[[f64; 2]], per_cluster: usize, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Uniform::new(-1.0f64, 1.0);

    let mut points = Vec::with_capacity(centers.len() * per_cluster);
    for center in centers {
        for _ in 0..per_cluster {
            let id = points.len();
            points.push(Point::new(
                id,
                array![
                    center[0] + noise.sample(&mut rng),
                    center[1] + noise.sample(&mut rng)
                ],
            ));
        }
    }
    points
}

fn main() {
    println!("=== kmedoids-rs example ===\n");

    // Three clusters in 2D for easy inspection
    let centers = [[-5.0, -5.0], [0.0, 5.0], [5.0, -5.0]];
    let n_clusters = centers.len();

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    // --- PAM on a small dataset ---------------------------------------
    let points = generate_blobs(&centers, 30, 42);
    println!("Running PAM on {} points with k={}...\n", points.len(), n_clusters);

    let config = KMedoidsConfig::new(n_clusters)
        .with_coordinate_names(vec!["x".to_string(), "y".to_string()])
        .with_seed(42)
        .with_verbose(true);

    let mut pam = Pam::new(points, config).expect("PAM construction failed");
    let result = pam.fit().expect("PAM fit failed");

    println!("\nChosen medoids (dataset members):");
    for id in pam.medoid_ids() {
        let row = &result.points[id];
        println!(
            "  Point {} at ({:.4}, {:.4})",
            id, row.coordinates[0], row.coordinates[1]
        );
    }
    println!("Mean nearest-medoid distance: {:.4}\n", pam.dissimilarity());

    // Count points per cluster
    let mut cluster_counts = vec![0usize; n_clusters];
    for row in &result.points {
        let cluster: usize = row.cluster.parse().unwrap();
        cluster_counts[cluster] += 1;
    }
    println!("Cluster distribution:");
    for (i, count) in cluster_counts.iter().enumerate() {
        println!(
            "  Cluster {}: {} points ({:.1}%)",
            i,
            count,
            (*count as f64 / result.len() as f64) * 100.0
        );
    }
    println!();

    // --- CLARA on a larger dataset ------------------------------------
    let points = generate_blobs(&centers, 500, 7);
    println!(
        "Running CLARA on {} points with k={}...\n",
        points.len(),
        n_clusters
    );

    let config = KMedoidsConfig::new(n_clusters)
        .with_labels(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        .with_seed(7)
        .with_verbose(true);

    let mut clara = Clara::new(points, config).expect("CLARA construction failed");
    println!("Sample size per trial: {}", clara.sample_size());

    let result = clara.fit().expect("CLARA fit failed");

    println!("\nBest medoids: {:?}", clara.medoid_ids());
    println!("Mean nearest-medoid distance: {:.4}", clara.dissimilarity());

    println!("\nFirst 5 rows of the result table ({:?}):", result.columns());
    for row in result.points.iter().take(5) {
        println!(
            "  idx {} ({:.2}, {:.2}) -> medoid {} at {:.3}, cluster {:?}",
            row.id,
            row.coordinates[0],
            row.coordinates[1],
            row.nearest_medoid,
            row.nearest_distance,
            row.cluster
        );
    }

    println!("\n=== Done! ===");
}
