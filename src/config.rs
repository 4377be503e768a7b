/// Configuration shared by the PAM and CLARA algorithms
#[derive(Debug, Clone)]
pub struct KMedoidsConfig {
    /// Number of clusters
    pub k: usize,

    /// Optional cluster labels. When given, the list must have exactly `k`
    /// entries; labels are paired positionally with the current medoid
    /// ordering at export time. Without labels, clusters are named
    /// "0".."k-1" in that same positional order.
    pub labels: Option<Vec<String>>,

    /// Optional names for the coordinate dimensions, used as column names
    /// in the exported result. Defaults to "x0".."x{d-1}".
    pub coordinate_names: Option<Vec<String>>,

    /// Sample size for CLARA's sampled PAM trials.
    /// Defaults to `min(40 + 2 * k, n)`. Ignored by plain PAM.
    pub sample_size: Option<usize>,

    /// Maximum number of swap iterations for PAM. The search normally stops
    /// well before this, as soon as no candidate swap improves the total
    /// dissimilarity.
    pub max_iters: usize,

    /// Seed for the random generator driving initial medoid selection and
    /// CLARA's subsampling
    pub seed: u64,

    /// Print verbose output during the swap search and CLARA trials
    pub verbose: bool,
}

impl Default for KMedoidsConfig {
    fn default() -> Self {
        Self {
            k: 2,
            labels: None,
            coordinate_names: None,
            sample_size: None,
            max_iters: 100,
            seed: 0,
            verbose: false,
        }
    }
}

impl KMedoidsConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the cluster labels
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Set the coordinate dimension names
    pub fn with_coordinate_names(mut self, names: Vec<String>) -> Self {
        self.coordinate_names = Some(names);
        self
    }

    /// Set the sample size for CLARA trials
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    /// Set the maximum number of swap iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
