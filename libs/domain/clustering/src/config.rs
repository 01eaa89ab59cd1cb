// [libs/domain/clustering/src/config.rs]

/// Tunable parameters of the online assignment algorithm. Defaults
/// match the documented baseline values; callers may override via
/// `CLUSTER_*` environment variables.
#[derive(Debug, Clone, Copy)]
pub struct ClusteringConfig {
    /// `R_m`: join radius, in meters.
    pub join_radius_meters: f64,
    /// `T_min`: recency window, in minutes.
    pub recency_window_minutes: i64,
    /// `H`: member count at/above which severity is raised to at least High.
    pub high_threshold: u32,
    /// `C`: member count at/above which severity is raised to Critical.
    pub critical_threshold: u32,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            join_radius_meters: 100.0,
            recency_window_minutes: 30,
            high_threshold: 3,
            critical_threshold: 5,
        }
    }
}
