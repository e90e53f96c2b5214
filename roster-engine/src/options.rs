use std::time::Duration;

/// Search configuration for one solve invocation.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Wall-clock budget for the whole invocation, feasibility and
    /// optimisation together.
    pub budget: Duration,
    /// Worker threads used to probe relaxation levels in parallel.
    pub workers: usize,
    /// Recorded in the report; the backend search is deterministic, so two
    /// runs with the same input and seed yield the same roster.
    pub seed: Option<u64>,
    /// Relative-gap early stop for the optimisation pass.
    pub relative_gap: f64,
    /// Memory ceiling handed to the backend, in MiB.
    pub memory_mb: u64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            budget: Duration::from_secs(300),
            workers: default_workers(),
            seed: None,
            relative_gap: 0.01,
            memory_mb: 2048,
        }
    }
}

impl SolveOptions {
    /// Options with a tight budget, for tests and interactive previews.
    pub fn with_budget(budget: Duration) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SolveOptions::default();
        assert_eq!(options.budget, Duration::from_secs(300));
        assert!(options.workers >= 1 && options.workers <= 8);
        assert!((options.relative_gap - 0.01).abs() < f64::EPSILON);
    }
}
