#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options that control how a [`Solver`](super::Solver) runs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Whether to simplify every cell of the Jacobian once, when the solver is built.
    ///
    /// Simplified cells evaluate to the same numbers, but usually faster, since derivatives built
    /// by the product rule are full of multiplications by `0` and `1`. Defaults to `false`.
    pub simplify_jacobian: bool,

    /// Singular values of the Jacobian at or below this value are treated as zero when taking its
    /// pseudo-inverse. Defaults to [`f64::EPSILON`].
    pub pinv_tolerance: f64,

    /// The iteration budget used by [`Solver::converge`](super::Solver::converge). If [`None`],
    /// there is no limit.
    pub max_iterations: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            simplify_jacobian: false,
            pinv_tolerance: f64::EPSILON,
            max_iterations: None,
        }
    }
}

impl SolverConfig {
    /// Creates a builder starting from the default options.
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::new()
    }
}

/// Helper struct to build a [`SolverConfig`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SolverConfigBuilder(SolverConfig);

impl SolverConfigBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to simplify the Jacobian. See [`SolverConfig::simplify_jacobian`].
    pub fn simplify_jacobian(mut self, simplify_jacobian: bool) -> Self {
        self.0.simplify_jacobian = simplify_jacobian;
        self
    }

    /// Sets the cutoff for singular values. Negative values are treated as `0`.
    pub fn pinv_tolerance(mut self, pinv_tolerance: f64) -> Self {
        self.0.pinv_tolerance = pinv_tolerance.max(0.0);
        self
    }

    /// Sets the default iteration budget. See [`SolverConfig::max_iterations`].
    pub fn max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Builds the [`SolverConfig`] struct.
    pub fn build(self) -> SolverConfig {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn defaults() {
        let config = SolverConfig::default();
        assert!(!config.simplify_jacobian);
        assert_eq!(config.pinv_tolerance, f64::EPSILON);
        assert_eq!(config.max_iterations, None);
        assert_eq!(SolverConfigBuilder::new().build(), config);
    }

    #[test]
    fn builder_sets_fields() {
        let config = SolverConfig::builder()
            .simplify_jacobian(true)
            .pinv_tolerance(-1.0)
            .max_iterations(Some(20))
            .build();

        assert_eq!(config, SolverConfig {
            simplify_jacobian: true,
            pinv_tolerance: 0.0,
            max_iterations: Some(20),
        });
    }
}
