//! LNS configuration.

use super::selection::SelectionMode;

/// Configuration for the LNS engine.
///
/// Budgets (step count and wall-clock limit) are passed per run to
/// [`LnsEngine::solve`](super::LnsEngine::solve).
///
/// # Examples
///
/// ```
/// use u_lns::lns::LnsConfig;
///
/// let config = LnsConfig::default()
///     .with_neighborhood_size(64)
///     .with_adaptive(true)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LnsConfig {
    /// Number of candidates generated from the incumbent per iteration.
    pub neighborhood_size: usize,

    /// Select operators by performance score instead of uniformly.
    pub adaptive: bool,

    /// Smoothing factor of the performance EMA, in (0, 1].
    pub ema_alpha: f64,

    /// Whether to run destroy/repair on rayon workers.
    ///
    /// Ignored when the crate is built without the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for LnsConfig {
    fn default() -> Self {
        Self {
            neighborhood_size: 100,
            adaptive: false,
            ema_alpha: 0.2,
            parallel: true,
            seed: None,
        }
    }
}

impl LnsConfig {
    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }

    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    pub fn with_ema_alpha(mut self, alpha: f64) -> Self {
        self.ema_alpha = alpha;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn selection_mode(&self) -> SelectionMode {
        if self.adaptive {
            SelectionMode::Adaptive
        } else {
            SelectionMode::Uniform
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.neighborhood_size == 0 {
            return Err("neighborhood_size must be positive".into());
        }
        if !(self.ema_alpha > 0.0 && self.ema_alpha <= 1.0) {
            return Err(format!(
                "ema_alpha must be in (0, 1], got {}",
                self.ema_alpha
            ));
        }
        Ok(())
    }
}
