//! Reheating schedule configuration.

/// Configuration for simulated-annealing LNS with periodic reheating.
///
/// The run's time budget is split into `n_reheating` equal phases. Each
/// phase derives its own starting temperature from the spread of the
/// first neighborhood it evaluates and cools towards `min_temperature`.
///
/// # Examples
///
/// ```
/// use u_lns::annealing::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_reset_percentage(0.5)
///     .with_reheating(3);
/// assert_eq!(config.reset_count(10), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealingConfig {
    /// Leading fraction of the neighborhood restarted from the incumbent
    /// before every micro-iteration, in [0, 1].
    pub reset_percentage: f64,

    /// Number of equal-length reheating phases. Must be positive.
    pub n_reheating: u32,

    /// Temperature reached at the end of each phase (`t_min`).
    pub min_temperature: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            reset_percentage: 0.8,
            n_reheating: 5,
            min_temperature: 10.0,
        }
    }
}

impl AnnealingConfig {
    pub fn with_reset_percentage(mut self, p: f64) -> Self {
        self.reset_percentage = p;
        self
    }

    pub fn with_reheating(mut self, n: u32) -> Self {
        self.n_reheating = n;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    /// Number of leading slots reset out of a neighborhood of `size`.
    #[inline]
    pub fn reset_count(&self, size: usize) -> usize {
        ((self.reset_percentage * size as f64).floor() as usize).min(size)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.reset_percentage) {
            return Err(format!(
                "reset_percentage must be in [0, 1], got {}",
                self.reset_percentage
            ));
        }
        if self.n_reheating == 0 {
            return Err("n_reheating must be positive".into());
        }
        if !(self.min_temperature > 0.0 && self.min_temperature.is_finite()) {
            return Err(format!(
                "min_temperature must be positive and finite, got {}",
                self.min_temperature
            ));
        }
        Ok(())
    }
}
