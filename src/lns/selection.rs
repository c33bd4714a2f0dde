//! Operator registry scores and selection.

use rand::Rng;
use std::time::Duration;

/// Smallest iteration duration, in seconds, used as a throughput divisor.
///
/// Shorter destroy+repair passes are clamped to this value so the
/// improvement rate stays finite.
pub const MIN_ITERATION_SECS: f64 = 1e-6;

/// How the next operator pair is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionMode {
    /// Uniform random choice, independent on every call.
    Uniform,
    /// Highest performance score wins; unsampled operators rank first.
    Adaptive,
}

/// Exponentially smoothed improvement rate of one operator pair.
///
/// Starts unknown, which ranks as `+inf` so that every operator is tried
/// once before scores are compared.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerformanceScore(Option<f64>);

impl PerformanceScore {
    pub const UNKNOWN: Self = Self(None);

    /// Smoothed value, or `None` before the first sample.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.0
    }

    /// Value used for ranking; unknown scores are `+inf`.
    #[inline]
    pub fn rank(&self) -> f64 {
        self.0.unwrap_or(f64::INFINITY)
    }

    /// Folds in one sample: the first sample is taken as-is, later ones
    /// via `score * (1 - alpha) + sample * alpha`. The result is kept
    /// within the finite `f64` range.
    pub fn observe(&mut self, sample: f64, alpha: f64) {
        let blended = match self.0 {
            None => sample,
            Some(score) => score * (1.0 - alpha) + sample * alpha,
        };
        self.0 = Some(finite_or_floor(blended));
    }
}

/// Chooses one operator pair per iteration and tracks its performance.
#[derive(Debug, Clone)]
pub struct OperatorSelector {
    mode: SelectionMode,
    alpha: f64,
    scores: Vec<PerformanceScore>,
    usage: Vec<usize>,
}

impl OperatorSelector {
    pub fn new(n_operators: usize, mode: SelectionMode, alpha: f64) -> Self {
        Self {
            mode,
            alpha,
            scores: vec![PerformanceScore::UNKNOWN; n_operators],
            usage: vec![0; n_operators],
        }
    }

    #[inline]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    #[inline]
    pub fn scores(&self) -> &[PerformanceScore] {
        &self.scores
    }

    /// Number of times each operator has been selected.
    #[inline]
    pub fn usage(&self) -> &[usize] {
        &self.usage
    }

    /// Returns the index of the next operator pair.
    ///
    /// # Panics
    /// Panics if the selector was built with zero operators.
    pub fn select<R: Rng>(&mut self, rng: &mut R) -> usize {
        let idx = match self.mode {
            SelectionMode::Uniform => rng.random_range(0..self.scores.len()),
            SelectionMode::Adaptive => self.best_index(),
        };
        self.usage[idx] += 1;
        idx
    }

    /// Records one iteration of operator `index`.
    ///
    /// The sample is `improvement / elapsed_secs` with `elapsed_secs`
    /// clamped to [`MIN_ITERATION_SECS`]. Infinite samples saturate to
    /// `±f64::MAX` and NaN counts as `-f64::MAX`, so the operator is still
    /// marked as sampled and one producing infinite costs ranks last.
    /// Returns the sample that was folded in. No-op in uniform mode.
    pub fn record(&mut self, index: usize, improvement: f64, elapsed: Duration) -> Option<f64> {
        if self.mode != SelectionMode::Adaptive {
            return None;
        }

        let mut secs = elapsed.as_secs_f64();
        if secs < MIN_ITERATION_SECS {
            tracing::trace!(operator = index, secs, "clamping iteration duration");
            secs = MIN_ITERATION_SECS;
        }

        let raw = improvement / secs;
        let sample = finite_or_floor(raw);
        if !raw.is_finite() {
            tracing::trace!(
                operator = index,
                improvement,
                sample,
                "saturating non-finite score sample"
            );
        }

        self.scores[index].observe(sample, self.alpha);
        Some(sample)
    }

    /// Forgets all scores and usage counts.
    pub fn reset(&mut self) {
        self.scores.fill(PerformanceScore::UNKNOWN);
        self.usage.fill(0);
    }

    /// Stable argmax over ranks.
    fn best_index(&self) -> usize {
        let mut best = 0;
        for (i, score) in self.scores.iter().enumerate().skip(1) {
            if score.rank() > self.scores[best].rank() {
                best = i;
            }
        }
        best
    }
}

/// Saturates infinities to the finite range; NaN maps to the lowest value.
#[inline]
fn finite_or_floor(x: f64) -> f64 {
    if x.is_nan() {
        -f64::MAX
    } else {
        x.clamp(-f64::MAX, f64::MAX)
    }
}
