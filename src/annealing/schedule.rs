//! Per-phase temperature schedule.
//!
//! Each reheating phase fixes `t_max` from the interquartile range of its
//! first neighborhood's costs:
//!
//! ```text
//! t_max    = q75 - q25 + t_min
//! t_factor = -ln(t_max / t_min)
//! T(t)     = t_max * exp(t_factor * t / phase_length)
//! ```
//!
//! so `T` falls from `t_max` at the start of the phase to `t_min` at its
//! end.

use std::time::{Duration, Instant};

/// Annealing parameters of one reheating phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSchedule {
    t_max: f64,
    t_factor: f64,
}

impl TemperatureSchedule {
    /// Builds a schedule from explicit parameters. `t_factor` should be
    /// non-positive for a cooling curve.
    pub fn new(t_max: f64, t_factor: f64) -> Self {
        Self { t_max, t_factor }
    }

    /// Derives the schedule from a neighborhood's candidate costs.
    ///
    /// A non-finite spread (infinite or NaN costs) collapses `t_max` to
    /// `t_min`, giving a constant temperature for the phase.
    pub fn from_costs(costs: &[f64], t_min: f64) -> Self {
        let mut sorted = costs.to_vec();
        sorted.sort_by(f64::total_cmp);

        let spread = match (percentile(&sorted, 75.0), percentile(&sorted, 25.0)) {
            (Some(q75), Some(q25)) => q75 - q25,
            _ => 0.0,
        };
        let t_max = if spread.is_finite() {
            spread + t_min
        } else {
            t_min
        };

        Self {
            t_max,
            t_factor: -(t_max / t_min).ln(),
        }
    }

    #[inline]
    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    #[inline]
    pub fn t_factor(&self) -> f64 {
        self.t_factor
    }

    /// Temperature after `fraction` of the phase, clamped to [0, 1].
    #[inline]
    pub fn temperature_at(&self, fraction: f64) -> f64 {
        self.t_max * (self.t_factor * fraction.clamp(0.0, 1.0)).exp()
    }

    /// Temperature `elapsed` into a phase of `phase_length`.
    pub fn temperature(&self, elapsed: Duration, phase_length: Duration) -> f64 {
        if phase_length.is_zero() {
            return self.temperature_at(1.0);
        }
        self.temperature_at(elapsed.as_secs_f64() / phase_length.as_secs_f64())
    }
}

/// Reheating cycle position and current temperature.
#[derive(Debug, Clone, Default)]
pub struct TemperatureState {
    /// Phases started so far.
    pub phase: usize,

    /// Parameters of the current phase, once its first neighborhood is seen.
    pub schedule: Option<TemperatureSchedule>,

    /// Last temperature computed in the current phase.
    pub temperature: Option<f64>,

    /// When the current phase started.
    pub phase_started: Option<Instant>,
}

impl TemperatureState {
    /// Opens a new phase; its schedule is computed lazily.
    pub fn begin_phase(&mut self, now: Instant) {
        self.phase += 1;
        self.schedule = None;
        self.temperature = None;
        self.phase_started = Some(now);
    }
}

/// Percentile of already-sorted values, interpolating linearly between the
/// closest ranks. `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (p / 100.0).clamp(0.0, 1.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let w = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * w)
}
