//! Simulated-annealing LNS with periodic reheating.
//!
//! The time budget is split into equal phases. Each phase restarts the
//! temperature from the cost spread of its first neighborhood and cools it
//! exponentially to `min_temperature`. Inside a phase the search runs many
//! destroy/repair micro-steps; the incumbent only changes at the end of the
//! phase, through the Metropolis criterion.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Ropke & Pisinger (2006), "An Adaptive Large Neighborhood Search Heuristic
//!   for the Pickup and Delivery Problem with Time Windows"

mod config;
mod runner;
mod schedule;

pub use config::AnnealingConfig;
pub use runner::{AnnealingLns, ReheatingStep};
pub use schedule::{percentile, TemperatureSchedule, TemperatureState};
