//! Large Neighborhood Search (LNS).
//!
//! LNS repeatedly destroys part of the incumbent and repairs it. Each
//! iteration materializes a whole neighborhood of copies, applies one
//! destroy/repair pair to all of them (concurrently with the `parallel`
//! feature), and keeps the cheapest candidate if the acceptance policy
//! agrees. Operator pairs are picked uniformly at random or, in adaptive
//! mode, by an exponential moving average of their improvement rate.
//!
//! # References
//!
//! - Shaw (1998), "Using Constraint Programming and Local Search Methods
//!   to Solve Vehicle Routing Problems"
//! - Pisinger & Ropke (2010), "Large Neighborhood Search"

mod acceptance;
mod config;
mod error;
mod neighborhood;
mod runner;
mod selection;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use acceptance::{
    metropolis_probability, AcceptancePolicy, GreedyAcceptance, MetropolisAcceptance,
};
pub use config::LnsConfig;
pub use error::{InvalidSolution, LnsError, OperatorError};
pub use neighborhood::{explore, Neighborhood};
pub use runner::{
    GreedyStep, Iteration, LnsEngine, LnsResult, SearchState, StepContext, StepStrategy,
};
pub use selection::{OperatorSelector, PerformanceScore, SelectionMode, MIN_ITERATION_SECS};
pub use types::{
    DestroyOperator, InitialSolution, LnsRng, LnsSolution, OperatorPair, RepairOperator,
    StepRecord,
};
