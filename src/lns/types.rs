//! Core traits for LNS.

use super::error::{InvalidSolution, OperatorError};
use super::neighborhood::Neighborhood;
use rand::Rng;
use std::time::Duration;

/// Random source threaded through the engine and every candidate.
pub type LnsRng = rand_chacha::ChaCha8Rng;

/// A candidate solution over some problem instance.
///
/// `Clone` must produce a deep copy: no mutable state may be shared
/// between two copies, since neighborhood members are mutated
/// independently (and possibly on different threads).
///
/// # Minimization
///
/// The search minimizes [`cost`](LnsSolution::cost). For maximization,
/// negate the objective.
pub trait LnsSolution: Clone + Send {
    /// Total objective value. Lower is better.
    fn cost(&self) -> f64;

    /// Checks feasibility after the solution became the incumbent.
    fn verify(&self) -> Result<(), InvalidSolution>;
}

/// Builds the starting solution for an instance.
///
/// Any `Fn(&I) -> S` closure or function is an initial constructor;
/// implement the trait directly for stochastic constructors that need
/// the engine's random source.
pub trait InitialSolution<I>: Send + Sync {
    type Solution: LnsSolution;

    fn build<R: Rng>(&self, instance: &I, rng: &mut R) -> Self::Solution;
}

impl<I, S, F> InitialSolution<I> for F
where
    F: Fn(&I) -> S + Send + Sync,
    S: LnsSolution,
{
    type Solution = S;

    fn build<R: Rng>(&self, instance: &I, _rng: &mut R) -> S {
        self(instance)
    }
}

/// A destroy operator removes part of a solution.
///
/// Implementors provide the single-candidate [`destroy`](Self::destroy);
/// [`destroy_batch`](Self::destroy_batch) applies it to every member of a
/// neighborhood, each with its own random stream. Operators with a native
/// batched implementation may override the batch method, but must keep
/// candidates isolated from each other.
pub trait DestroyOperator<S>: Send + Sync {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Destroys part of `solution` in place.
    fn destroy<R: Rng>(&self, solution: &mut S, rng: &mut R) -> Result<(), OperatorError>;

    /// Destroys part of every candidate in the neighborhood.
    fn destroy_batch(&self, neighborhood: &mut Neighborhood<S>) -> Result<(), OperatorError>
    where
        S: LnsSolution,
    {
        neighborhood.try_for_each(|solution, rng| self.destroy(solution, rng))
    }
}

/// A repair operator reconstructs a partially destroyed solution.
pub trait RepairOperator<S>: Send + Sync {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Repairs `solution` in place.
    fn repair<R: Rng>(&self, solution: &mut S, rng: &mut R) -> Result<(), OperatorError>;

    /// Repairs every candidate in the neighborhood.
    fn repair_batch(&self, neighborhood: &mut Neighborhood<S>) -> Result<(), OperatorError>
    where
        S: LnsSolution,
    {
        neighborhood.try_for_each(|solution, rng| self.repair(solution, rng))
    }
}

/// A named destroy/repair pair, the unit of operator selection.
///
/// Heterogeneous operator sets are expressed with enum dispatch over
/// concrete operators, so all pairs share the same `D` and `R` types.
#[derive(Debug, Clone)]
pub struct OperatorPair<D, R> {
    name: String,
    pub destroy: D,
    pub repair: R,
}

impl<D, R> OperatorPair<D, R> {
    pub fn new(name: impl Into<String>, destroy: D, repair: R) -> Self {
        Self {
            name: name.into(),
            destroy,
            repair,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of one base step: one destroy+repair pass over a neighborhood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    /// Index of the operator pair that was applied.
    pub operator: usize,

    /// Slot of the cheapest candidate (first index on ties).
    pub best_index: usize,

    /// Cost of the cheapest candidate.
    pub best_cost: f64,

    /// Annealing temperature at the end of the step, if any.
    pub temperature: Option<f64>,

    /// Wall time spent in destroy and repair.
    pub elapsed: Duration,
}
