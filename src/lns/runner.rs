//! LNS execution loop.
//!
//! [`LnsEngine`] drives the search: every iteration copies the incumbent
//! into a fresh [`Neighborhood`], lets a [`StepStrategy`] run destroy and
//! repair over it, then asks an [`AcceptancePolicy`] whether the cheapest
//! candidate replaces the incumbent. The loop ends when the step budget or
//! the wall-clock budget is exhausted.

use super::acceptance::{AcceptancePolicy, GreedyAcceptance};
use super::config::LnsConfig;
use super::error::LnsError;
use super::neighborhood::Neighborhood;
use super::selection::OperatorSelector;
use super::types::{
    DestroyOperator, InitialSolution, LnsRng, LnsSolution, OperatorPair, RepairOperator,
    StepRecord,
};
use crate::random::create_rng;
use std::marker::PhantomData;
use std::time::{Duration, Instant};

/// Incumbent and budgets of one run.
#[derive(Debug, Clone)]
pub struct SearchState<S> {
    /// Current incumbent solution.
    pub solution: S,

    /// Cost of `solution`.
    pub cost: f64,

    /// Base steps executed so far.
    pub steps: usize,

    /// Start of the run (monotonic clock).
    pub started: Instant,

    /// Step budget. `usize::MAX` when unbounded.
    pub max_steps: usize,

    /// Wall-clock budget. `Duration::MAX` when unbounded.
    pub time_limit: Duration,
}

impl<S> SearchState<S> {
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[inline]
    pub fn within_budget(&self) -> bool {
        self.steps < self.max_steps && self.elapsed() < self.time_limit
    }
}

/// Everything a [`StepStrategy`] may touch during one iteration.
pub struct StepContext<'a, S, D, R> {
    pub state: &'a mut SearchState<S>,
    pub neighborhood: &'a mut Neighborhood<S>,
    operators: &'a [OperatorPair<D, R>],
    selector: &'a mut OperatorSelector,
    rng: &'a mut LnsRng,
}

impl<S, D, R> StepContext<'_, S, D, R>
where
    S: LnsSolution,
    D: DestroyOperator<S>,
    R: RepairOperator<S>,
{
    /// Selects an operator pair, applies it to the whole neighborhood and
    /// updates its performance score.
    pub fn base_step(&mut self) -> Result<StepRecord, LnsError> {
        let operator = self.selector.select(&mut *self.rng);
        let pair = &self.operators[operator];
        let elapsed = self.neighborhood.apply(pair, &mut *self.rng)?;

        let (best_index, best_cost) = self.neighborhood.best().unwrap_or((0, f64::INFINITY));
        self.selector
            .record(operator, self.state.cost - best_cost, elapsed);
        self.state.steps += 1;

        tracing::trace!(
            step = self.state.steps,
            operator = pair.name(),
            best_cost,
            ?elapsed,
            "base step"
        );

        Ok(StepRecord {
            operator,
            best_index,
            best_cost,
            temperature: None,
            elapsed,
        })
    }
}

/// Produces the step record evaluated by the acceptance policy.
///
/// Returning `Ok(None)` means no step ran (budget already exhausted) and
/// acceptance is skipped for this iteration.
pub trait StepStrategy<S: LnsSolution>: Clone + Send {
    fn name(&self) -> &str;

    /// Validates strategy parameters.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Clears per-run state. Called whenever the engine resets.
    fn reset(&mut self) {}

    fn step<D, R>(
        &mut self,
        ctx: &mut StepContext<'_, S, D, R>,
    ) -> Result<Option<StepRecord>, LnsError>
    where
        D: DestroyOperator<S>,
        R: RepairOperator<S>;
}

/// One base step per iteration.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyStep;

impl<S: LnsSolution> StepStrategy<S> for GreedyStep {
    fn name(&self) -> &str {
        "GreedyStep"
    }

    fn step<D, R>(
        &mut self,
        ctx: &mut StepContext<'_, S, D, R>,
    ) -> Result<Option<StepRecord>, LnsError>
    where
        D: DestroyOperator<S>,
        R: RepairOperator<S>,
    {
        ctx.base_step().map(Some)
    }
}

/// Outcome of one outer iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Iteration {
    /// Step evaluated by the acceptance policy, if any ran.
    pub record: Option<StepRecord>,

    /// Whether the incumbent was replaced.
    pub accepted: bool,

    /// Incumbent cost after the iteration.
    pub cost: f64,
}

/// Result of an LNS run.
#[derive(Debug, Clone)]
pub struct LnsResult<S> {
    /// Final incumbent.
    pub solution: S,

    /// Cost of `solution`.
    pub cost: f64,

    /// Base steps executed.
    pub steps: usize,

    /// Outer iterations executed.
    pub iterations: usize,

    /// Iterations whose candidate replaced the incumbent.
    pub accepted: usize,

    /// Wall time of the whole run.
    pub elapsed: Duration,

    /// Incumbent cost at the start and after every iteration.
    pub cost_history: Vec<f64>,

    /// Selection count per operator pair.
    pub operator_usage: Vec<usize>,

    /// Final performance score per operator pair (adaptive mode only).
    pub operator_scores: Vec<Option<f64>>,
}

/// Large Neighborhood Search engine.
///
/// `St` decides how an iteration explores (one base step for the greedy
/// variant, a timed inner loop for annealing); `A` decides acceptance.
///
/// # Usage
///
/// ```ignore
/// let operators = vec![OperatorPair::new("random", RandomRemoval, GreedyInsertion)];
/// let mut engine = LnsEngine::new(operators, nearest_neighbor, LnsConfig::default())?;
/// let result = engine.solve(&instance, 1_000, Duration::from_secs(10))?;
/// println!("cost: {}", result.cost);
/// ```
pub struct LnsEngine<I, C, D, R, St = GreedyStep, A = GreedyAcceptance>
where
    C: InitialSolution<I>,
{
    operators: Vec<OperatorPair<D, R>>,
    initial: C,
    config: LnsConfig,
    selector: OperatorSelector,
    strategy: St,
    acceptance: A,
    rng: LnsRng,
    state: Option<SearchState<C::Solution>>,
    _instance: PhantomData<fn(&I)>,
}

impl<I, C, D, R> LnsEngine<I, C, D, R>
where
    C: InitialSolution<I>,
    D: DestroyOperator<C::Solution>,
    R: RepairOperator<C::Solution>,
{
    /// Creates a greedy-descent engine.
    pub fn new(
        operators: Vec<OperatorPair<D, R>>,
        initial: C,
        config: LnsConfig,
    ) -> Result<Self, LnsError> {
        Self::with_strategy(operators, initial, config, GreedyStep, GreedyAcceptance)
    }
}

impl<I, C, D, R, St, A> LnsEngine<I, C, D, R, St, A>
where
    C: InitialSolution<I>,
    D: DestroyOperator<C::Solution>,
    R: RepairOperator<C::Solution>,
    St: StepStrategy<C::Solution>,
    A: AcceptancePolicy,
{
    /// Creates an engine with an explicit step strategy and acceptance policy.
    pub fn with_strategy(
        operators: Vec<OperatorPair<D, R>>,
        initial: C,
        config: LnsConfig,
        strategy: St,
        acceptance: A,
    ) -> Result<Self, LnsError> {
        config.validate().map_err(LnsError::InvalidConfig)?;
        strategy.validate().map_err(LnsError::InvalidConfig)?;
        if operators.is_empty() {
            return Err(LnsError::EmptyOperators);
        }

        Ok(Self {
            selector: OperatorSelector::new(
                operators.len(),
                config.selection_mode(),
                config.ema_alpha,
            ),
            rng: create_rng(config.seed),
            operators,
            initial,
            config,
            strategy,
            acceptance,
            state: None,
            _instance: PhantomData,
        })
    }

    #[inline]
    pub fn config(&self) -> &LnsConfig {
        &self.config
    }

    #[inline]
    pub fn operators(&self) -> &[OperatorPair<D, R>] {
        &self.operators
    }

    #[inline]
    pub fn initial(&self) -> &C {
        &self.initial
    }

    #[inline]
    pub fn selector(&self) -> &OperatorSelector {
        &self.selector
    }

    #[inline]
    pub fn strategy(&self) -> &St {
        &self.strategy
    }

    #[inline]
    pub fn acceptance(&self) -> &A {
        &self.acceptance
    }

    /// State installed by [`reset`](Self::reset), if any.
    #[inline]
    pub fn state(&self) -> Option<&SearchState<C::Solution>> {
        self.state.as_ref()
    }

    /// Builds the initial solution for `instance` and installs a fresh
    /// search state with unbounded budgets.
    pub fn reset(&mut self, instance: &I) {
        let state = self.fresh_state(instance);
        self.state = Some(state);
    }

    /// Overrides the budgets of the installed state. Returns `false` when
    /// [`reset`](Self::reset) has not been called.
    pub fn set_budget(&mut self, max_steps: usize, time_limit: Duration) -> bool {
        match self.state.as_mut() {
            Some(state) => {
                state.max_steps = max_steps;
                state.time_limit = time_limit;
                true
            }
            None => false,
        }
    }

    /// Runs one outer iteration on the installed state.
    ///
    /// Returns `Ok(None)` without a state or once the budget is exhausted.
    pub fn iterate(&mut self) -> Result<Option<Iteration>, LnsError> {
        let Some(mut state) = self.state.take() else {
            return Ok(None);
        };
        let outcome = if state.within_budget() {
            self.advance(&mut state).map(Some)
        } else {
            Ok(None)
        };
        self.state = Some(state);
        outcome
    }

    /// Solves `instance` from a fresh initial solution.
    ///
    /// Iterates while `steps < max_steps` and `elapsed < time_limit`. Pass
    /// `usize::MAX` / `Duration::MAX` for an unbounded budget. Operator
    /// failures and verification failures of an accepted incumbent abort
    /// the run.
    #[tracing::instrument(level = "debug", name = "lns_solve", skip_all)]
    pub fn solve(
        &mut self,
        instance: &I,
        max_steps: usize,
        time_limit: Duration,
    ) -> Result<LnsResult<C::Solution>, LnsError> {
        let started = Instant::now();
        let mut state = self.fresh_state(instance);
        state.started = started;
        state.max_steps = max_steps;
        state.time_limit = time_limit;

        tracing::info!(
            strategy = self.strategy.name(),
            acceptance = self.acceptance.name(),
            neighborhood_size = self.config.neighborhood_size,
            max_steps,
            ?time_limit,
            initial_cost = state.cost,
            "starting LNS"
        );

        let mut iterations = 0usize;
        let mut accepted = 0usize;
        let mut cost_history = vec![state.cost];

        while state.within_budget() {
            let outcome = self.advance(&mut state)?;
            iterations += 1;
            if outcome.accepted {
                accepted += 1;
            }
            cost_history.push(outcome.cost);
        }

        let elapsed = state.elapsed();
        tracing::info!(
            cost = state.cost,
            steps = state.steps,
            iterations,
            accepted,
            ?elapsed,
            "LNS finished"
        );

        Ok(LnsResult {
            solution: state.solution,
            cost: state.cost,
            steps: state.steps,
            iterations,
            accepted,
            elapsed,
            cost_history,
            operator_usage: self.selector.usage().to_vec(),
            operator_scores: self.selector.scores().iter().map(|s| s.value()).collect(),
        })
    }

    fn fresh_state(&mut self, instance: &I) -> SearchState<C::Solution> {
        self.strategy.reset();
        let solution = self.initial.build(instance, &mut self.rng);
        let cost = solution.cost();
        SearchState {
            solution,
            cost,
            steps: 0,
            started: Instant::now(),
            max_steps: usize::MAX,
            time_limit: Duration::MAX,
        }
    }

    fn advance(&mut self, state: &mut SearchState<C::Solution>) -> Result<Iteration, LnsError> {
        let mut neighborhood = Neighborhood::from_incumbent(
            &state.solution,
            self.config.neighborhood_size,
            self.config.parallel,
        );

        let record = self.strategy.step(&mut StepContext {
            state: &mut *state,
            neighborhood: &mut neighborhood,
            operators: &self.operators,
            selector: &mut self.selector,
            rng: &mut self.rng,
        })?;

        let Some(record) = record else {
            return Ok(Iteration {
                record: None,
                accepted: false,
                cost: state.cost,
            });
        };

        let mut accepted = false;
        if self.acceptance.accept(&record, state.cost, &mut self.rng) {
            if let Some(candidate) = neighborhood.into_candidate(record.best_index) {
                let previous = state.cost;
                state.solution = candidate;
                state.cost = record.best_cost;
                state.solution.verify()?;
                accepted = true;

                tracing::debug!(
                    step = state.steps,
                    previous,
                    cost = state.cost,
                    temperature = record.temperature,
                    "accepted candidate"
                );
            }
        }

        Ok(Iteration {
            record: Some(record),
            accepted,
            cost: state.cost,
        })
    }
}

/// Clones configuration only: operators, initial constructor, config,
/// strategy and acceptance parameters. The clone starts without a search
/// state, with unknown operator scores and an RNG reseeded from the
/// configured seed.
impl<I, C, D, R, St, A> Clone for LnsEngine<I, C, D, R, St, A>
where
    C: InitialSolution<I> + Clone,
    D: Clone,
    R: Clone,
    St: StepStrategy<C::Solution>,
    A: Clone,
{
    fn clone(&self) -> Self {
        let mut strategy = self.strategy.clone();
        strategy.reset();
        let mut selector = self.selector.clone();
        selector.reset();

        Self {
            operators: self.operators.clone(),
            initial: self.initial.clone(),
            config: self.config.clone(),
            selector,
            strategy,
            acceptance: self.acceptance.clone(),
            rng: create_rng(self.config.seed),
            state: None,
            _instance: PhantomData,
        }
    }
}
