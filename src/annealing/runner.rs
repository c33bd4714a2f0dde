//! Reheating simulated-annealing step.

use super::config::AnnealingConfig;
use super::schedule::{TemperatureSchedule, TemperatureState};
use crate::lns::{
    DestroyOperator, InitialSolution, LnsEngine, LnsError, LnsConfig, LnsSolution,
    MetropolisAcceptance, OperatorPair, RepairOperator, StepContext, StepRecord, StepStrategy,
};
use std::time::Instant;

/// LNS engine with reheating simulated annealing.
pub type AnnealingLns<I, C, D, R> = LnsEngine<I, C, D, R, ReheatingStep, MetropolisAcceptance>;

/// Step strategy that runs one reheating phase per outer iteration.
///
/// The run's time limit is split into `n_reheating` phases. Within a phase
/// the strategy loops over base steps, restarting the leading
/// `reset_percentage` of the neighborhood from the incumbent before each
/// one, while the trailing slots keep drifting. The first neighborhood of
/// the phase fixes its [`TemperatureSchedule`]; every later micro-step
/// reads the decayed temperature off it. The record of the last
/// micro-step, carrying that temperature, is what the Metropolis
/// criterion evaluates.
#[derive(Debug, Clone)]
pub struct ReheatingStep {
    config: AnnealingConfig,
    state: TemperatureState,
    phases: Vec<TemperatureSchedule>,
}

impl ReheatingStep {
    pub fn new(config: AnnealingConfig) -> Self {
        Self {
            config,
            state: TemperatureState::default(),
            phases: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    #[inline]
    pub fn temperature_state(&self) -> &TemperatureState {
        &self.state
    }

    /// Schedules computed so far in this run, one per started phase.
    #[inline]
    pub fn phases(&self) -> &[TemperatureSchedule] {
        &self.phases
    }
}

impl<S: LnsSolution> StepStrategy<S> for ReheatingStep {
    fn name(&self) -> &str {
        "ReheatingStep"
    }

    fn validate(&self) -> Result<(), String> {
        self.config.validate()
    }

    fn reset(&mut self) {
        self.state = TemperatureState::default();
        self.phases.clear();
    }

    fn step<D, R>(
        &mut self,
        ctx: &mut StepContext<'_, S, D, R>,
    ) -> Result<Option<StepRecord>, LnsError>
    where
        D: DestroyOperator<S>,
        R: RepairOperator<S>,
    {
        let phase_length = ctx.state.time_limit / self.config.n_reheating;
        let reset_count = self.config.reset_count(ctx.neighborhood.len());
        let phase_started = Instant::now();
        self.state.begin_phase(phase_started);

        let mut last = None;
        while ctx.state.within_budget() && phase_started.elapsed() < phase_length {
            ctx.neighborhood.reset_leading(&ctx.state.solution, reset_count);
            let mut record = ctx.base_step()?;

            let schedule = match self.state.schedule {
                Some(schedule) => schedule,
                None => {
                    let schedule = TemperatureSchedule::from_costs(
                        ctx.neighborhood.costs(),
                        self.config.min_temperature,
                    );
                    tracing::debug!(
                        phase = self.state.phase,
                        t_max = schedule.t_max(),
                        t_factor = schedule.t_factor(),
                        "reheating"
                    );
                    self.state.schedule = Some(schedule);
                    self.phases.push(schedule);
                    schedule
                }
            };

            let temperature = schedule.temperature(phase_started.elapsed(), phase_length);
            self.state.temperature = Some(temperature);
            record.temperature = Some(temperature);
            last = Some(record);
        }

        Ok(last)
    }
}

impl<I, C, D, R> AnnealingLns<I, C, D, R>
where
    C: InitialSolution<I>,
    D: DestroyOperator<C::Solution>,
    R: RepairOperator<C::Solution>,
{
    /// Creates a simulated-annealing engine with periodic reheating.
    pub fn annealing(
        operators: Vec<OperatorPair<D, R>>,
        initial: C,
        config: LnsConfig,
        annealing: AnnealingConfig,
    ) -> Result<Self, LnsError> {
        Self::with_strategy(
            operators,
            initial,
            config,
            ReheatingStep::new(annealing),
            MetropolisAcceptance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lns::testing::{Insertion, Line, Nudge, Removal, Scalar, Tour};
    use std::time::Duration;

    fn config(size: usize) -> LnsConfig {
        LnsConfig::default()
            .with_neighborhood_size(size)
            .with_parallel(false)
            .with_seed(42)
    }

    fn tour_ops() -> Vec<OperatorPair<Removal, Insertion>> {
        vec![
            OperatorPair::new("removal+cheapest", Removal { count: 3 }, Insertion::Cheapest),
            OperatorPair::new("removal+random", Removal { count: 2 }, Insertion::Random),
        ]
    }

    #[test]
    fn test_single_phase_computes_schedule_once() {
        let line = Line::new(15);
        let annealing = AnnealingConfig::default()
            .with_reheating(1)
            .with_reset_percentage(1.0);
        let mut engine =
            LnsEngine::annealing(tour_ops(), Tour::zigzag, config(6), annealing).unwrap();

        let result = engine
            .solve(&line, usize::MAX, Duration::from_millis(40))
            .unwrap();

        assert_eq!(engine.strategy().phases().len(), 1);
        assert_eq!(result.iterations, 1);
        assert!(result.steps > 1);
        assert!(result.solution.verify().is_ok());
    }

    #[test]
    fn test_step_budget_ends_unbounded_phase() {
        let line = Line::new(12);
        let mut engine = LnsEngine::annealing(
            tour_ops(),
            Tour::zigzag,
            config(4),
            AnnealingConfig::default(),
        )
        .unwrap();

        let result = engine.solve(&line, 25, Duration::MAX).unwrap();

        assert_eq!(result.steps, 25);
        assert_eq!(result.iterations, 1);
        let phases = engine.strategy().phases();
        assert_eq!(phases.len(), 1);

        // An effectively infinite phase never cools.
        let temperature = engine.strategy().temperature_state().temperature.unwrap();
        assert!((temperature - phases[0].t_max()).abs() < 1e-6 * phases[0].t_max());
    }

    #[test]
    fn test_each_phase_reheats() {
        let line = Line::new(15);
        let annealing = AnnealingConfig::default().with_reheating(3);
        let mut engine =
            LnsEngine::annealing(tour_ops(), Tour::zigzag, config(4), annealing).unwrap();

        let result = engine
            .solve(&line, usize::MAX, Duration::from_millis(60))
            .unwrap();

        let phases = engine.strategy().phases();
        assert!(
            (2..=3).contains(&phases.len()),
            "expected one schedule per phase, got {}",
            phases.len()
        );
        assert!(phases.len() <= result.iterations);
        for schedule in phases {
            assert!(schedule.t_max() >= 10.0);
            assert!(schedule.t_factor() <= 0.0);
        }
    }

    #[test]
    fn test_metropolis_accepts_worse_candidates() {
        // Every candidate is exactly 1.0 worse, so t_max = t_min = 10 and
        // each phase accepts with probability exp(-0.1).
        let ops = vec![OperatorPair::new("worsen", Nudge::Keep, Nudge::Shift(-1.0))];
        let annealing = AnnealingConfig::default().with_reset_percentage(1.0);
        let mut engine = LnsEngine::annealing(ops, Scalar::start, config(3), annealing).unwrap();

        engine.reset(&0.0);
        let mut costs = vec![0.0];
        for phase in 1..=20 {
            engine.set_budget(phase * 2, Duration::MAX);
            let outcome = engine.iterate().unwrap().unwrap();
            let record = outcome.record.unwrap();
            assert!((record.temperature.unwrap() - 10.0).abs() < 1e-9);
            costs.push(outcome.cost);
        }

        assert!(costs.windows(2).any(|w| w[1] > w[0]));
        assert!(costs.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(engine.strategy().phases().len(), 20);
    }

    #[test]
    fn test_exhausted_budget_ends_iteration() {
        let ops = vec![OperatorPair::new("shift", Nudge::Keep, Nudge::Shift(1.0))];
        let mut engine = LnsEngine::annealing(
            ops,
            Scalar::start,
            config(2),
            AnnealingConfig::default(),
        )
        .unwrap();

        engine.reset(&3.0);
        engine.set_budget(1, Duration::MAX);
        let first = engine.iterate().unwrap().unwrap();
        assert!(first.accepted);
        assert!((first.cost - 2.0).abs() < 1e-12);
        assert!(first.record.and_then(|r| r.temperature).is_some());
        assert!(engine.iterate().unwrap().is_none());
    }

    #[test]
    fn test_annealing_improves_tour() {
        let line = Line::new(20);
        let mut engine = LnsEngine::annealing(
            tour_ops(),
            Tour::zigzag,
            config(10).with_adaptive(true),
            AnnealingConfig::default().with_reheating(2),
        )
        .unwrap();

        let initial = Tour::zigzag(&line).cost();
        let result = engine
            .solve(&line, usize::MAX, Duration::from_millis(40))
            .unwrap();

        assert!(result.solution.verify().is_ok());
        assert!(result.cost < initial);
        assert!((result.solution.cost() - result.cost).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_annealing_config_rejected() {
        let ops = vec![OperatorPair::new("keep", Nudge::Keep, Nudge::Keep)];
        let err = LnsEngine::annealing(
            ops,
            Scalar::start,
            config(2),
            AnnealingConfig::default().with_reheating(0),
        )
        .err()
        .unwrap();
        assert!(matches!(err, LnsError::InvalidConfig(_)));
    }

    #[test]
    fn test_clone_starts_without_phases() {
        let line = Line::new(10);
        let mut engine = LnsEngine::annealing(
            tour_ops(),
            Tour::zigzag,
            config(4),
            AnnealingConfig::default(),
        )
        .unwrap();
        engine.solve(&line, 10, Duration::MAX).unwrap();
        assert_eq!(engine.strategy().phases().len(), 1);

        let copy = engine.clone();
        assert!(copy.strategy().phases().is_empty());
        assert_eq!(copy.strategy().config(), engine.strategy().config());
        assert_eq!(engine.strategy().phases().len(), 1);
    }
}
