//! Acceptance criteria for replacing the incumbent.

use super::types::{LnsRng, StepRecord};
use rand::Rng;

/// Decides whether the best candidate of a step replaces the incumbent.
pub trait AcceptancePolicy: Clone + Send {
    fn name(&self) -> &str;

    fn accept(&mut self, record: &StepRecord, incumbent_cost: f64, rng: &mut LnsRng) -> bool;
}

/// Accepts strict improvements only; ties are rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyAcceptance;

impl AcceptancePolicy for GreedyAcceptance {
    fn name(&self) -> &str {
        "GreedyAcceptance"
    }

    fn accept(&mut self, record: &StepRecord, incumbent_cost: f64, _rng: &mut LnsRng) -> bool {
        record.best_cost < incumbent_cost
    }
}

/// Metropolis criterion driven by the temperature carried in the record.
///
/// Worse candidates are accepted with probability `exp(-delta / temp)`.
/// Records without a usable temperature (none computed yet, zero, or
/// non-finite) fall back to greedy acceptance.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetropolisAcceptance;

impl AcceptancePolicy for MetropolisAcceptance {
    fn name(&self) -> &str {
        "MetropolisAcceptance"
    }

    fn accept(&mut self, record: &StepRecord, incumbent_cost: f64, rng: &mut LnsRng) -> bool {
        if record.best_cost < incumbent_cost {
            return true;
        }
        match record.temperature {
            Some(temperature) if temperature > 0.0 && temperature.is_finite() => {
                let probability =
                    metropolis_probability(record.best_cost - incumbent_cost, temperature);
                rng.random_range(0.0..1.0) < probability
            }
            _ => false,
        }
    }
}

/// Probability of accepting a move of cost change `delta` at `temperature`.
///
/// Improvements (`delta < 0`) always pass; a non-positive temperature
/// never accepts a worsening move.
pub fn metropolis_probability(delta: f64, temperature: f64) -> f64 {
    if delta < 0.0 {
        1.0
    } else if temperature > 0.0 {
        (-delta / temperature).exp()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::time::Duration;

    fn record(best_cost: f64, temperature: Option<f64>) -> StepRecord {
        StepRecord {
            operator: 0,
            best_index: 0,
            best_cost,
            temperature,
            elapsed: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_greedy_strict_improvement_only() {
        let mut policy = GreedyAcceptance;
        let mut rng = LnsRng::seed_from_u64(0);

        assert!(policy.accept(&record(9.0, None), 10.0, &mut rng));
        assert!(!policy.accept(&record(10.0, None), 10.0, &mut rng));
        assert!(!policy.accept(&record(11.0, Some(1e9)), 10.0, &mut rng));
    }

    #[test]
    fn test_metropolis_always_accepts_improvement() {
        let mut policy = MetropolisAcceptance;
        let mut rng = LnsRng::seed_from_u64(0);
        assert!(policy.accept(&record(5.0, None), 10.0, &mut rng));
        assert!(policy.accept(&record(5.0, Some(1e-9)), 10.0, &mut rng));
    }

    #[test]
    fn test_metropolis_without_temperature_rejects_worse() {
        let mut policy = MetropolisAcceptance;
        let mut rng = LnsRng::seed_from_u64(0);
        for temperature in [None, Some(0.0), Some(-3.0), Some(f64::NAN)] {
            for _ in 0..100 {
                assert!(!policy.accept(&record(10.5, temperature), 10.0, &mut rng));
            }
        }
    }

    #[test]
    fn test_metropolis_acceptance_rate_matches_probability() {
        let mut policy = MetropolisAcceptance;
        let mut rng = LnsRng::seed_from_u64(42);
        let (delta, temperature) = (5.0, 10.0);
        let trials = 50_000;

        let accepted = (0..trials)
            .filter(|_| policy.accept(&record(100.0 + delta, Some(temperature)), 100.0, &mut rng))
            .count();

        let expected = (-delta / temperature).exp();
        let rate = accepted as f64 / trials as f64;
        assert!(
            (rate - expected).abs() < 0.01,
            "acceptance rate {rate} differs from {expected}"
        );
    }

    #[test]
    fn test_metropolis_probability_edges() {
        assert!((metropolis_probability(0.0, 10.0) - 1.0).abs() < 1e-12);
        assert!((metropolis_probability(-1.0, 0.0) - 1.0).abs() < 1e-12);
        assert_eq!(metropolis_probability(1.0, 0.0), 0.0);
    }
}
