//! Toy problems shared by the unit tests.

use super::error::{InvalidSolution, OperatorError};
use super::types::{DestroyOperator, LnsSolution, RepairOperator};
use rand::Rng;
use std::sync::Arc;

// ---- Scalar: the cost is the value itself ----

#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub value: f64,
    pub feasible: bool,
}

impl Scalar {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            feasible: true,
        }
    }

    pub fn start(value: &f64) -> Self {
        Self::new(*value)
    }
}

impl LnsSolution for Scalar {
    fn cost(&self) -> f64 {
        self.value
    }

    fn verify(&self) -> Result<(), InvalidSolution> {
        if self.feasible {
            Ok(())
        } else {
            Err(InvalidSolution::new("scalar marked infeasible"))
        }
    }
}

/// Scalar operators; the change happens in `repair`, `destroy` only fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Nudge {
    Keep,
    Shift(f64),
    Jitter(f64),
    Fail,
    Poison,
}

impl Nudge {
    fn label(&self) -> &str {
        match self {
            Nudge::Keep => "keep",
            Nudge::Shift(_) => "shift",
            Nudge::Jitter(_) => "jitter",
            Nudge::Fail => "fail",
            Nudge::Poison => "poison",
        }
    }
}

impl DestroyOperator<Scalar> for Nudge {
    fn name(&self) -> &str {
        self.label()
    }

    fn destroy<R: Rng>(&self, _solution: &mut Scalar, _rng: &mut R) -> Result<(), OperatorError> {
        match self {
            Nudge::Fail => Err(OperatorError::new(self.label(), "refused to destroy")),
            _ => Ok(()),
        }
    }
}

impl RepairOperator<Scalar> for Nudge {
    fn name(&self) -> &str {
        self.label()
    }

    fn repair<R: Rng>(&self, solution: &mut Scalar, rng: &mut R) -> Result<(), OperatorError> {
        match *self {
            Nudge::Keep => {}
            Nudge::Shift(d) => solution.value -= d,
            Nudge::Jitter(amp) => solution.value += rng.random_range(-amp..amp),
            Nudge::Fail => return Err(OperatorError::new(self.label(), "refused to repair")),
            Nudge::Poison => {
                solution.value -= 1.0;
                solution.feasible = false;
            }
        }
        Ok(())
    }
}

// ---- Tour over points on a line ----

pub struct Line {
    positions: Arc<[f64]>,
}

impl Line {
    pub fn new(n: usize) -> Self {
        Self {
            positions: (0..n).map(|i| i as f64 * 10.0).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Length of the best closed tour: out to the far end and back.
    pub fn optimal_cost(&self) -> f64 {
        2.0 * 10.0 * (self.len().saturating_sub(1)) as f64
    }
}

/// Penalty per city left unrouted.
const UNROUTED_PENALTY: f64 = 1_000.0;

#[derive(Debug, Clone)]
pub struct Tour {
    positions: Arc<[f64]>,
    pub order: Vec<usize>,
    pub removed: Vec<usize>,
}

impl Tour {
    /// Zig-zag start: 0, n-1, 1, n-2, ...
    pub fn zigzag(line: &Line) -> Self {
        let n = line.len();
        let order = (0..n)
            .map(|i| if i % 2 == 0 { i / 2 } else { n - 1 - i / 2 })
            .collect();
        Self {
            positions: Arc::clone(&line.positions),
            order,
            removed: Vec::new(),
        }
    }

    fn dist(&self, a: usize, b: usize) -> f64 {
        (self.positions[a] - self.positions[b]).abs()
    }
}

impl LnsSolution for Tour {
    fn cost(&self) -> f64 {
        let n = self.order.len();
        let length: f64 = (0..n)
            .map(|i| self.dist(self.order[i], self.order[(i + 1) % n]))
            .sum();
        length + UNROUTED_PENALTY * self.removed.len() as f64
    }

    fn verify(&self) -> Result<(), InvalidSolution> {
        if !self.removed.is_empty() {
            return Err(InvalidSolution::new(format!(
                "{} cities left unrouted",
                self.removed.len()
            )));
        }
        let mut seen = vec![false; self.positions.len()];
        for &city in &self.order {
            if std::mem::replace(&mut seen[city], true) {
                return Err(InvalidSolution::new(format!("city {city} visited twice")));
            }
        }
        if seen.iter().any(|&s| !s) {
            return Err(InvalidSolution::new("tour misses a city"));
        }
        Ok(())
    }
}

/// Removes `count` random cities from the tour.
#[derive(Debug, Clone, Copy)]
pub struct Removal {
    pub count: usize,
}

impl DestroyOperator<Tour> for Removal {
    fn name(&self) -> &str {
        "random-removal"
    }

    fn destroy<R: Rng>(&self, tour: &mut Tour, rng: &mut R) -> Result<(), OperatorError> {
        for _ in 0..self.count.min(tour.order.len()) {
            let i = rng.random_range(0..tour.order.len());
            let city = tour.order.remove(i);
            tour.removed.push(city);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Insertion {
    Cheapest,
    Random,
}

impl RepairOperator<Tour> for Insertion {
    fn name(&self) -> &str {
        match self {
            Insertion::Cheapest => "cheapest-insertion",
            Insertion::Random => "random-insertion",
        }
    }

    fn repair<R: Rng>(&self, tour: &mut Tour, rng: &mut R) -> Result<(), OperatorError> {
        while let Some(city) = tour.removed.pop() {
            let len = tour.order.len();
            if len == 0 {
                tour.order.push(city);
                continue;
            }
            let at = match self {
                Insertion::Random => rng.random_range(0..=len),
                Insertion::Cheapest => (0..len)
                    .map(|k| {
                        let prev = tour.order[(k + len - 1) % len];
                        let next = tour.order[k];
                        let delta =
                            tour.dist(prev, city) + tour.dist(city, next) - tour.dist(prev, next);
                        (k, delta)
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map_or(0, |(k, _)| k),
            };
            tour.order.insert(at, city);
        }
        Ok(())
    }
}
