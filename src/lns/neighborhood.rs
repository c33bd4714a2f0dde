//! Neighborhood materialization and batched destroy/repair.

use super::error::OperatorError;
use super::types::{DestroyOperator, LnsRng, LnsSolution, OperatorPair, RepairOperator};
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// A fixed-size batch of independently owned candidate solutions.
///
/// Every slot owns its candidate and a private random stream, so the
/// batch can be processed in any order (or concurrently) with identical
/// results. Streams are drawn from the engine's RNG at the start of each
/// destroy+repair pass.
#[derive(Debug, Clone)]
pub struct Neighborhood<S> {
    candidates: Vec<S>,
    costs: Vec<f64>,
    streams: Vec<LnsRng>,
    parallel: bool,
}

impl<S: LnsSolution> Neighborhood<S> {
    /// Creates `size` deep copies of `incumbent`.
    pub fn from_incumbent(incumbent: &S, size: usize, parallel: bool) -> Self {
        Self {
            candidates: vec![incumbent.clone(); size],
            costs: Vec::with_capacity(size),
            streams: Vec::with_capacity(size),
            parallel,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    #[inline]
    pub fn candidates(&self) -> &[S] {
        &self.candidates
    }

    /// Candidate costs from the last [`apply`](Self::apply).
    ///
    /// Empty before the first pass and after a failed one.
    #[inline]
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Overwrites the first `count` slots with fresh copies of `incumbent`.
    pub fn reset_leading(&mut self, incumbent: &S, count: usize) {
        for slot in self.candidates.iter_mut().take(count) {
            slot.clone_from(incumbent);
        }
    }

    /// Runs `f` on every candidate with that candidate's random stream.
    ///
    /// Meant for the batch operator methods during [`apply`](Self::apply);
    /// before the first pass no streams exist and `f` never runs.
    ///
    /// Stops at the first error observed; with parallel execution, which
    /// candidate reports first is unspecified.
    pub fn try_for_each<F>(&mut self, f: F) -> Result<(), OperatorError>
    where
        F: Fn(&mut S, &mut LnsRng) -> Result<(), OperatorError> + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return self
                    .candidates
                    .par_iter_mut()
                    .zip(self.streams.par_iter_mut())
                    .try_for_each(|(solution, rng)| f(solution, rng));
            }
        }

        self.candidates
            .iter_mut()
            .zip(self.streams.iter_mut())
            .try_for_each(|(solution, rng)| f(solution, rng))
    }

    /// Applies destroy then repair to every candidate and evaluates costs.
    ///
    /// Returns the wall time spent in destroy and repair. On failure the
    /// costs are left empty and the neighborhood must be discarded.
    pub fn apply<D, R>(
        &mut self,
        pair: &OperatorPair<D, R>,
        rng: &mut LnsRng,
    ) -> Result<Duration, OperatorError>
    where
        D: DestroyOperator<S>,
        R: RepairOperator<S>,
    {
        self.costs.clear();
        let size = self.candidates.len();
        self.streams.clear();
        self.streams.extend((0..size).map(|_| LnsRng::seed_from_u64(rng.random())));

        let start = Instant::now();
        pair.destroy.destroy_batch(self)?;
        pair.repair.repair_batch(self)?;
        let elapsed = start.elapsed();

        self.evaluate();
        Ok(elapsed)
    }

    /// Cheapest candidate as `(index, cost)`, first index on ties.
    pub fn best(&self) -> Option<(usize, f64)> {
        let (&first, rest) = self.costs.split_first()?;
        let best = rest
            .iter()
            .enumerate()
            .fold((0, first), |(bi, bc), (i, &c)| {
                if c < bc {
                    (i + 1, c)
                } else {
                    (bi, bc)
                }
            });
        Some(best)
    }

    /// Takes ownership of one candidate, releasing all the others.
    pub fn into_candidate(mut self, index: usize) -> Option<S> {
        if index < self.candidates.len() {
            Some(self.candidates.swap_remove(index))
        } else {
            None
        }
    }

    fn evaluate(&mut self) {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                self.costs = self.candidates.par_iter_mut().map(|s| s.cost()).collect();
                return;
            }
        }

        self.costs = self.candidates.iter().map(LnsSolution::cost).collect();
    }
}

/// Materializes `size` copies of `incumbent` and applies `pair` to each.
///
/// The incumbent itself is never mutated. Operator failures propagate and
/// no partial neighborhood is returned.
pub fn explore<S, D, R>(
    incumbent: &S,
    size: usize,
    pair: &OperatorPair<D, R>,
    rng: &mut LnsRng,
    parallel: bool,
) -> Result<Neighborhood<S>, OperatorError>
where
    S: LnsSolution,
    D: DestroyOperator<S>,
    R: RepairOperator<S>,
{
    let mut neighborhood = Neighborhood::from_incumbent(incumbent, size, parallel);
    neighborhood.apply(pair, rng)?;
    Ok(neighborhood)
}
