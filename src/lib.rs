//! Large Neighborhood Search metaheuristic.
//!
//! Two search variants share one engine:
//!
//! - **Greedy LNS**: every iteration explores a neighborhood of copies of
//!   the incumbent with one destroy/repair pair and moves to the cheapest
//!   candidate when it strictly improves.
//! - **Reheating simulated annealing**: the time budget is split into
//!   phases with their own temperature schedule, and worse candidates are
//!   accepted by the Metropolis criterion.
//!
//! Operator pairs are chosen uniformly or adaptively, by an exponential
//! moving average of the improvement per second each pair delivers.
//!
//! # Architecture
//!
//! The crate is domain agnostic. Users supply a solution type
//! ([`lns::LnsSolution`]), an initial constructor and destroy/repair
//! operators; routing, scheduling, packing and so on live with the caller.

pub mod annealing;
pub mod lns;
pub mod random;
