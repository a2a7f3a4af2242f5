//! # Engine Module
//!
//! The prediction engine: turns a structure and a reactive-atom specification into
//! committed cross-links.
//!
//! ## Overview
//!
//! One strategy run proceeds through fixed steps:
//!
//! 1. **Neighbor query** ([`neighbors`]) - radius search over reactive atom coordinates,
//!    backed by a kd-tree or an exhaustive scan
//! 2. **Candidate graph** ([`candidates`]) - unique cross-chain pairs scored by the
//!    active strategy
//! 3. **Greedy selection** ([`selection`]) - commits the best valid candidate until no
//!    score clears the acceptance threshold, rescoring chain-local candidates after
//!    every commit
//! 4. **Radical assignment** ([`radicals`]) - flags reactive atoms left unreacted next
//!    to a reacted neighbor
//!
//! Bonding behavior is pluggable through [`strategy::BondingStrategy`]; the surface
//! strategies record derived linking pairs ([`linking`]) instead of the selected pair.
//!
//! ## Parallelism
//!
//! With the `parallel` feature the neighbor query and the initial scoring run on the
//! rayon pool. Selection itself is always sequential.

pub mod candidates;
pub mod config;
pub mod error;
pub mod linking;
pub mod neighbors;
pub mod progress;
pub mod radicals;
pub mod selection;
pub mod strategy;
#[cfg(test)]
pub(crate) mod testing;
