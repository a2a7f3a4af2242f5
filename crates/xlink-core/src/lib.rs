//! # XLINK++ Core Library
//!
//! A library for predicting which reactive sites of a molecular structure become
//! cross-linked bonds, and which reactive sites are left behind as radicals. It is
//! used to pre-process polymerizing structures before molecular-dynamics simulation.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Arena-based data models (`Structure`, `Atom`, `Chain`,
//!   `Pair`), the bond potential, reactive-atom and linking tables, and thin I/O
//!   collaborators for structure ingestion and result reporting.
//!
//! - **[`engine`]: The Logic Core.** The stateful prediction machinery: spatial neighbor
//!   queries, the candidate graph builder, the pluggable bonding strategies, the greedy
//!   selection engine with incremental rescoring, and radical assignment.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together. The
//!   [`workflows::predict`] workflow runs every configured strategy stage against one
//!   structure and reports what was committed.

pub mod core;
pub mod engine;
pub mod workflows;
