//! # Workflows Module
//!
//! High-level entry points that drive the engine end to end.
//!
//! - **Prediction Workflow** ([`predict`]) - runs the configured bonding stages, core
//!   before surface, against one structure and reports per-stage statistics.

pub mod predict;
