//! # Core Module
//!
//! The fundamental building blocks of cross-link prediction.
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Atoms, chains, candidate pairs and the
//!   `Structure` arena that owns them together with the committed-bond collections
//! - **Scoring** ([`potential`]) - The Gaussian bond potential with its isolatedness bias
//! - **Reactive Knowledge** ([`topology`]) - Reactive-atom registries and the linking tables
//!   used to derive the chemically bonded partner of a surface atom
//! - **File I/O** ([`io`]) - Reading PDB `ATOM` records and writing pair/radical reports

pub mod io;
pub mod models;
pub mod potential;
pub mod topology;
