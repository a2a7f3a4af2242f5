//! Thin I/O collaborators around the prediction engine.
//!
//! Structure ingestion reads fixed-column PDB `ATOM` records into a
//! [`Structure`](crate::core::models::structure::Structure); result reporting writes
//! the bonded-pair and radical collections as plain serial-number listings.

pub mod pdb;
pub mod report;
pub mod traits;
