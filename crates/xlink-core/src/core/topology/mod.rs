//! # Topology Module
//!
//! Structural knowledge the prediction engine needs beyond raw geometry.
//!
//! ## Key Components
//!
//! - [`reactive`] - Registry of reactive atom names per residue type, parsed from the
//!   two-column `atom-name residue-name` text format
//! - [`linking`] - Tables deriving, from an atom's element and positional name code, the
//!   name of its structurally corresponding partner atom within the same chain
//!
//! ## Usage
//!
//! ```ignore
//! use xlinkpp::core::topology::{linking::LinkingTable, reactive::ReactiveAtomRegistry};
//!
//! let registry = ReactiveAtomRegistry::load("core_reactive.txt")?;
//! let table = LinkingTable::default();
//! let partner = table.partner_name(&atom)?; // "CX3" -> "CX2"
//! ```

pub mod linking;
pub mod reactive;
