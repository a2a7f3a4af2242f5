//! # Core Models Module
//!
//! Data structures describing a structure under cross-link prediction.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom with identity fields and its two mutable bonding flags
//! - [`chain`] - A molecule/residue grouping with its atom-name map and bonded chains
//! - [`pair`] - A candidate or committed bond between two atoms of different chains
//! - [`structure`] - The arena owning atoms and chains plus the committed-bond collections
//! - [`ids`] - Stable slot-map keys for atoms and chains
//!
//! ## Usage
//!
//! ```ignore
//! use xlinkpp::core::models::{atom::Atom, structure::Structure};
//!
//! let mut structure = Structure::new();
//! let chain_id = structure.add_chain(1, "DVB");
//! let atom = Atom::new(1, "C1", "C", Point3::new(0.0, 0.0, 0.0));
//! let atom_id = structure.add_atom_to_chain(chain_id, atom);
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod pair;
pub mod structure;
