use thiserror::Error;

use crate::core::topology::linking::{LinkingError, LinkingTableError};
use crate::core::topology::reactive::ReactiveSpecError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to load reactive atom specification: {source}")]
    ReactiveSpec {
        #[from]
        source: ReactiveSpecError,
    },

    #[error("Failed to load linking table: {source}")]
    LinkingTable {
        #[from]
        source: LinkingTableError,
    },

    #[error("Cannot derive linking partner of atom {serial}: {source}")]
    Linking { serial: usize, source: LinkingError },

    #[error("Linking partner '{atom_name}' not found in residue {residue_seq}")]
    PartnerNotFound { residue_seq: isize, atom_name: String },

    #[error("Reactive atom '{atom_name}' not found in residue {residue_seq}")]
    ReactiveAtomNotFound { residue_seq: isize, atom_name: String },

    #[error("Stage '{stage}' failed: {reason}")]
    StageFailed { stage: &'static str, reason: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
