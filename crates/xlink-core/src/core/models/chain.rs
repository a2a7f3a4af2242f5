use super::ids::{AtomId, ChainId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: isize,                          // Residue sequence number from source file
    pub chain_type: String,                 // Residue type tag (e.g., "DVB", "SUR")
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its stable ID
    bonded_chains: HashSet<ChainId>,        // Chains this chain has cross-linked with
}

impl Chain {
    pub(crate) fn new(id: isize, chain_type: &str) -> Self {
        Self {
            id,
            chain_type: chain_type.to_string(),
            atom_name_map: HashMap::new(),
            bonded_chains: HashSet::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atom_name_map.insert(atom_name.to_string(), atom_id);
    }

    pub(crate) fn add_bonded_chain(&mut self, chain_id: ChainId) {
        self.bonded_chains.insert(chain_id);
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    pub fn has_atom_named(&self, name: &str) -> bool {
        self.atom_name_map.contains_key(name)
    }

    pub fn is_bonded_to(&self, chain_id: ChainId) -> bool {
        self.bonded_chains.contains(&chain_id)
    }

    pub fn bonded_chains(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.bonded_chains.iter().copied()
    }

    pub fn is_same_type(&self, other: &Chain) -> bool {
        self.chain_type == other.chain_type
    }
}
