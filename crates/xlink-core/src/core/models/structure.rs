use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId};
use super::pair::Pair;
use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};

/// The strategy family a committed bond was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondKind {
    /// Bonds formed between reactive groups inside the core.
    Core,
    /// Bonds formed between surface groups and linkers.
    Surface,
}

/// Selects one of the committed-bond collections of a [`Structure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondCollection {
    /// Every committed bond, in commit order.
    All,
    /// Bonds committed by the core strategy.
    Core,
    /// Bonds committed by the surface strategy.
    Surface,
}

impl From<BondKind> for BondCollection {
    fn from(kind: BondKind) -> Self {
        match kind {
            BondKind::Core => BondCollection::Core,
            BondKind::Surface => BondCollection::Surface,
        }
    }
}

/// A structure under cross-link prediction.
///
/// Owns every atom and chain in slot-map arenas; all cross references are expressed
/// as [`AtomId`]/[`ChainId`] lookups. Besides the geometry it holds the prediction
/// results: the committed-bond collections and the radicals list, all in the order
/// they were produced.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Atom IDs in ingestion order.
    atom_order: Vec<AtomId>,
    /// Lookup map from residue sequence number to chain.
    chain_id_map: HashMap<isize, ChainId>,
    /// Lookup map from atom serial number to atom.
    serial_map: HashMap<usize, AtomId>,
    /// Every committed bond.
    bonded_pairs: Vec<Pair>,
    /// Bonds committed by the core strategy.
    core_bonded_pairs: Vec<Pair>,
    /// Bonds committed by the surface strategy.
    surface_bonded_pairs: Vec<Pair>,
    /// Number of committed-pair endpoint occurrences per chain, per bond kind.
    connectivity: HashMap<(BondKind, ChainId), usize>,
    /// Reactive atoms left unreacted, in discovery order.
    radicals: Vec<AtomId>,
}

impl Structure {
    /// Creates a new, empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Returns an iterator over all atoms in ingestion order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atom_order
            .iter()
            .filter_map(|&id| self.atoms.get(id).map(|atom| (id, atom)))
    }

    /// Returns the number of atoms in the structure.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains in the structure.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    /// Returns the number of chains in the structure.
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Finds a chain by its residue sequence number.
    pub fn find_chain_by_id(&self, residue_seq: isize) -> Option<ChainId> {
        self.chain_id_map.get(&residue_seq).copied()
    }

    /// Finds an atom by its serial number.
    pub fn find_atom_by_serial(&self, serial: usize) -> Option<AtomId> {
        self.serial_map.get(&serial).copied()
    }

    /// Adds a new chain or returns the existing one.
    ///
    /// This method is idempotent on the residue sequence number; an existing chain
    /// keeps its original type.
    ///
    /// # Arguments
    ///
    /// * `residue_seq` - The residue sequence number identifying the chain.
    /// * `chain_type` - The residue type tag of the chain.
    ///
    /// # Return
    ///
    /// The ID of the chain (new or existing).
    pub fn add_chain(&mut self, residue_seq: isize, chain_type: &str) -> ChainId {
        *self.chain_id_map.entry(residue_seq).or_insert_with(|| {
            let chain = Chain::new(residue_seq, chain_type);
            self.chains.insert(chain)
        })
    }

    /// Adds an atom to a chain.
    ///
    /// The atom's chain ID and residue sequence number are overwritten with the
    /// chain's values.
    ///
    /// # Return
    ///
    /// Returns `None` if the chain does not exist, if the chain already holds an atom
    /// with the same name, or if the serial number is already taken.
    pub fn add_atom_to_chain(&mut self, chain_id: ChainId, mut atom: Atom) -> Option<AtomId> {
        let chain = self.chains.get(chain_id)?;
        if chain.has_atom_named(&atom.name) || self.serial_map.contains_key(&atom.serial) {
            return None;
        }

        atom.chain_id = chain_id;
        atom.residue_seq = chain.id;
        let name = atom.name.clone();
        let serial = atom.serial;

        let atom_id = self.atoms.insert(atom);
        self.chains.get_mut(chain_id)?.add_atom(&name, atom_id);
        self.atom_order.push(atom_id);
        self.serial_map.insert(serial, atom_id);
        Some(atom_id)
    }

    /// Builds a pair between two atoms, deriving their chains.
    pub fn make_pair(&self, atom1: AtomId, atom2: AtomId, distance: f64) -> Option<Pair> {
        let chain1 = self.atoms.get(atom1)?.chain_id;
        let chain2 = self.atoms.get(atom2)?.chain_id;
        Some(Pair::new(atom1, chain1, atom2, chain2, distance))
    }

    /// Applies the bonding side effects of a pair.
    ///
    /// Both atoms become externally bonded and both chains record each other as
    /// bonded partners. Flags and relations only ever accumulate.
    ///
    /// # Return
    ///
    /// Returns `None` if either atom or chain does not exist.
    pub fn mark_bonded(&mut self, pair: &Pair) -> Option<()> {
        if !self.atoms.contains_key(pair.atom1) || !self.atoms.contains_key(pair.atom2) {
            return None;
        }
        if !self.chains.contains_key(pair.chain1) || !self.chains.contains_key(pair.chain2) {
            return None;
        }

        self.chains[pair.chain1].add_bonded_chain(pair.chain2);
        self.chains[pair.chain2].add_bonded_chain(pair.chain1);
        self.atoms[pair.atom1].externally_bonded = true;
        self.atoms[pair.atom2].externally_bonded = true;
        Some(())
    }

    /// Appends a committed pair to the combined collection and to the collection of
    /// its bond kind, and updates the per-chain connectivity of that kind.
    pub fn record_bond(&mut self, kind: BondKind, pair: Pair) {
        *self.connectivity.entry((kind, pair.chain1)).or_default() += 1;
        *self.connectivity.entry((kind, pair.chain2)).or_default() += 1;

        match kind {
            BondKind::Core => self.core_bonded_pairs.push(pair.clone()),
            BondKind::Surface => self.surface_bonded_pairs.push(pair.clone()),
        }
        self.bonded_pairs.push(pair);
    }

    /// Number of times a chain appears as an endpoint of pairs committed under `kind`.
    pub fn connectivity(&self, kind: BondKind, chain_id: ChainId) -> usize {
        self.connectivity
            .get(&(kind, chain_id))
            .copied()
            .unwrap_or(0)
    }

    /// Returns one of the committed-bond collections.
    pub fn bonded_pairs(&self, collection: BondCollection) -> &[Pair] {
        match collection {
            BondCollection::All => &self.bonded_pairs,
            BondCollection::Core => &self.core_bonded_pairs,
            BondCollection::Surface => &self.surface_bonded_pairs,
        }
    }

    /// Returns one of the committed-bond collections as serial-number pairs.
    pub fn serial_pairs(&self, collection: BondCollection) -> Vec<(usize, usize)> {
        self.bonded_pairs(collection)
            .iter()
            .filter_map(|pair| {
                let a = self.atoms.get(pair.atom1)?;
                let b = self.atoms.get(pair.atom2)?;
                Some((a.serial, b.serial))
            })
            .collect()
    }

    /// Distinct chains that take part in at least one committed bond, in order of
    /// first appearance in the combined collection.
    pub fn bonded_chains(&self) -> Vec<ChainId> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for pair in &self.bonded_pairs {
            for chain_id in [pair.chain1, pair.chain2] {
                if seen.insert(chain_id) {
                    ordered.push(chain_id);
                }
            }
        }
        ordered
    }

    /// Flags an atom as a radical.
    pub fn add_radical(&mut self, atom_id: AtomId) {
        self.radicals.push(atom_id);
    }

    /// Returns the radicals in discovery order.
    pub fn radicals(&self) -> &[AtomId] {
        &self.radicals
    }

    /// Returns the serial numbers of the radicals in discovery order.
    pub fn radical_serials(&self) -> Vec<usize> {
        self.radicals
            .iter()
            .filter_map(|&id| self.atoms.get(id).map(|atom| atom.serial))
            .collect()
    }
}
