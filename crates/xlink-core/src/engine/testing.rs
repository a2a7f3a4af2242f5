use crate::core::models::atom::Atom;
use crate::core::models::ids::AtomId;
use crate::core::models::structure::Structure;
use crate::core::topology::reactive::ReactiveAtomRegistry;
use nalgebra::Point3;
use std::collections::HashSet;

/// Compact structure builder for engine tests. Elements are taken from the first
/// character of the atom name.
#[derive(Default)]
pub struct StructureFixture {
    atoms: Vec<(usize, String, String, isize, [f64; 3])>,
}

impl StructureFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(mut self, serial: usize, name: &str, chain_type: &str, residue_seq: isize, pos: [f64; 3]) -> Self {
        self.atoms
            .push((serial, name.to_string(), chain_type.to_string(), residue_seq, pos));
        self
    }

    pub fn build(self) -> Structure {
        let mut structure = Structure::new();
        for (serial, name, chain_type, residue_seq, pos) in self.atoms {
            let element = name[..1].to_string();
            let chain_id = structure.add_chain(residue_seq, &chain_type);
            structure
                .add_atom_to_chain(
                    chain_id,
                    Atom::new(serial, &name, &element, Point3::new(pos[0], pos[1], pos[2])),
                )
                .unwrap();
        }
        structure
    }
}

pub fn atom_id(structure: &Structure, serial: usize) -> AtomId {
    structure.find_atom_by_serial(serial).unwrap()
}

/// Recomputes the greedy nearest-neighbor matching of reactive atoms in every
/// bonded chain, without reading or touching the `paired` flags.
///
/// Returns `(atom, partner)` matches in the order they form.
pub fn nearest_matches(structure: &Structure, registry: &ReactiveAtomRegistry) -> Vec<(AtomId, AtomId)> {
    let mut matches = Vec::new();
    for chain_id in structure.bonded_chains() {
        let chain = structure.chain(chain_id).unwrap();
        let Some(names) = registry.atom_names(&chain.chain_type) else {
            continue;
        };
        let reactive: Vec<AtomId> = names
            .iter()
            .map(|name| chain.get_atom_id_by_name(name).unwrap())
            .collect();

        let mut matched = HashSet::new();
        for &atom in &reactive {
            if matched.contains(&atom) {
                continue;
            }
            let origin = structure.atom(atom).unwrap();
            let nearest = reactive
                .iter()
                .filter(|&&other| other != atom && !matched.contains(&other))
                .map(|&other| (origin.distance_to(structure.atom(other).unwrap()), other))
                .fold(None, |best: Option<(f64, AtomId)>, cur| match best {
                    Some(b) if b.0 <= cur.0 => Some(b),
                    _ => Some(cur),
                });
            if let Some((_, partner)) = nearest {
                matched.insert(atom);
                matched.insert(partner);
                matches.push((atom, partner));
            }
        }
    }
    matches
}

/// Asserts that every radical was matched with an externally bonded partner, and
/// that every match with exactly one bonded atom produced a radical.
pub fn assert_radical_asymmetry(structure: &Structure, registry: &ReactiveAtomRegistry) {
    let radicals: HashSet<AtomId> = structure.radicals().iter().copied().collect();
    let bonded = |id: AtomId| structure.atom(id).unwrap().externally_bonded;

    let mut explained = HashSet::new();
    for (a, b) in nearest_matches(structure, registry) {
        for (radical, partner) in [(a, b), (b, a)] {
            if radicals.contains(&radical) {
                assert!(!bonded(radical), "radical {:?} is bonded", radical);
                assert!(bonded(partner), "partner of radical {:?} is unbonded", radical);
                explained.insert(radical);
            }
        }
        if bonded(a) != bonded(b) {
            let unbonded = if bonded(a) { b } else { a };
            assert!(radicals.contains(&unbonded), "missing radical {:?}", unbonded);
        }
    }
    assert_eq!(explained, radicals, "radical without a nearest-neighbor match");
}
