use super::error::EngineError;
use crate::core::models::ids::AtomId;
use crate::core::models::structure::Structure;
use crate::core::topology::reactive::ReactiveAtomRegistry;
use tracing::{debug, warn};

/// Flags reactive atoms left unreacted next to a reacted neighbor.
///
/// Walks every chain that takes part in a committed bond. Within each chain the
/// reactive atoms, in registry order, are matched greedily with their nearest
/// unmatched reactive neighbor; when exactly one atom of a match is externally
/// bonded, the other one becomes a radical.
///
/// # Return
///
/// The number of radicals added to the structure.
///
/// # Errors
///
/// Returns [`EngineError::ReactiveAtomNotFound`] if a registered reactive name is
/// missing from a bonded chain.
pub fn assign_core_radicals(
    structure: &mut Structure,
    registry: &ReactiveAtomRegistry,
) -> Result<usize, EngineError> {
    let mut found = 0;

    for chain_id in structure.bonded_chains() {
        let Some(chain) = structure.chain(chain_id) else {
            continue;
        };
        let Some(names) = registry.atom_names(&chain.chain_type) else {
            warn!(
                residue_seq = chain.id,
                chain_type = %chain.chain_type,
                "Bonded chain has no reactive atom entry; skipping radical search"
            );
            continue;
        };
        let reactive: Vec<AtomId> = names
            .iter()
            .map(|name| {
                chain
                    .get_atom_id_by_name(name)
                    .ok_or_else(|| EngineError::ReactiveAtomNotFound {
                        residue_seq: chain.id,
                        atom_name: name.clone(),
                    })
            })
            .collect::<Result<_, _>>()?;

        for (i, &atom_id) in reactive.iter().enumerate() {
            if is_paired(structure, atom_id) {
                continue;
            }
            let Some(partner_id) = nearest_unpaired(structure, &reactive, i) else {
                continue;
            };

            let (Some(atom), Some(partner)) = (structure.atom(atom_id), structure.atom(partner_id))
            else {
                continue;
            };
            let radical = match (atom.externally_bonded, partner.externally_bonded) {
                (true, false) => Some(partner_id),
                (false, true) => Some(atom_id),
                _ => None,
            };

            for id in [atom_id, partner_id] {
                if let Some(a) = structure.atom_mut(id) {
                    a.paired = true;
                }
            }
            if let Some(radical_id) = radical {
                structure.add_radical(radical_id);
                found += 1;
            }
        }
    }

    debug!(radicals = found, "Radical assignment finished");
    Ok(found)
}

fn is_paired(structure: &Structure, atom_id: AtomId) -> bool {
    structure.atom(atom_id).is_none_or(|a| a.paired)
}

/// Nearest unpaired atom of `reactive` to `reactive[index]`, excluding itself.
/// Ties resolve to the earlier list position.
fn nearest_unpaired(structure: &Structure, reactive: &[AtomId], index: usize) -> Option<AtomId> {
    let origin = structure.atom(reactive[index])?;
    let mut best: Option<(f64, AtomId)> = None;
    for (j, &other_id) in reactive.iter().enumerate() {
        if j == index || other_id == reactive[index] || is_paired(structure, other_id) {
            continue;
        }
        let Some(other) = structure.atom(other_id) else {
            continue;
        };
        let distance = origin.distance_to(other);
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, other_id));
        }
    }
    best.map(|(_, id)| id)
}
