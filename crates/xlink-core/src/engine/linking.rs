use super::error::EngineError;
use crate::core::models::ids::AtomId;
use crate::core::models::pair::Pair;
use crate::core::models::structure::Structure;
use crate::core::topology::linking::LinkingTable;

fn resolve_partner(
    structure: &Structure,
    table: &LinkingTable,
    atom_id: AtomId,
) -> Result<AtomId, EngineError> {
    let atom = structure
        .atom(atom_id)
        .ok_or_else(|| EngineError::Internal(format!("Atom {:?} not found", atom_id)))?;
    let chain = structure
        .chain(atom.chain_id)
        .ok_or_else(|| EngineError::Internal(format!("Chain of atom {} not found", atom.serial)))?;

    let partner_name = table
        .partner_name(atom)
        .map_err(|source| EngineError::Linking {
            serial: atom.serial,
            source,
        })?;
    chain
        .get_atom_id_by_name(&partner_name)
        .ok_or(EngineError::PartnerNotFound {
            residue_seq: chain.id,
            atom_name: partner_name,
        })
}

fn linking_pair(structure: &Structure, atom1: AtomId, atom2: AtomId) -> Result<Pair, EngineError> {
    let (Some(a), Some(b)) = (structure.atom(atom1), structure.atom(atom2)) else {
        return Err(EngineError::Internal("Linking pair refers to a missing atom".into()));
    };
    structure
        .make_pair(atom1, atom2, a.distance_to(b))
        .map(|pair| pair.with_score(0.0))
        .ok_or_else(|| EngineError::Internal("Linking pair refers to a missing atom".into()))
}

/// Derives the chemical bonds implied by a geometrically selected surface pair.
///
/// For a selected pair `(a, b)` the returned pairs are `(a, partner(b))` and
/// `(b, partner(a))`, where a partner is the atom of the same chain named by the
/// linking table. Both carry a zero score.
///
/// # Errors
///
/// Returns [`EngineError::Linking`] if the table has no rule for an atom and
/// [`EngineError::PartnerNotFound`] if the derived name is absent from the chain.
pub fn derive_linking_pairs(
    structure: &Structure,
    table: &LinkingTable,
    pair: &Pair,
) -> Result<[Pair; 2], EngineError> {
    let partner_of_b = resolve_partner(structure, table, pair.atom2)?;
    let partner_of_a = resolve_partner(structure, table, pair.atom1)?;
    Ok([
        linking_pair(structure, pair.atom1, partner_of_b)?,
        linking_pair(structure, pair.atom2, partner_of_a)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topology::linking::LinkingError;
    use crate::engine::testing::{StructureFixture, atom_id};

    fn selected(structure: &Structure, s1: usize, s2: usize) -> Pair {
        structure
            .make_pair(atom_id(structure, s1), atom_id(structure, s2), 3.0)
            .unwrap()
    }

    #[test]
    fn derives_crossed_partner_pairs() {
        let structure = StructureFixture::new()
            .atom(10, "CX3", "SUR", 1, [0.0, 0.0, 0.0])
            .atom(11, "CX2", "SUR", 1, [1.0, 0.0, 0.0])
            .atom(20, "N3", "LNK", 2, [3.0, 0.0, 0.0])
            .atom(21, "N1", "LNK", 2, [3.0, 4.0, 0.0])
            .build();

        let [first, second] =
            derive_linking_pairs(&structure, &LinkingTable::default(), &selected(&structure, 10, 20))
                .unwrap();

        assert_eq!(first.atom1, atom_id(&structure, 10));
        assert_eq!(first.atom2, atom_id(&structure, 21));
        assert!((first.distance - 5.0).abs() < 1e-12);
        assert_eq!(second.atom1, atom_id(&structure, 20));
        assert_eq!(second.atom2, atom_id(&structure, 11));
        assert_eq!(first.score, 0.0);
        assert_ne!(first.chain1, first.chain2);
    }

    #[test]
    fn unsupported_element_is_reported_with_serial() {
        let structure = StructureFixture::new()
            .atom(1, "O1", "SUR", 1, [0.0, 0.0, 0.0])
            .atom(2, "N6", "LNK", 2, [3.0, 0.0, 0.0])
            .atom(3, "N4", "LNK", 2, [4.0, 0.0, 0.0])
            .build();

        let result =
            derive_linking_pairs(&structure, &LinkingTable::default(), &selected(&structure, 1, 2));
        assert!(matches!(
            result,
            Err(EngineError::Linking {
                serial: 1,
                source: LinkingError::UnsupportedElement { .. }
            })
        ));
    }

    #[test]
    fn missing_partner_is_fatal() {
        let structure = StructureFixture::new()
            .atom(1, "CX3", "SUR", 1, [0.0, 0.0, 0.0])
            .atom(2, "CX2", "SUR", 1, [1.0, 0.0, 0.0])
            .atom(3, "N6", "LNK", 2, [3.0, 0.0, 0.0])
            .build();

        let result =
            derive_linking_pairs(&structure, &LinkingTable::default(), &selected(&structure, 1, 3));
        assert!(matches!(
            result,
            Err(EngineError::PartnerNotFound { residue_seq: 2, .. })
        ));
    }
}
