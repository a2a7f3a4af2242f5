use super::neighbors::Neighbor;
use super::strategy::BondingStrategy;
use crate::core::models::ids::AtomId;
use crate::core::models::pair::Pair;
use crate::core::models::structure::Structure;
use crate::core::topology::reactive::ReactiveAtomRegistry;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Atoms registered as reactive for their chain type, in ingestion order.
pub fn collect_reactive_atoms(structure: &Structure, registry: &ReactiveAtomRegistry) -> Vec<AtomId> {
    structure
        .atoms_iter()
        .filter(|(_, atom)| {
            structure
                .chain(atom.chain_id)
                .is_some_and(|chain| registry.is_reactive(&chain.chain_type, &atom.name))
        })
        .map(|(id, _)| id)
        .collect()
}

pub fn positions(structure: &Structure, atoms: &[AtomId]) -> Vec<[f64; 3]> {
    atoms
        .iter()
        .filter_map(|&id| structure.atom(id))
        .map(|atom| [atom.position.x, atom.position.y, atom.position.z])
        .collect()
}

/// Builds the scored candidate set from radius-query results over `reactive`.
///
/// `neighbors[i]` must hold the query results for `reactive[i]`. Each unordered atom
/// pair is considered once, with the lower reactive index as `atom1`; self pairs,
/// same-chain pairs and pairs scoring `<= 0` are dropped. The result is ordered by
/// `(atom1, atom2)` reactive index.
pub fn build_candidates(
    structure: &Structure,
    reactive: &[AtomId],
    neighbors: &[Vec<Neighbor>],
    strategy: &dyn BondingStrategy,
) -> Vec<Pair> {
    let candidates_for = |i: usize| -> Vec<(usize, usize, Pair)> {
        let Some(hits) = neighbors.get(i) else {
            return Vec::new();
        };
        let atom_i = reactive[i];
        hits.iter()
            .filter(|n| n.index > i && n.index < reactive.len())
            .filter_map(|n| {
                let atom_j = reactive[n.index];
                if atom_j == atom_i {
                    return None;
                }
                let pair = structure.make_pair(atom_i, atom_j, n.distance)?;
                if pair.chain1 == pair.chain2 {
                    return None;
                }
                let score = strategy.score(structure, &pair);
                (score > 0.0).then(|| (i, n.index, pair.with_score(score)))
            })
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let mut scored: Vec<(usize, usize, Pair)> =
        (0..reactive.len()).flat_map(candidates_for).collect();

    #[cfg(feature = "parallel")]
    let mut scored: Vec<(usize, usize, Pair)> = (0..reactive.len())
        .into_par_iter()
        .flat_map_iter(candidates_for)
        .collect();

    scored.sort_unstable_by_key(|(i, j, _)| (*i, *j));
    scored.into_iter().map(|(_, _, pair)| pair).collect()
}
