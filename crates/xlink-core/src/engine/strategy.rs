use super::config::{StrategyKind, StrategyParams};
use super::error::EngineError;
use super::linking::derive_linking_pairs;
use super::radicals::assign_core_radicals;
use crate::core::models::pair::Pair;
use crate::core::models::structure::{BondKind, Structure};
use crate::core::potential::bond_potential;
use crate::core::topology::linking::LinkingTable;
use crate::core::topology::reactive::ReactiveAtomRegistry;
use tracing::debug;

/// The policy that decides which pairs may bond, how they rank, and what a bond does
/// to the structure.
pub trait BondingStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn params(&self) -> &StrategyParams;

    /// The collection committed bonds are recorded in and connectivity is counted from.
    fn bond_kind(&self) -> BondKind;

    fn is_valid_pair(&self, structure: &Structure, pair: &Pair) -> bool;

    /// Scores a pair against the current state of the structure.
    ///
    /// Invalid pairs score 0 before the potential is evaluated.
    fn score(&self, structure: &Structure, pair: &Pair) -> f64 {
        if !self.is_valid_pair(structure, pair) {
            return 0.0;
        }
        let params = self.params();
        let kind = self.bond_kind();
        let connectivity =
            structure.connectivity(kind, pair.chain1) + structure.connectivity(kind, pair.chain2);
        let isolatedness = params.potential.isolatedness(connectivity);
        bond_potential(
            pair.distance,
            &params.potential,
            params.isolation_weight,
            isolatedness,
        )
    }

    /// Applies a selected pair to the structure and returns the pairs recorded for it.
    fn commit(&self, structure: &mut Structure, pair: &Pair) -> Result<Vec<Pair>, EngineError>;

    /// Flags unreacted reactive atoms once selection is done; returns the number flagged.
    fn assign_radicals(
        &self,
        structure: &mut Structure,
        registry: &ReactiveAtomRegistry,
    ) -> Result<usize, EngineError>;
}

/// Builds the strategy for `kind`. Surface variants fall back to the default
/// linking table when none is given.
pub fn build_strategy(
    kind: StrategyKind,
    params: StrategyParams,
    linking_table: Option<LinkingTable>,
) -> Box<dyn BondingStrategy> {
    match kind {
        StrategyKind::Core => Box::new(CoreStrategy::new(params)),
        StrategyKind::Surface | StrategyKind::SurfaceLinker => Box::new(SurfaceStrategy::new(
            params,
            linking_table.unwrap_or_default(),
            kind == StrategyKind::SurfaceLinker,
        )),
    }
}

fn both_atoms_free(structure: &Structure, pair: &Pair) -> Option<bool> {
    let a = structure.atom(pair.atom1)?;
    let b = structure.atom(pair.atom2)?;
    Some(!a.externally_bonded && !b.externally_bonded)
}

fn chains_already_bonded(structure: &Structure, pair: &Pair) -> Option<bool> {
    Some(structure.chain(pair.chain1)?.is_bonded_to(pair.chain2))
}

fn mark_bonded(structure: &mut Structure, pair: &Pair) -> Result<(), EngineError> {
    structure
        .mark_bonded(pair)
        .ok_or_else(|| EngineError::Internal("Committed pair refers to a missing atom or chain".into()))
}

#[derive(Debug, Clone)]
pub struct CoreStrategy {
    params: StrategyParams,
}

impl CoreStrategy {
    pub fn new(params: StrategyParams) -> Self {
        Self { params }
    }
}

impl BondingStrategy for CoreStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Core
    }

    fn params(&self) -> &StrategyParams {
        &self.params
    }

    fn bond_kind(&self) -> BondKind {
        BondKind::Core
    }

    fn is_valid_pair(&self, structure: &Structure, pair: &Pair) -> bool {
        if pair.chain1 == pair.chain2 {
            return false;
        }
        both_atoms_free(structure, pair).unwrap_or(false)
            && !chains_already_bonded(structure, pair).unwrap_or(true)
    }

    fn commit(&self, structure: &mut Structure, pair: &Pair) -> Result<Vec<Pair>, EngineError> {
        mark_bonded(structure, pair)?;
        structure.record_bond(BondKind::Core, pair.clone());
        Ok(vec![pair.clone()])
    }

    fn assign_radicals(
        &self,
        structure: &mut Structure,
        registry: &ReactiveAtomRegistry,
    ) -> Result<usize, EngineError> {
        assign_core_radicals(structure, registry)
    }
}

/// Cross-type bonding between surface groups and linkers.
///
/// The geometrically selected atoms are not the chemical bond: each commit records the
/// two derived linking pairs instead.
#[derive(Debug, Clone)]
pub struct SurfaceStrategy {
    params: StrategyParams,
    linking_table: LinkingTable,
    linker_restricted: bool,
}

impl SurfaceStrategy {
    pub fn new(params: StrategyParams, linking_table: LinkingTable, linker_restricted: bool) -> Self {
        Self {
            params,
            linking_table,
            linker_restricted,
        }
    }
}

impl BondingStrategy for SurfaceStrategy {
    fn kind(&self) -> StrategyKind {
        if self.linker_restricted {
            StrategyKind::SurfaceLinker
        } else {
            StrategyKind::Surface
        }
    }

    fn params(&self) -> &StrategyParams {
        &self.params
    }

    fn bond_kind(&self) -> BondKind {
        BondKind::Surface
    }

    fn is_valid_pair(&self, structure: &Structure, pair: &Pair) -> bool {
        if pair.chain1 == pair.chain2 || !both_atoms_free(structure, pair).unwrap_or(false) {
            return false;
        }
        let (Some(chain1), Some(chain2)) = (structure.chain(pair.chain1), structure.chain(pair.chain2))
        else {
            return false;
        };
        if chain1.is_same_type(chain2) {
            return false;
        }
        !(self.linker_restricted && chain1.is_bonded_to(pair.chain2))
    }

    fn commit(&self, structure: &mut Structure, pair: &Pair) -> Result<Vec<Pair>, EngineError> {
        // Resolve both partners before touching any state.
        let derived = derive_linking_pairs(structure, &self.linking_table, pair)?;

        mark_bonded(structure, pair)?;
        for linking_pair in &derived {
            mark_bonded(structure, linking_pair)?;
            structure.record_bond(BondKind::Surface, linking_pair.clone());
        }
        debug!(
            derived = derived.len(),
            "Recorded linking pairs for surface commit"
        );
        Ok(derived.to_vec())
    }

    fn assign_radicals(
        &self,
        _structure: &mut Structure,
        _registry: &ReactiveAtomRegistry,
    ) -> Result<usize, EngineError> {
        Ok(0)
    }
}
