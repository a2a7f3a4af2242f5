use super::ids::{AtomId, ChainId};
use std::hash::{Hash, Hasher};

/// Identity of a pair: the unordered pair of its atom IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(AtomId, AtomId);

impl PairKey {
    pub fn new(a: AtomId, b: AtomId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// A candidate or committed bond between two atoms of different chains.
///
/// The distance is fixed at construction; the score is rewritten whenever the pair
/// is rescored. Two pairs are the same pair when they join the same two atoms, in
/// either order.
#[derive(Debug, Clone)]
pub struct Pair {
    pub atom1: AtomId,
    pub atom2: AtomId,
    pub chain1: ChainId,
    pub chain2: ChainId,
    pub distance: f64,
    pub score: f64,
}

impl Pair {
    pub fn new(
        atom1: AtomId,
        chain1: ChainId,
        atom2: AtomId,
        chain2: ChainId,
        distance: f64,
    ) -> Self {
        Self {
            atom1,
            atom2,
            chain1,
            chain2,
            distance,
            score: 0.0,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn key(&self) -> PairKey {
        PairKey::new(self.atom1, self.atom2)
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pair {}

impl Hash for Pair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
