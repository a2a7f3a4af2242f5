use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use super::strategy::BondingStrategy;
use crate::core::models::ids::ChainId;
use crate::core::models::pair::Pair;
use crate::core::models::structure::Structure;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use tracing::{debug, info, trace};

/// Candidates scoring at or below this value are never committed.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.001;

/// A heap snapshot of one candidate's score. Entries whose version no longer matches
/// the candidate are stale and skipped on pop.
#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    score: f64,
    index: usize,
    version: u32,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Highest score first; ties go to the earlier candidate.
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

/// Summary of one selection run.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    /// Selected candidates in commit order.
    pub committed: Vec<Pair>,
    /// Pairs recorded on the structure by the commits, in order.
    pub recorded: Vec<Pair>,
    /// Candidates still in the working set when the loop stopped.
    pub remaining: Vec<Pair>,
}

impl SelectionOutcome {
    pub fn commit_count(&self) -> usize {
        self.committed.len()
    }

    /// Highest current score among the candidates that were never committed.
    pub fn max_remaining_score(&self) -> f64 {
        self.remaining
            .iter()
            .map(|pair| pair.score)
            .fold(0.0, f64::max)
    }
}

/// Greedy selection of cross-links over a fixed candidate set.
///
/// Repeatedly commits the best-scoring valid candidate, then rescores every remaining
/// candidate on a chain touched by the commit. Rescored candidates are pushed with a
/// new version; superseded heap entries are discarded lazily, which yields the same
/// order as rebuilding the queue after every commit. The engine is consumed by
/// [`run`](Self::run) and cannot be resumed.
pub struct SelectionEngine<'a> {
    strategy: &'a dyn BondingStrategy,
    candidates: Vec<Pair>,
    versions: Vec<u32>,
    active: Vec<bool>,
    by_chain: HashMap<ChainId, Vec<usize>>,
    heap: BinaryHeap<HeapEntry>,
}

impl<'a> SelectionEngine<'a> {
    /// Builds the working set and priority queue from scored candidates.
    pub fn new(strategy: &'a dyn BondingStrategy, candidates: Vec<Pair>) -> Self {
        let mut by_chain: HashMap<ChainId, Vec<usize>> = HashMap::new();
        for (index, pair) in candidates.iter().enumerate() {
            by_chain.entry(pair.chain1).or_default().push(index);
            if pair.chain2 != pair.chain1 {
                by_chain.entry(pair.chain2).or_default().push(index);
            }
        }

        let heap = candidates
            .iter()
            .enumerate()
            .filter(|(_, pair)| pair.score > 0.0)
            .map(|(index, pair)| HeapEntry {
                score: pair.score,
                index,
                version: 0,
            })
            .collect();

        Self {
            strategy,
            versions: vec![0; candidates.len()],
            active: vec![true; candidates.len()],
            candidates,
            by_chain,
            heap,
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    fn pop_valid(&mut self) -> Option<HeapEntry> {
        while let Some(entry) = self.heap.pop() {
            if self.active[entry.index] && self.versions[entry.index] == entry.version {
                return Some(entry);
            }
        }
        None
    }

    fn rescore_neighbors(&mut self, structure: &Structure, committed: &Pair) -> usize {
        let mut affected: Vec<usize> = [committed.chain1, committed.chain2]
            .iter()
            .filter_map(|chain| self.by_chain.get(chain))
            .flatten()
            .copied()
            .filter(|&index| self.active[index])
            .collect();
        affected.sort_unstable();
        affected.dedup();

        for &index in &affected {
            let score = self.strategy.score(structure, &self.candidates[index]);
            if score.to_bits() == self.candidates[index].score.to_bits() {
                continue;
            }
            trace!(
                candidate = index,
                old = self.candidates[index].score,
                new = score,
                "Rescored candidate"
            );
            self.candidates[index].score = score;
            self.versions[index] += 1;
            if score > 0.0 {
                self.heap.push(HeapEntry {
                    score,
                    index,
                    version: self.versions[index],
                });
            }
        }
        affected.len()
    }

    /// Runs the selection loop to completion against `structure`.
    ///
    /// # Errors
    ///
    /// Propagates commit failures from the strategy; the structure keeps every commit
    /// made before the failure.
    pub fn run(
        mut self,
        structure: &mut Structure,
        reporter: &ProgressReporter,
    ) -> Result<SelectionOutcome, EngineError> {
        let mut committed = Vec::new();
        let mut recorded = Vec::new();

        reporter.report(Progress::TaskStart {
            total_steps: self.candidates.len() as u64,
        });

        while let Some(entry) = self.pop_valid() {
            if entry.score <= ACCEPTANCE_THRESHOLD {
                break;
            }
            self.active[entry.index] = false;
            let pair = self.candidates[entry.index].clone();

            recorded.extend(self.strategy.commit(structure, &pair)?);
            debug!(
                candidate = entry.index,
                score = pair.score,
                distance = pair.distance,
                "Committed pair"
            );

            let rescored = self.rescore_neighbors(structure, &pair);
            trace!(rescored, "Invalidated chain-local candidates");

            committed.push(pair);
            reporter.report(Progress::TaskIncrement);
        }

        reporter.report(Progress::TaskFinish);

        let remaining: Vec<Pair> = self
            .candidates
            .into_iter()
            .zip(self.active)
            .filter_map(|(pair, active)| active.then_some(pair))
            .collect();

        info!(
            commits = committed.len(),
            remaining = remaining.len(),
            "Greedy selection finished"
        );

        Ok(SelectionOutcome {
            committed,
            recorded,
            remaining,
        })
    }
}
