use crate::core::models::structure::{BondCollection, Structure};
use crate::core::topology::linking::LinkingTable;
use crate::core::topology::reactive::ReactiveAtomRegistry;
use crate::engine::candidates::{build_candidates, collect_reactive_atoms, positions};
use crate::engine::config::{PredictionConfig, StageConfig, StrategyKind};
use crate::engine::error::EngineError;
use crate::engine::neighbors::query_radius;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::selection::SelectionEngine;
use crate::engine::strategy::build_strategy;
use tracing::{info, instrument, warn};

/// Statistics of one strategy stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub strategy: StrategyKind,
    pub reactive_atoms: usize,
    pub candidates: usize,
    pub commits: usize,
    pub recorded_pairs: usize,
    pub radicals: usize,
}

/// Serial-level results of a prediction run, in commit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionResult {
    pub stages: Vec<StageReport>,
    pub bonded_pairs: Vec<(usize, usize)>,
    pub core_pairs: Vec<(usize, usize)>,
    pub surface_pairs: Vec<(usize, usize)>,
    pub radicals: Vec<usize>,
}

fn phase_name(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::Core => "Core Bonding",
        StrategyKind::Surface => "Surface Bonding",
        StrategyKind::SurfaceLinker => "Surface Linker Bonding",
    }
}

/// Runs every configured stage, in order, against `structure`.
///
/// Atom flags, bond collections and radicals accumulate on the structure across
/// stages, so a surface stage sees the atoms bonded by a preceding core stage.
///
/// # Errors
///
/// Returns [`EngineError`] if a reactive specification or linking table cannot be
/// loaded, or if a stage hits a structural lookup failure.
#[instrument(skip_all, name = "prediction_workflow")]
pub fn run(
    structure: &mut Structure,
    config: &PredictionConfig,
    reporter: &ProgressReporter,
) -> Result<PredictionResult, EngineError> {
    info!(
        atoms = structure.atom_count(),
        chains = structure.chain_count(),
        stages = config.stages.len(),
        "Starting cross-link prediction."
    );

    let mut stages = Vec::with_capacity(config.stages.len());
    for stage in &config.stages {
        reporter.report(Progress::PhaseStart {
            name: phase_name(stage.strategy),
        });
        let report = run_stage(structure, stage, reporter)?;
        reporter.report(Progress::PhaseFinish);
        stages.push(report);
    }

    let result = PredictionResult {
        stages,
        bonded_pairs: structure.serial_pairs(BondCollection::All),
        core_pairs: structure.serial_pairs(BondCollection::Core),
        surface_pairs: structure.serial_pairs(BondCollection::Surface),
        radicals: structure.radical_serials(),
    };

    info!(
        bonded = result.bonded_pairs.len(),
        radicals = result.radicals.len(),
        "Prediction complete."
    );
    Ok(result)
}

#[instrument(skip_all, fields(strategy = %stage.strategy))]
fn run_stage(
    structure: &mut Structure,
    stage: &StageConfig,
    reporter: &ProgressReporter,
) -> Result<StageReport, EngineError> {
    let registry = ReactiveAtomRegistry::load(&stage.reactive_path)?;
    if registry.is_empty() {
        warn!(
            path = %stage.reactive_path.display(),
            "Reactive atom file lists no atoms."
        );
    }
    let linking_table = match (&stage.linking_table_path, stage.strategy.is_surface()) {
        (Some(path), true) => Some(LinkingTable::load(path)?),
        _ => None,
    };
    let strategy = build_strategy(stage.strategy, stage.params.clone(), linking_table);

    let reactive = collect_reactive_atoms(structure, &registry);
    if reactive.is_empty() {
        warn!(
            path = %stage.reactive_path.display(),
            "No reactive atoms matched; the stage commits nothing."
        );
    }

    let neighbors = query_radius(
        &positions(structure, &reactive),
        stage.params.query_radius,
        stage.neighbor_search,
    );
    let candidates = build_candidates(structure, &reactive, &neighbors, strategy.as_ref());
    info!(
        reactive = reactive.len(),
        candidates = candidates.len(),
        "Candidate graph built."
    );
    reporter.message(format!(
        "{} reactive atoms, {} candidate pairs",
        reactive.len(),
        candidates.len()
    ));

    let engine = SelectionEngine::new(strategy.as_ref(), candidates);
    let candidate_count = engine.candidate_count();
    let outcome = engine.run(structure, reporter)?;
    let radicals = strategy.assign_radicals(structure, &registry)?;

    info!(
        commits = outcome.commit_count(),
        best_remaining = outcome.max_remaining_score(),
        radicals,
        "Stage finished."
    );

    Ok(StageReport {
        strategy: stage.strategy,
        reactive_atoms: reactive.len(),
        candidates: candidate_count,
        commits: outcome.commit_count(),
        recorded_pairs: outcome.recorded.len(),
        radicals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::PdbFile;
    use crate::core::io::traits::StructureFile;
    use crate::engine::config::{PredictionConfigBuilder, StageConfigBuilder};
    use std::fs;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn atom_line(serial: usize, name: &str, res_name: &str, res_seq: isize, pos: [f64; 3]) -> String {
        format!(
            "ATOM  {:>5} {:<4} {:<4}A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00          {:>2}",
            serial,
            name,
            res_name,
            res_seq,
            pos[0],
            pos[1],
            pos[2],
            &name[..1]
        )
    }

    // Two DVB chains bond in the core; a SUR head group links to a LNK chain.
    fn micelle() -> Structure {
        let lines = [
            atom_line(1, "C1", "DVB", 1, [0.0, 0.0, 0.0]),
            atom_line(2, "C2", "DVB", 1, [1.3, 0.0, 0.0]),
            atom_line(3, "C1", "DVB", 2, [4.3, 0.0, 0.0]),
            atom_line(4, "C2", "DVB", 2, [5.6, 0.0, 0.0]),
            atom_line(5, "CX3", "SUR", 3, [30.0, 0.0, 0.0]),
            atom_line(6, "CX2", "SUR", 3, [28.6, 0.0, 0.0]),
            atom_line(7, "N6", "LNK", 4, [33.0, 0.0, 0.0]),
            atom_line(8, "N4", "LNK", 4, [34.4, 0.0, 0.0]),
            atom_line(9, "N3", "LNK", 4, [33.0, 10.0, 0.0]),
            atom_line(10, "N1", "LNK", 4, [34.4, 10.0, 0.0]),
        ];
        PdbFile::read_from(&mut Cursor::new(lines.join("\n"))).unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn stage(kind: StrategyKind, reactive: PathBuf) -> StageConfig {
        StageConfigBuilder::new()
            .strategy(kind)
            .reactive_path(reactive)
            .query_radius(6.0)
            .isolation_weight(0.1)
            .build()
            .unwrap()
    }

    #[test]
    fn core_then_surface_stages_fill_all_collections() {
        let dir = tempdir().unwrap();
        let core = write(dir.path(), "core.txt", "C1 DVB\nC2 DVB\n");
        let surface = write(dir.path(), "surface.txt", "CX3 SUR\nN6 LNK\nN3 LNK\n");
        let config = PredictionConfigBuilder::new()
            .stage(stage(StrategyKind::Core, core))
            .stage(stage(StrategyKind::Surface, surface))
            .build()
            .unwrap();

        let mut structure = micelle();
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let result = run(&mut structure, &config, &reporter).unwrap();

        assert_eq!(result.core_pairs, vec![(2, 3)]);
        assert_eq!(result.surface_pairs, vec![(5, 8), (7, 6)]);
        assert_eq!(result.bonded_pairs, vec![(2, 3), (5, 8), (7, 6)]);
        // C1 of chain 1 and C2 of chain 2 are left next to reacted partners.
        assert_eq!(result.radicals, vec![1, 4]);

        assert_eq!(result.stages.len(), 2);
        assert_eq!(result.stages[0].strategy, StrategyKind::Core);
        // Four cross-chain DVB pairs lie within 6.0.
        assert_eq!(result.stages[0].candidates, 4);
        assert_eq!(result.stages[0].commits, 1);
        assert_eq!(result.stages[0].radicals, 2);
        assert_eq!(result.stages[1].reactive_atoms, 3);
        assert_eq!(result.stages[1].commits, 1);
        assert_eq!(result.stages[1].recorded_pairs, 2);

        drop(reporter);
        let events = events.into_inner().unwrap();
        assert_eq!(
            events.first(),
            Some(&Progress::PhaseStart {
                name: "Core Bonding"
            })
        );
        assert_eq!(events.last(), Some(&Progress::PhaseFinish));
    }

    #[test]
    fn unmatched_reactive_spec_commits_nothing() {
        let dir = tempdir().unwrap();
        let core = write(dir.path(), "core.txt", "C7 STY\n");
        let config = PredictionConfigBuilder::new()
            .stage(stage(StrategyKind::Core, core))
            .build()
            .unwrap();

        let mut structure = micelle();
        let result = run(&mut structure, &config, &ProgressReporter::new()).unwrap();
        assert_eq!(result.stages[0].reactive_atoms, 0);
        assert_eq!(result.stages[0].candidates, 0);
        assert!(result.bonded_pairs.is_empty());
        assert!(result.radicals.is_empty());
    }

    #[test]
    fn missing_reactive_file_fails() {
        let dir = tempdir().unwrap();
        let config = PredictionConfigBuilder::new()
            .stage(stage(StrategyKind::Core, dir.path().join("absent.txt")))
            .build()
            .unwrap();

        let mut structure = micelle();
        let result = run(&mut structure, &config, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::ReactiveSpec { .. })));
    }

    #[test]
    fn custom_linking_table_is_used_by_surface_stage() {
        let dir = tempdir().unwrap();
        let surface = write(dir.path(), "surface.txt", "CX3 SUR\nN6 LNK\n");
        // Maps N6 to N1 instead of N4.
        let table = write(
            dir.path(),
            "linking.toml",
            "[C]\nrule = \"positional\"\nnumber = 2\n\n[N]\nrule = \"explicit\"\ncodes = { \"6\" = 1 }\n",
        );
        let stage = StageConfigBuilder::new()
            .strategy(StrategyKind::SurfaceLinker)
            .reactive_path(surface)
            .linking_table_path(Some(table))
            .query_radius(6.0)
            .isolation_weight(0.1)
            .build()
            .unwrap();
        let config = PredictionConfigBuilder::new().stage(stage).build().unwrap();

        let mut structure = micelle();
        let result = run(&mut structure, &config, &ProgressReporter::new()).unwrap();
        assert_eq!(result.surface_pairs, vec![(5, 10), (7, 6)]);
    }
}
