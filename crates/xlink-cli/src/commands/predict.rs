use crate::cli::PredictArgs;
use crate::config::PartialPredictionConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xlinkpp::core::io::pdb::PdbFile;
use xlinkpp::core::io::report::{
    self, CORE_PAIR_OUTPUT_SUFFIX, PAIR_OUTPUT_SUFFIX, RADICAL_OUTPUT_SUFFIX,
    SURFACE_PAIR_OUTPUT_SUFFIX,
};
use xlinkpp::core::io::traits::StructureFile;
use xlinkpp::engine::progress::ProgressReporter;
use xlinkpp::workflows::predict::{self, PredictionResult};

/// Report file locations for one input structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub pairs: PathBuf,
    pub core_pairs: PathBuf,
    pub surface_pairs: PathBuf,
    pub radicals: PathBuf,
}

impl OutputPaths {
    pub fn new(input: &Path, output_dir: Option<&Path>) -> Result<Self> {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                CliError::Config(format!(
                    "Cannot derive report names from input path {:?}",
                    input
                ))
            })?;
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        let file = |suffix: &str| dir.join(format!("{}{}", stem, suffix));

        Ok(Self {
            pairs: file(PAIR_OUTPUT_SUFFIX),
            core_pairs: file(CORE_PAIR_OUTPUT_SUFFIX),
            surface_pairs: file(SURFACE_PAIR_OUTPUT_SUFFIX),
            radicals: file(RADICAL_OUTPUT_SUFFIX),
        })
    }
}

pub fn run(args: PredictArgs) -> Result<()> {
    info!("Starting 'predict' command.");

    let partial_config = match &args.config {
        Some(path) => PartialPredictionConfig::from_file(path)?,
        None => PartialPredictionConfig::default(),
    };
    let config = partial_config.merge_with_cli(&args)?;
    debug!("Final prediction configuration: {:?}", config);

    let outputs = OutputPaths::new(&args.input, args.output_dir.as_deref())?;

    info!("Reading input structure from {:?}", &args.input);
    let mut structure =
        PdbFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;
    info!(
        "Loaded {} atoms in {} chains.",
        structure.atom_count(),
        structure.chain_count()
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = predict::run(&mut structure, &config, &reporter)?;

    write_reports(&outputs, &result)?;
    print_summary(&result, &outputs);

    Ok(())
}

fn write_reports(outputs: &OutputPaths, result: &PredictionResult) -> Result<()> {
    if let Some(dir) = outputs.pairs.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    report::write_pairs_to_path(&outputs.pairs, &result.bonded_pairs, true)?;
    report::write_pairs_to_path(&outputs.core_pairs, &result.core_pairs, false)?;
    report::write_pairs_to_path(&outputs.surface_pairs, &result.surface_pairs, false)?;
    report::write_radicals_to_path(&outputs.radicals, &result.radicals)?;
    info!("Reports written to {:?}", outputs.pairs.parent());
    Ok(())
}

fn print_summary(result: &PredictionResult, outputs: &OutputPaths) {
    println!("\n--- Prediction Summary ---");
    for stage in &result.stages {
        println!(
            "{:<15} {:>6} reactive atoms, {:>7} candidates, {:>5} commits, {:>5} radicals",
            stage.strategy.to_string(),
            stage.reactive_atoms,
            stage.candidates,
            stage.commits,
            stage.radicals
        );
    }
    println!(
        "Bonded pairs: {} (core {}, surface {}), radicals: {}",
        result.bonded_pairs.len(),
        result.core_pairs.len(),
        result.surface_pairs.len(),
        result.radicals.len()
    );
    println!("Pairs written to:    {}", outputs.pairs.display());
    println!("Radicals written to: {}", outputs.radicals.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
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

    fn predict_args(argv: &[&str]) -> PredictArgs {
        let mut full = vec!["xlink", "predict"];
        full.extend_from_slice(argv);
        let Commands::Predict(args) = Cli::parse_from(full).command;
        args
    }

    #[test]
    fn output_paths_default_to_input_directory() {
        let outputs = OutputPaths::new(Path::new("/data/run1/micelle.pdb"), None).unwrap();
        assert_eq!(
            outputs.pairs,
            PathBuf::from("/data/run1/micelle_pair_output.txt")
        );
        assert_eq!(
            outputs.core_pairs,
            PathBuf::from("/data/run1/micelle_core_pair_output.txt")
        );
        assert_eq!(
            outputs.surface_pairs,
            PathBuf::from("/data/run1/micelle_sur_pair_output.txt")
        );
        assert_eq!(
            outputs.radicals,
            PathBuf::from("/data/run1/micelle_radical_output.txt")
        );

        let outputs =
            OutputPaths::new(Path::new("micelle.pdb"), Some(Path::new("out"))).unwrap();
        assert_eq!(outputs.radicals, PathBuf::from("out/micelle_radical_output.txt"));
    }

    #[test]
    fn predict_writes_all_reports() {
        let dir = tempdir().unwrap();
        let pdb = [
            atom_line(1, "C1", "DVB", 1, [0.0, 0.0, 0.0]),
            atom_line(2, "C2", "DVB", 1, [1.3, 0.0, 0.0]),
            atom_line(3, "C1", "DVB", 2, [4.3, 0.0, 0.0]),
            atom_line(4, "C2", "DVB", 2, [5.6, 0.0, 0.0]),
        ]
        .join("\n");
        let input = dir.path().join("micelle.pdb");
        fs::write(&input, pdb).unwrap();
        let reactive = dir.path().join("core.txt");
        fs::write(&reactive, "C1 DVB\nC2 DVB\n").unwrap();
        let out_dir = dir.path().join("reports");

        let args = predict_args(&[
            "-i",
            input.to_str().unwrap(),
            "--core-reactive",
            reactive.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ]);
        run(args).unwrap();

        let read = |suffix: &str| {
            fs::read_to_string(out_dir.join(format!("micelle{}", suffix))).unwrap()
        };
        assert_eq!(read(PAIR_OUTPUT_SUFFIX), "+2+3\n2 3\n");
        assert_eq!(read(CORE_PAIR_OUTPUT_SUFFIX), "2 3\n");
        assert_eq!(read(SURFACE_PAIR_OUTPUT_SUFFIX), "");
        assert_eq!(read(RADICAL_OUTPUT_SUFFIX), "1\n4\n");
    }

    #[test]
    fn unreadable_structure_is_a_file_parsing_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.pdb");
        fs::write(&input, "ATOM  abcde C1   DVB A   1").unwrap();
        let args = predict_args(&[
            "-i",
            input.to_str().unwrap(),
            "--core-reactive",
            "core.txt",
        ]);

        let result = run(args);
        assert!(matches!(result, Err(CliError::FileParsing { path, .. }) if path == input));
    }
}
