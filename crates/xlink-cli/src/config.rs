use crate::cli::PredictArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use xlinkpp::core::potential::PotentialParams;
use xlinkpp::engine::config as core_config;
use xlinkpp::engine::config::{NeighborSearch, StrategyKind};

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialCoreConfig {
    reactive: Option<PathBuf>,
    query_radius: Option<f64>,
    isolation_weight: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSurfaceConfig {
    reactive: Option<PathBuf>,
    query_radius: Option<f64>,
    isolation_weight: Option<f64>,
    linker: Option<bool>,
    linking_table: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialPotentialConfig {
    equilibrium_distance: Option<f64>,
    tolerance: Option<f64>,
    max_connectivity: Option<u32>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
enum PartialNeighborSearch {
    KdTree,
    BruteForce,
}

impl From<PartialNeighborSearch> for NeighborSearch {
    fn from(p: PartialNeighborSearch) -> Self {
        match p {
            PartialNeighborSearch::KdTree => NeighborSearch::KdTree,
            PartialNeighborSearch::BruteForce => NeighborSearch::BruteForce,
        }
    }
}

/// Prediction settings as read from a TOML file; every field is optional and
/// command-line arguments take precedence.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialPredictionConfig {
    core: Option<PartialCoreConfig>,
    surface: Option<PartialSurfaceConfig>,
    potential: Option<PartialPotentialConfig>,
    neighbor_search: Option<PartialNeighborSearch>,
}

fn rebase(base: &Path, path: &mut Option<PathBuf>) {
    if let Some(p) = path.as_mut() {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: '{}'", key, value))
    })
}

impl PartialPredictionConfig {
    /// Reads a config file. Relative file paths inside it are resolved against
    /// the file's own directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        if let Some(core) = config.core.as_mut() {
            rebase(base, &mut core.reactive);
        }
        if let Some(surface) = config.surface.as_mut() {
            rebase(base, &mut surface.reactive);
            rebase(base, &mut surface.linking_table);
        }
        Ok(config)
    }

    pub fn merge_with_cli(mut self, args: &PredictArgs) -> Result<core_config::PredictionConfig> {
        self.apply_set_values(&args.set_values)?;

        let core = self.core.take().unwrap_or_default();
        let surface = self.surface.take().unwrap_or_default();
        let potential = self.potential.take().unwrap_or_default();

        let defaults = PotentialParams::default();
        let potential = PotentialParams {
            equilibrium_distance: potential
                .equilibrium_distance
                .unwrap_or(defaults.equilibrium_distance),
            tolerance: potential.tolerance.unwrap_or(defaults.tolerance),
            max_connectivity: potential
                .max_connectivity
                .unwrap_or(defaults.max_connectivity),
        };
        let neighbor_search = if args.brute_force {
            NeighborSearch::BruteForce
        } else {
            self.neighbor_search.map(Into::into).unwrap_or_default()
        };

        let mut builder = core_config::PredictionConfigBuilder::new();

        if let Some(reactive) = args.core_reactive.clone().or(core.reactive) {
            let stage = core_config::StageConfigBuilder::new()
                .strategy(StrategyKind::Core)
                .reactive_path(reactive)
                .query_radius(
                    args.core_radius
                        .or(core.query_radius)
                        .unwrap_or(core_config::DEFAULT_QUERY_RADIUS),
                )
                .isolation_weight(
                    args.core_weight
                        .or(core.isolation_weight)
                        .unwrap_or(core_config::DEFAULT_ISOLATION_WEIGHT),
                )
                .potential(potential)
                .neighbor_search(neighbor_search)
                .build()
                .map_err(|e| CliError::Config(format!("[core] {}", e)))?;
            builder = builder.stage(stage);
        }

        if let Some(reactive) = args.surface_reactive.clone().or(surface.reactive) {
            let strategy = if args.linker || surface.linker.unwrap_or(false) {
                StrategyKind::SurfaceLinker
            } else {
                StrategyKind::Surface
            };
            let stage = core_config::StageConfigBuilder::new()
                .strategy(strategy)
                .reactive_path(reactive)
                .linking_table_path(args.linking_table.clone().or(surface.linking_table))
                .query_radius(
                    args.surface_radius
                        .or(surface.query_radius)
                        .unwrap_or(core_config::DEFAULT_QUERY_RADIUS),
                )
                .isolation_weight(
                    args.surface_weight
                        .or(surface.isolation_weight)
                        .unwrap_or(core_config::DEFAULT_ISOLATION_WEIGHT),
                )
                .potential(potential)
                .neighbor_search(neighbor_search)
                .build()
                .map_err(|e| CliError::Config(format!("[surface] {}", e)))?;
            builder = builder.stage(stage);
        }

        builder.build().map_err(|_| {
            CliError::Config(
                "No bonding stage configured. Provide --core-reactive and/or --surface-reactive, \
                 or set `reactive` in the [core] or [surface] section of the config file."
                    .to_string(),
            )
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "core.query-radius" => {
                    self.core.get_or_insert_with(Default::default).query_radius =
                        Some(parse_value(key, value)?);
                }
                "core.isolation-weight" => {
                    self.core
                        .get_or_insert_with(Default::default)
                        .isolation_weight = Some(parse_value(key, value)?);
                }
                "surface.query-radius" => {
                    self.surface
                        .get_or_insert_with(Default::default)
                        .query_radius = Some(parse_value(key, value)?);
                }
                "surface.isolation-weight" => {
                    self.surface
                        .get_or_insert_with(Default::default)
                        .isolation_weight = Some(parse_value(key, value)?);
                }
                "potential.equilibrium-distance" => {
                    self.potential
                        .get_or_insert_with(Default::default)
                        .equilibrium_distance = Some(parse_value(key, value)?);
                }
                "potential.tolerance" => {
                    self.potential
                        .get_or_insert_with(Default::default)
                        .tolerance = Some(parse_value(key, value)?);
                }
                "potential.max-connectivity" => {
                    self.potential
                        .get_or_insert_with(Default::default)
                        .max_connectivity = Some(parse_value(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn parse_args(extra: &[&str]) -> PredictArgs {
        let mut argv = vec!["xlink", "predict", "-i", "micelle.pdb"];
        argv.extend_from_slice(extra);
        let Commands::Predict(args) = Cli::parse_from(argv).command;
        args
    }

    #[test]
    fn cli_only_core_stage_uses_defaults() {
        let args = parse_args(&["--core-reactive", "core.txt"]);
        let config = PartialPredictionConfig::default()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.stages.len(), 1);
        let stage = &config.stages[0];
        assert_eq!(stage.strategy, StrategyKind::Core);
        assert_eq!(stage.reactive_path, PathBuf::from("core.txt"));
        assert_eq!(stage.params.query_radius, core_config::DEFAULT_QUERY_RADIUS);
        assert_eq!(
            stage.params.isolation_weight,
            core_config::DEFAULT_ISOLATION_WEIGHT
        );
        assert_eq!(stage.params.potential, PotentialParams::default());
        assert_eq!(stage.neighbor_search, NeighborSearch::KdTree);
    }

    #[test]
    fn core_stage_precedes_surface_stage() {
        let args = parse_args(&[
            "--surface-reactive",
            "sur.txt",
            "--core-reactive",
            "core.txt",
            "--linker",
            "--brute-force",
        ]);
        let config = PartialPredictionConfig::default()
            .merge_with_cli(&args)
            .unwrap();

        let kinds: Vec<_> = config.stages.iter().map(|s| s.strategy).collect();
        assert_eq!(kinds, vec![StrategyKind::Core, StrategyKind::SurfaceLinker]);
        assert!(
            config
                .stages
                .iter()
                .all(|s| s.neighbor_search == NeighborSearch::BruteForce)
        );
    }

    #[test]
    fn no_reactive_input_is_a_config_error() {
        let args = parse_args(&[]);
        let result = PartialPredictionConfig::default().merge_with_cli(&args);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn file_values_apply_and_cli_overrides_win() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("xlink.toml");
        fs::write(
            &config_path,
            r#"
neighbor-search = "brute-force"

[core]
reactive = "core.txt"
query-radius = 4.5
isolation-weight = 0.2

[surface]
reactive = "/abs/sur.txt"
linker = true
linking-table = "linking.toml"

[potential]
equilibrium-distance = 2.8
max-connectivity = 6
"#,
        )
        .unwrap();

        let args = parse_args(&["--core-radius", "5.0"]);
        let config = PartialPredictionConfig::from_file(&config_path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        let core = &config.stages[0];
        assert_eq!(core.reactive_path, dir.path().join("core.txt"));
        assert_eq!(core.params.query_radius, 5.0);
        assert_eq!(core.params.isolation_weight, 0.2);
        assert_eq!(core.params.potential.equilibrium_distance, 2.8);
        assert_eq!(core.params.potential.tolerance, 2.5);
        assert_eq!(core.params.potential.max_connectivity, 6);
        assert_eq!(core.neighbor_search, NeighborSearch::BruteForce);

        let surface = &config.stages[1];
        assert_eq!(surface.strategy, StrategyKind::SurfaceLinker);
        assert_eq!(surface.reactive_path, PathBuf::from("/abs/sur.txt"));
        assert_eq!(
            surface.linking_table_path,
            Some(dir.path().join("linking.toml"))
        );
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("xlink.toml");
        fs::write(&config_path, "[core]\nradius = 4.0\n").unwrap();

        let result = PartialPredictionConfig::from_file(&config_path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn set_values_override_file_values() {
        let args = parse_args(&[
            "--core-reactive",
            "core.txt",
            "-S",
            "core.isolation-weight=0.5",
            "potential.tolerance=2.0",
        ]);
        let partial = PartialPredictionConfig {
            core: Some(PartialCoreConfig {
                isolation_weight: Some(0.3),
                ..Default::default()
            }),
            ..Default::default()
        };

        let config = partial.merge_with_cli(&args).unwrap();
        assert_eq!(config.stages[0].params.isolation_weight, 0.5);
        assert_eq!(config.stages[0].params.potential.tolerance, 2.0);
    }

    #[test]
    fn set_values_reject_bad_input() {
        for bad in ["core.query-radius", "core.query-radius=abc", "core.radius=1.0"] {
            let args = parse_args(&["--core-reactive", "core.txt", "-S", bad]);
            let result = PartialPredictionConfig::default().merge_with_cli(&args);
            assert!(
                matches!(result, Err(CliError::Config(_))),
                "expected config error for '{}'",
                bad
            );
        }
    }

    #[test]
    fn invalid_radius_surfaces_builder_error() {
        let args = parse_args(&["--core-reactive", "core.txt", "--core-radius", "0"]);
        let result = PartialPredictionConfig::default().merge_with_cli(&args);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.starts_with("[core]")));
    }

    #[test]
    fn linking_table_on_core_only_run_is_ignored() {
        let args = parse_args(&["--core-reactive", "core.txt", "--linking-table", "t.toml"]);
        let config = PartialPredictionConfig::default()
            .merge_with_cli(&args)
            .unwrap();
        assert_eq!(config.stages[0].linking_table_path, None);
    }
}
