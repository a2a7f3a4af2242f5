use crate::core::potential::PotentialParams;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_QUERY_RADIUS: f64 = 6.0;
pub const DEFAULT_ISOLATION_WEIGHT: f64 = 0.1;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Bonding strategy variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Any chain types; a chain pair bonds at most once.
    Core,
    /// Cross-type bonding only, recorded as derived linking pairs.
    Surface,
    /// Surface bonding where a chain pair bonds at most once.
    SurfaceLinker,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Core => "core",
            StrategyKind::Surface => "surface",
            StrategyKind::SurfaceLinker => "surface-linker",
        }
    }

    pub fn is_surface(&self) -> bool {
        matches!(self, StrategyKind::Surface | StrategyKind::SurfaceLinker)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborSearch {
    #[default]
    KdTree,
    BruteForce,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub query_radius: f64,
    pub isolation_weight: f64,
    pub potential: PotentialParams,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            query_radius: DEFAULT_QUERY_RADIUS,
            isolation_weight: DEFAULT_ISOLATION_WEIGHT,
            potential: PotentialParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageConfig {
    pub strategy: StrategyKind,
    pub reactive_path: PathBuf,
    pub linking_table_path: Option<PathBuf>,
    pub params: StrategyParams,
    pub neighbor_search: NeighborSearch,
}

#[derive(Default)]
pub struct StageConfigBuilder {
    strategy: Option<StrategyKind>,
    reactive_path: Option<PathBuf>,
    linking_table_path: Option<PathBuf>,
    query_radius: Option<f64>,
    isolation_weight: Option<f64>,
    potential: Option<PotentialParams>,
    neighbor_search: Option<NeighborSearch>,
}

impl StageConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = Some(strategy);
        self
    }
    pub fn reactive_path(mut self, path: PathBuf) -> Self {
        self.reactive_path = Some(path);
        self
    }
    pub fn linking_table_path(mut self, path: Option<PathBuf>) -> Self {
        self.linking_table_path = path;
        self
    }
    pub fn query_radius(mut self, radius: f64) -> Self {
        self.query_radius = Some(radius);
        self
    }
    pub fn isolation_weight(mut self, weight: f64) -> Self {
        self.isolation_weight = Some(weight);
        self
    }
    pub fn potential(mut self, potential: PotentialParams) -> Self {
        self.potential = Some(potential);
        self
    }
    pub fn neighbor_search(mut self, search: NeighborSearch) -> Self {
        self.neighbor_search = Some(search);
        self
    }

    pub fn build(self) -> Result<StageConfig, ConfigError> {
        let strategy = self
            .strategy
            .ok_or(ConfigError::MissingParameter("strategy"))?;
        let reactive_path = self
            .reactive_path
            .ok_or(ConfigError::MissingParameter("reactive_path"))?;
        let query_radius = self
            .query_radius
            .ok_or(ConfigError::MissingParameter("query_radius"))?;
        let isolation_weight = self
            .isolation_weight
            .ok_or(ConfigError::MissingParameter("isolation_weight"))?;
        let potential = self.potential.unwrap_or_default();

        if !(query_radius.is_finite() && query_radius > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "query_radius",
                reason: format!("must be a positive finite number, got {}", query_radius),
            });
        }
        if !(isolation_weight.is_finite() && isolation_weight >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "isolation_weight",
                reason: format!("must be a non-negative finite number, got {}", isolation_weight),
            });
        }
        if !(potential.tolerance.is_finite() && potential.tolerance > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "tolerance",
                reason: format!("must be a positive finite number, got {}", potential.tolerance),
            });
        }
        if !potential.equilibrium_distance.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "equilibrium_distance",
                reason: format!("must be finite, got {}", potential.equilibrium_distance),
            });
        }
        if self.linking_table_path.is_some() && !strategy.is_surface() {
            return Err(ConfigError::InvalidParameter {
                name: "linking_table_path",
                reason: format!("not used by the {} strategy", strategy),
            });
        }

        Ok(StageConfig {
            strategy,
            reactive_path,
            linking_table_path: self.linking_table_path,
            params: StrategyParams {
                query_radius,
                isolation_weight,
                potential,
            },
            neighbor_search: self.neighbor_search.unwrap_or_default(),
        })
    }
}

/// Ordered strategy stages applied to one structure.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionConfig {
    pub stages: Vec<StageConfig>,
}

#[derive(Default)]
pub struct PredictionConfigBuilder {
    stages: Vec<StageConfig>,
}

impl PredictionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: StageConfig) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn build(self) -> Result<PredictionConfig, ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::MissingParameter("stages"));
        }
        Ok(PredictionConfig {
            stages: self.stages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_builder() -> StageConfigBuilder {
        StageConfigBuilder::new()
            .strategy(StrategyKind::Core)
            .reactive_path(PathBuf::from("core.txt"))
            .query_radius(5.0)
            .isolation_weight(0.2)
    }

    #[test]
    fn stage_builder_fills_defaults() {
        let stage = core_builder().build().unwrap();
        assert_eq!(stage.strategy, StrategyKind::Core);
        assert_eq!(stage.params.query_radius, 5.0);
        assert_eq!(stage.params.isolation_weight, 0.2);
        assert_eq!(stage.params.potential, PotentialParams::default());
        assert_eq!(stage.neighbor_search, NeighborSearch::KdTree);
        assert!(stage.linking_table_path.is_none());
    }

    #[test]
    fn stage_builder_reports_missing_parameter() {
        let result = StageConfigBuilder::new()
            .strategy(StrategyKind::Surface)
            .query_radius(5.0)
            .isolation_weight(0.1)
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("reactive_path")));
    }

    #[test]
    fn stage_builder_rejects_non_positive_radius() {
        let result = core_builder().query_radius(0.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "query_radius",
                ..
            })
        ));
    }

    #[test]
    fn stage_builder_rejects_negative_weight() {
        let result = core_builder().isolation_weight(-1.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "isolation_weight",
                ..
            })
        ));
    }

    #[test]
    fn linking_table_only_applies_to_surface_stages() {
        let result = core_builder()
            .linking_table_path(Some(PathBuf::from("table.toml")))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "linking_table_path",
                ..
            })
        ));
    }

    #[test]
    fn prediction_builder_requires_a_stage() {
        assert_eq!(
            PredictionConfigBuilder::new().build(),
            Err(ConfigError::MissingParameter("stages"))
        );
        let config = PredictionConfigBuilder::new()
            .stage(core_builder().build().unwrap())
            .build()
            .unwrap();
        assert_eq!(config.stages.len(), 1);
    }

    #[test]
    fn strategy_kind_names() {
        assert_eq!(StrategyKind::SurfaceLinker.to_string(), "surface-linker");
        assert!(StrategyKind::Surface.is_surface());
        assert!(!StrategyKind::Core.is_surface());
    }
}
