use crate::annealing::CoolingSchedule;
use crate::error::{Result, SearchError};
use crate::grid::Direction;
use crate::heuristic::Heuristic;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SEARCH_TRACE_CONFIG";

/// Per-run options for [`crate::engine::create_run`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    /// Steps allowed per `run()` call; `None` is unbounded
    #[serde(default)]
    pub max_steps: Option<usize>,
    #[serde(default)]
    pub allow_diagonal: bool,
    /// Neighbor expansion order; defaults to N, E, S, W (clockwise with diagonals)
    #[serde(default)]
    pub neighbor_order: Option<Vec<Direction>>,
    /// Defaults to Manhattan, or Octile when diagonal moves are allowed
    #[serde(default)]
    pub heuristic: Option<Heuristic>,
    /// Greedy only: keep the global open set. When false the search
    /// commits to each choice and a dead end exhausts the run.
    #[serde(default = "default_backtracking")]
    pub backtracking: bool,
    /// Seed for the default random source (annealing only)
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub annealing: AnnealingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnnealingConfig {
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f64,
    /// The run freezes (Stuck) once the temperature drops below this
    #[serde(default = "default_min_temperature")]
    pub min_temperature: f64,
    #[serde(default)]
    pub cooling: CoolingSchedule,
}

/// Top-level file configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default = "default_scenario")]
    pub default_scenario: String,
}

// Default values
fn default_backtracking() -> bool { true }
fn default_initial_temperature() -> f64 { 5.0 }
fn default_min_temperature() -> f64 { 0.1 }
fn default_scenario() -> String { "search_demo".to_string() }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            allow_diagonal: false,
            neighbor_order: None,
            heuristic: None,
            backtracking: default_backtracking(),
            seed: 0,
            annealing: AnnealingConfig::default(),
        }
    }
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: default_initial_temperature(),
            min_temperature: default_min_temperature(),
            cooling: CoolingSchedule::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            default_scenario: default_scenario(),
        }
    }
}

impl RunConfig {
    /// Effective expansion order
    pub fn directions(&self) -> Vec<Direction> {
        match &self.neighbor_order {
            Some(order) => order
                .iter()
                .copied()
                .filter(|d| self.allow_diagonal || !d.is_diagonal())
                .collect(),
            None if self.allow_diagonal => Direction::ALL.to_vec(),
            None => Direction::CARDINAL.to_vec(),
        }
    }

    /// Effective heuristic
    pub fn heuristic(&self) -> Heuristic {
        match self.heuristic {
            Some(h) => h,
            None if self.allow_diagonal => Heuristic::Octile,
            None => Heuristic::Manhattan,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_neighbor_order(mut self, order: &[Direction]) -> Self {
        self.neighbor_order = Some(order.to_vec());
        self
    }

    pub fn with_diagonal(mut self, allow: bool) -> Self {
        self.allow_diagonal = allow;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    pub fn with_backtracking(mut self, backtracking: bool) -> Self {
        self.backtracking = backtracking;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.annealing = annealing;
        self
    }
}

impl AnnealingConfig {
    /// Reject settings under which the temperature never drops below
    /// `min_temperature`. Custom schedules are checked step by step instead.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temperature.is_finite() {
            return Err(SearchError::InvalidSchedule(format!(
                "initial temperature {} is not finite",
                self.initial_temperature
            )));
        }
        if !(self.min_temperature > 0.0) {
            return Err(SearchError::InvalidSchedule(format!(
                "min temperature {} must be positive",
                self.min_temperature
            )));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } if !(alpha > 0.0 && alpha < 1.0) => Err(
                SearchError::InvalidSchedule(format!("geometric alpha {} must be in (0, 1)", alpha)),
            ),
            CoolingSchedule::Linear { decrement } if !(decrement > 0.0) => Err(SearchError::InvalidSchedule(
                format!("linear decrement {} must be positive", decrement),
            )),
            _ => Ok(()),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from a specific file. Missing or malformed files fall back to defaults.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    EngineConfig::default()
                }
            },
            Err(_) => {
                debug!("No config at {}, using default configuration", path.display());
                EngineConfig::default()
            }
        }
    }

    /// Load from `$SEARCH_TRACE_CONFIG`, else `config.toml`, else defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = Path::new(&path);
            if path.exists() {
                return Self::load_from_path(path);
            }
            warn!("{}={} not found, trying config.toml", CONFIG_ENV_VAR, path.display());
        }
        Self::load_from_path(Path::new("config.toml"))
    }
}
