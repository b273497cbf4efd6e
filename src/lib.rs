//! Step-by-step traces of classic search algorithms on grids and graphs.
//!
//! A run of BFS, DFS, Greedy best-first, A*, hill climbing or simulated
//! annealing records one immutable [`Step`] per expansion. The resulting
//! [`Trace`] can be replayed with a [`StepPlayer`] or saved as JSON.

pub mod annealing;
pub mod blocks;
pub mod config;
pub mod csp;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod grid;
pub mod heuristic;
pub mod landscape;
pub mod player;
pub mod scenario;
pub mod space;
pub mod trace;

pub use config::{AnnealingConfig, EngineConfig, RunConfig};
pub use engine::{create_run, search, Outcome, RunStatus, SearchRun, StrategyKind};
pub use error::{GridError, Result, SearchError};
pub use graph::Graph;
pub use grid::{Direction, Grid, Position};
pub use heuristic::Heuristic;
pub use player::StepPlayer;
pub use scenario::Scenario;
pub use space::SearchSpace;
pub use trace::{Step, StepExtra, Trace};
