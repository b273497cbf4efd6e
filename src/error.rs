use crate::grid::Position;
use thiserror::Error;

/// Faults raised by grid and graph queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position ({}, {}) is outside the {width}x{height} grid", .position.x, .position.y)]
    OutOfBounds {
        position: Position,
        width: i32,
        height: i32,
    },

    #[error("position ({}, {}) is an obstacle", .0.x, .0.y)]
    Obstacle(Position),

    #[error("positions ({}, {}) and ({}, {}) are not adjacent", .0.x, .0.y, .1.x, .1.y)]
    NotAdjacent(Position, Position),

    #[error("no graph node at ({}, {})", .0.x, .0.y)]
    UnknownNode(Position),
}

/// Errors surfaced by the engine, the step player and the loaders.
///
/// `Stuck` and `Exhausted` are not here: they are ordinary outcomes of a
/// run, see [`crate::engine::Outcome`].
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] GridError),

    /// The run stopped after its step budget. Calling `run()` again resumes it.
    #[error("step budget exceeded after {steps} steps")]
    StepBudgetExceeded { steps: usize },

    #[error("step index {index} out of range (trace has {len} steps)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("invalid grid layout: {0}")]
    Layout(String),

    /// A constraint or planning problem that does not describe a valid instance
    #[error("invalid problem: {0}")]
    InvalidProblem(String),

    /// Annealing settings under which a run could never freeze
    #[error("invalid annealing schedule: {0}")]
    InvalidSchedule(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
