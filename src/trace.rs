use crate::engine::{Outcome, StrategyKind};
use crate::error::{Result, SearchError};
use crate::grid::Position;
use crate::player::StepPlayer;
use serde::{Deserialize, Serialize};

/// Algorithm-specific values attached to a step
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "camelCase")]
pub enum StepExtra {
    #[default]
    None,
    HillClimbing { stuck: bool },
    #[serde(rename_all = "camelCase")]
    Annealing {
        temperature: f64,
        current_cost: f64,
        /// `None` only when the state has no neighbors at all
        neighbor: Option<Position>,
        neighbor_cost: Option<f64>,
        acceptance_probability: f64,
        accepted: bool,
    },
}

/// Immutable snapshot of one search step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub index: usize,
    /// Open set in extraction order
    pub open_set: Vec<Position>,
    /// Closed positions in the order they were closed
    pub closed_set: Vec<Position>,
    pub current: Position,
    /// From `current` back to the start
    pub path: Vec<Position>,
    /// Cost of `path`
    pub path_cost: f64,
    #[serde(default)]
    pub extra: StepExtra,
}

/// Append-only log of the steps of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub strategy: StrategyKind,
    pub start: Position,
    pub goal: Position,
    steps: Vec<Step>,
    /// Set once the run reaches a terminal state
    outcome: Option<Outcome>,
}

impl Trace {
    pub(crate) fn new(strategy: StrategyKind, start: Position, goal: Position) -> Self {
        Trace {
            strategy,
            start,
            goal,
            steps: Vec::new(),
            outcome: None,
        }
    }

    pub(crate) fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub(crate) fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn at(&self, index: usize) -> Result<&Step> {
        self.steps.get(index).ok_or(SearchError::IndexOutOfRange {
            index,
            len: self.steps.len(),
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Path from start to goal, if the run succeeded
    pub fn solution(&self) -> Option<Vec<Position>> {
        if self.outcome != Some(Outcome::Succeeded) {
            return None;
        }
        let mut path = self.last()?.path.clone();
        path.reverse();
        Some(path)
    }

    /// Read cursor positioned on the first step
    pub fn player(&self) -> Result<StepPlayer<'_, Step>> {
        StepPlayer::new(&self.steps)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
