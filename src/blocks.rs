//! Blocks World planning by breadth-first search over states.
//!
//! A state is a fixed number of stacks listed bottom first. Only the top
//! block of a stack can move, onto another stack or onto an empty one
//! (the table).

use crate::error::{Result, SearchError};
use crate::player::StepPlayer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::debug;

/// States explored before the planner gives up
pub const MAX_STATES: usize = 200_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct World {
    stacks: Vec<Vec<char>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub block: char,
    pub from: usize,
    pub to: usize,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Move {} from Stack {} to Stack {}", self.block, self.from, self.to)
    }
}

impl World {
    pub fn new(stacks: Vec<Vec<char>>) -> Self {
        World { stacks }
    }

    /// Parse stacks written bottom first, e.g. `["DACB", "", "", ""]`
    pub fn from_strs(stacks: &[&str]) -> Self {
        World {
            stacks: stacks.iter().map(|s| s.chars().collect()).collect(),
        }
    }

    pub fn stacks(&self) -> &[Vec<char>] {
        &self.stacks
    }

    pub fn top(&self, stack: usize) -> Option<char> {
        self.stacks.get(stack).and_then(|s| s.last().copied())
    }

    /// All blocks, sorted
    pub fn blocks(&self) -> Vec<char> {
        let mut blocks: Vec<char> = self.stacks.iter().flatten().copied().collect();
        blocks.sort_unstable();
        blocks
    }

    /// Legal moves, by source stack then target stack
    pub fn moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, stack) in self.stacks.iter().enumerate() {
            let Some(&block) = stack.last() else { continue };
            for to in 0..self.stacks.len() {
                if to != from {
                    moves.push(Move { block, from, to });
                }
            }
        }
        moves
    }

    pub fn apply(&self, mv: Move) -> Result<World> {
        if mv.to >= self.stacks.len() || mv.from == mv.to || self.top(mv.from) != Some(mv.block) {
            return Err(SearchError::InvalidProblem(format!("illegal move: {}", mv)));
        }
        let mut next = self.clone();
        next.stacks[mv.from].pop();
        next.stacks[mv.to].push(mv.block);
        Ok(next)
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self
            .stacks
            .iter()
            .map(|s| format!("[{}]", s.iter().collect::<String>()))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocksStep {
    pub index: usize,
    pub state: World,
    /// `None` on the initial step
    pub moved: Option<char>,
    pub from: Option<usize>,
    pub to: Option<usize>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocksPlan {
    pub steps: Vec<BlocksStep>,
    pub states_explored: usize,
}

impl BlocksPlan {
    pub fn moves(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn player(&self) -> Result<StepPlayer<'_, BlocksStep>> {
        StepPlayer::new(&self.steps)
    }
}

/// Shortest move sequence from `initial` to `goal`.
///
/// Both states must have the same number of stacks and the same blocks.
pub fn plan(initial: &World, goal: &World) -> Result<BlocksPlan> {
    if initial.stacks.len() != goal.stacks.len() {
        return Err(SearchError::InvalidProblem(format!(
            "{} stacks in initial state, {} in goal",
            initial.stacks.len(),
            goal.stacks.len()
        )));
    }
    let blocks = initial.blocks();
    if blocks != goal.blocks() {
        return Err(SearchError::InvalidProblem(format!("blocks differ: {} vs {}", initial, goal)));
    }
    if blocks.windows(2).any(|w| w[0] == w[1]) {
        return Err(SearchError::InvalidProblem("duplicate block".to_string()));
    }

    let mut parents: HashMap<World, Option<(World, Move)>> = HashMap::new();
    let mut queue = VecDeque::new();
    parents.insert(initial.clone(), None);
    queue.push_back(initial.clone());

    while let Some(state) = queue.pop_front() {
        if state == *goal {
            let steps = unwind(&parents, state);
            debug!("Blocks plan: {} moves, {} states explored", steps.len() - 1, parents.len());
            return Ok(BlocksPlan {
                steps,
                states_explored: parents.len(),
            });
        }
        for mv in state.moves() {
            let next = state.apply(mv)?;
            if parents.contains_key(&next) {
                continue;
            }
            if parents.len() >= MAX_STATES {
                return Err(SearchError::StepBudgetExceeded { steps: parents.len() });
            }
            parents.insert(next.clone(), Some((state.clone(), mv)));
            queue.push_back(next);
        }
    }
    // only a single stack can get here
    Err(SearchError::InvalidProblem(format!("no plan from {} to {}", initial, goal)))
}

fn unwind(parents: &HashMap<World, Option<(World, Move)>>, goal: World) -> Vec<BlocksStep> {
    let mut chain = Vec::new();
    let mut at = goal;
    while let Some(Some((prev, mv))) = parents.get(&at) {
        chain.push((at.clone(), Some(*mv)));
        at = prev.clone();
    }
    chain.push((at, None));
    chain.reverse();

    let last = chain.len() - 1;
    chain
        .into_iter()
        .enumerate()
        .map(|(index, (state, mv))| {
            let description = match mv {
                None => format!("Start: {}", state),
                Some(mv) if index == last => format!("{} (goal reached)", mv),
                Some(mv) => mv.to_string(),
            };
            BlocksStep {
                index,
                moved: mv.map(|m| m.block),
                from: mv.map(|m| m.from),
                to: mv.map(|m| m.to),
                state,
                description,
            }
        })
        .collect()
}

/// Stack 0 holds D, A, C, B from the bottom up and is rebuilt as A, B, C, D
pub fn reverse_tower() -> (World, World) {
    (
        World::from_strs(&["DACB", "", "", ""]),
        World::from_strs(&["ABCD", "", "", ""]),
    )
}

/// C on A with B on the table; goal is A on B on C
pub fn sussman_anomaly() -> (World, World) {
    (World::from_strs(&["AC", "B", ""]), World::from_strs(&["CBA", "", ""]))
}
