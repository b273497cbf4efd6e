//! Search engine and trace recorder.
//!
//! One expand loop drives all six strategies:
//! 1. Systematic (BFS, DFS, Greedy, A*): extract from the frontier, close,
//!    relax neighbors, insert.
//! 2. Hill climbing: move to the best strictly-improving neighbor or stop.
//! 3. Simulated annealing: pick a random neighbor, accept by temperature.
//!
//! Every `step()` appends exactly one immutable [`Step`] to the trace. Runs
//! walk any [`SearchSpace`], so grids and explicit graphs share the loop.

use crate::annealing;
use crate::config::RunConfig;
use crate::error::{Result, SearchError};
use crate::frontier::{BestNeighbor, Fifo, Frontier, FrontierEntry, Lifo, Priority, PriorityKey};
use crate::grid::{Direction, Position};
use crate::heuristic::Heuristic;
use crate::space::SearchSpace;
use crate::trace::{Step, StepExtra, Trace};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Bfs,
    Dfs,
    GreedyBestFirst,
    AStar,
    HillClimbing,
    SimulatedAnnealing,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::Bfs,
        StrategyKind::Dfs,
        StrategyKind::GreedyBestFirst,
        StrategyKind::AStar,
        StrategyKind::HillClimbing,
        StrategyKind::SimulatedAnnealing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Bfs => "Breadth-First Search",
            StrategyKind::Dfs => "Depth-First Search",
            StrategyKind::GreedyBestFirst => "Greedy Best-First Search",
            StrategyKind::AStar => "A* Search",
            StrategyKind::HillClimbing => "Hill Climbing",
            StrategyKind::SimulatedAnnealing => "Simulated Annealing",
        }
    }

    /// Global open set for the systematic strategies, `None` for local search
    fn frontier(&self) -> Option<Box<dyn Frontier + Send>> {
        match self {
            StrategyKind::Bfs => Some(Box::new(Fifo::default())),
            StrategyKind::Dfs => Some(Box::new(Lifo::default())),
            StrategyKind::GreedyBestFirst => Some(Box::new(Priority::new(PriorityKey::H))),
            StrategyKind::AStar => Some(Box::new(Priority::new(PriorityKey::F))),
            StrategyKind::HillClimbing | StrategyKind::SimulatedAnnealing => None,
        }
    }

    /// Whether a strictly better g may re-open a seen node
    fn relaxes(&self) -> bool {
        matches!(self, StrategyKind::GreedyBestFirst | StrategyKind::AStar)
    }
}

/// How a finished run ended. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    /// The open set emptied before the goal was reached
    Exhausted,
    /// Local search has no acceptable move left
    Stuck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ready,
    Running,
    Finished(Outcome),
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Finished(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Unseen,
    Open,
    Closed,
}

/// Run-local bookkeeping for one position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeState {
    pub g: f64,
    pub h: f64,
    pub parent: Option<Position>,
    pub status: NodeStatus,
}

impl NodeState {
    pub fn f(&self) -> f64 {
        self.g + self.h
    }
}

/// A single search over one grid or graph with one strategy
pub struct SearchRun<'g> {
    space: &'g dyn SearchSpace,
    start: Position,
    goal: Position,
    strategy: StrategyKind,
    config: RunConfig,
    directions: Vec<Direction>,
    heuristic: Heuristic,
    nodes: HashMap<Position, NodeState>,
    frontier: Option<Box<dyn Frontier + Send>>,
    closed: Vec<Position>,
    current: Position,
    seq: u64,
    status: RunStatus,
    trace: Trace,
    /// Annealing only: loop-erased walk from start to current
    walk: Vec<Position>,
    temperature: f64,
    rng: Box<dyn RngCore + Send>,
}

/// Validate the endpoints and set up a run. Step 0 is recorded immediately.
pub fn create_run<'g, S: SearchSpace>(
    space: &'g S,
    start: Position,
    goal: Position,
    strategy: StrategyKind,
    config: RunConfig,
) -> Result<SearchRun<'g>> {
    space.check(start)?;
    space.check(goal)?;
    if strategy == StrategyKind::SimulatedAnnealing {
        config.annealing.validate()?;
    }

    let directions = config.directions();
    let heuristic = config.heuristic();
    let h = heuristic.estimate(start, goal);

    let mut nodes = HashMap::new();
    nodes.insert(
        start,
        NodeState {
            g: 0.0,
            h,
            parent: None,
            status: NodeStatus::Open,
        },
    );

    let mut frontier = strategy.frontier();
    if let Some(frontier) = frontier.as_mut() {
        frontier.insert(FrontierEntry {
            position: start,
            g: 0.0,
            h,
            seq: 0,
        });
    }

    debug!("Created {} run {} -> {} on {}", strategy.name(), start, goal, space.describe());

    let mut run = SearchRun {
        space,
        start,
        goal,
        strategy,
        temperature: config.annealing.initial_temperature,
        rng: Box::new(ChaCha20Rng::seed_from_u64(config.seed)),
        config,
        directions,
        heuristic,
        nodes,
        frontier,
        closed: Vec::new(),
        current: start,
        seq: 1,
        status: RunStatus::Ready,
        trace: Trace::new(strategy, start, goal),
        walk: vec![start],
    };
    let extra = match strategy {
        StrategyKind::HillClimbing => StepExtra::HillClimbing { stuck: false },
        _ => StepExtra::None,
    };
    run.record(vec![start], extra)?;
    Ok(run)
}

/// Run a search to completion and return its trace
pub fn search<S: SearchSpace>(
    space: &S,
    start: Position,
    goal: Position,
    strategy: StrategyKind,
    config: RunConfig,
) -> Result<Trace> {
    let mut run = create_run(space, start, goal, strategy, config)?;
    run.run()?;
    Ok(run.into_trace())
}

impl<'g> SearchRun<'g> {
    /// Replace the seeded default random source
    pub fn with_random_source(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn current(&self) -> Position {
        self.current
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn node_state(&self, pos: Position) -> Option<&NodeState> {
        self.nodes.get(&pos)
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn into_trace(self) -> Trace {
        self.trace
    }

    /// Step until a terminal state.
    ///
    /// With `max_steps` set, at most that many steps run per call; hitting
    /// the budget returns `StepBudgetExceeded` and a later call resumes.
    pub fn run(&mut self) -> Result<&Trace> {
        let mut executed = 0;
        while !self.status.is_terminal() {
            if let Some(max) = self.config.max_steps {
                if executed >= max {
                    debug!("{} run paused after {} steps", self.strategy.name(), executed);
                    return Err(SearchError::StepBudgetExceeded { steps: executed });
                }
            }
            self.step()?;
            executed += 1;
        }
        Ok(&self.trace)
    }

    /// Advance by one step. A finished run is left untouched.
    pub fn step(&mut self) -> Result<RunStatus> {
        match self.status {
            RunStatus::Finished(_) => return Ok(self.status),
            RunStatus::Ready => self.status = RunStatus::Running,
            RunStatus::Running => {}
        }

        match self.strategy {
            StrategyKind::HillClimbing => self.climb()?,
            StrategyKind::SimulatedAnnealing => self.anneal()?,
            _ => self.expand()?,
        }
        Ok(self.status)
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    fn close(&mut self, pos: Position) {
        if let Some(node) = self.nodes.get_mut(&pos) {
            node.status = NodeStatus::Closed;
        }
        self.closed.retain(|&p| p != pos);
        self.closed.push(pos);
    }

    fn finish(&mut self, outcome: Outcome) {
        debug!(
            "{} run finished: {:?} at {} after {} steps",
            self.strategy.name(),
            outcome,
            self.current,
            self.trace.step_count()
        );
        self.status = RunStatus::Finished(outcome);
        self.trace.finish(outcome);
    }

    /// BFS, DFS, Greedy and A*
    fn expand(&mut self) -> Result<()> {
        let entry = loop {
            let next = self.frontier.as_mut().and_then(|f| f.extract_next());
            match next {
                Some(e) if self.nodes.get(&e.position).map(|n| n.status) == Some(NodeStatus::Closed) => continue,
                Some(e) => break e,
                None => {
                    self.record(Vec::new(), StepExtra::None)?;
                    self.finish(Outcome::Exhausted);
                    return Ok(());
                }
            }
        };

        let pos = entry.position;
        self.current = pos;
        self.close(pos);
        trace!("Expanding {} g={:.2} h={:.2}", pos, entry.g, entry.h);

        if pos == self.goal {
            let open = self.open_positions();
            self.record(open, StepExtra::None)?;
            self.finish(Outcome::Succeeded);
            return Ok(());
        }

        let committed = self.strategy == StrategyKind::GreedyBestFirst && !self.config.backtracking;
        if committed {
            if let Some(frontier) = self.frontier.as_mut() {
                frontier.clear();
            }
            for node in self.nodes.values_mut() {
                if node.status == NodeStatus::Open {
                    node.status = NodeStatus::Unseen;
                }
            }
        }

        for next in self.space.neighbors(pos, &self.directions)? {
            let g = entry.g + self.space.cost(pos, next)?;
            let admit = match self.nodes.get(&next) {
                None => true,
                Some(node) if node.status == NodeStatus::Unseen => true,
                Some(node) if committed => node.status != NodeStatus::Closed,
                Some(node) if self.strategy.relaxes() => g < node.g,
                Some(_) => false,
            };
            if !admit {
                continue;
            }

            let h = self.heuristic.estimate(next, self.goal);
            self.nodes.insert(
                next,
                NodeState {
                    g,
                    h,
                    parent: Some(pos),
                    status: NodeStatus::Open,
                },
            );
            self.closed.retain(|&p| p != next);
            let seq = self.next_seq();
            if let Some(frontier) = self.frontier.as_mut() {
                frontier.insert(FrontierEntry { position: next, g, h, seq });
            }
        }

        let open = self.open_positions();
        let exhausted = open.is_empty();
        self.record(open, StepExtra::None)?;
        if exhausted {
            self.finish(Outcome::Exhausted);
        }
        Ok(())
    }

    /// Steepest-descent hill climbing on h, no backtracking
    fn climb(&mut self) -> Result<()> {
        let here = self.current;
        if here == self.goal {
            self.close(here);
            self.record(Vec::new(), StepExtra::HillClimbing { stuck: false })?;
            self.finish(Outcome::Succeeded);
            return Ok(());
        }

        let (g_here, h_here) = self
            .nodes
            .get(&here)
            .map(|n| (n.g, n.h))
            .unwrap_or((0.0, self.heuristic.estimate(here, self.goal)));

        let mut candidates = BestNeighbor::new(h_here);
        for next in self.space.neighbors(here, &self.directions)? {
            if self.closed.contains(&next) {
                continue;
            }
            let g = g_here + self.space.cost(here, next)?;
            let h = self.heuristic.estimate(next, self.goal);
            let seq = self.next_seq();
            candidates.insert(FrontierEntry { position: next, g, h, seq });
        }
        let open = candidates.positions();
        self.close(here);

        match candidates.extract_next() {
            Some(best) => {
                trace!("Climbing {} -> {} (h {:.2} -> {:.2})", here, best.position, h_here, best.h);
                self.nodes.insert(
                    best.position,
                    NodeState {
                        g: best.g,
                        h: best.h,
                        parent: Some(here),
                        status: NodeStatus::Open,
                    },
                );
                self.current = best.position;
                self.record(open, StepExtra::HillClimbing { stuck: false })?;
                if self.current == self.goal {
                    self.finish(Outcome::Succeeded);
                }
            }
            None => {
                self.record(Vec::new(), StepExtra::HillClimbing { stuck: true })?;
                self.finish(Outcome::Stuck);
            }
        }
        Ok(())
    }

    /// One proposal of simulated annealing; cost is the heuristic value
    fn anneal(&mut self) -> Result<()> {
        let here = self.current;
        let temperature = self.temperature;
        let current_cost = self.heuristic.estimate(here, self.goal);
        let frozen_extra = StepExtra::Annealing {
            temperature,
            current_cost,
            neighbor: None,
            neighbor_cost: None,
            acceptance_probability: 0.0,
            accepted: false,
        };

        if here == self.goal {
            self.record(Vec::new(), frozen_extra)?;
            self.finish(Outcome::Succeeded);
            return Ok(());
        }

        let candidates = self.space.neighbors(here, &self.directions)?;
        if candidates.is_empty() || temperature < self.config.annealing.min_temperature {
            self.record(Vec::new(), frozen_extra)?;
            self.finish(Outcome::Stuck);
            return Ok(());
        }

        let cooled = self.config.annealing.cooling.next(temperature);
        if !(cooled < temperature) {
            return Err(SearchError::InvalidSchedule(format!(
                "cooling from {} gave {}, the temperature must fall every step",
                temperature, cooled
            )));
        }

        let neighbor = candidates[self.rng.gen_range(0..candidates.len())];
        let neighbor_cost = self.heuristic.estimate(neighbor, self.goal);
        let decision = annealing::decide(neighbor_cost - current_cost, temperature, &mut *self.rng);
        trace!(
            "T={:.3} {} -> {} delta={:.2} p={:.3} accepted={}",
            temperature,
            here,
            neighbor,
            neighbor_cost - current_cost,
            decision.probability,
            decision.accepted
        );

        if decision.accepted {
            if !self.closed.contains(&here) {
                self.closed.push(here);
            }
            match self.walk.iter().position(|&p| p == neighbor) {
                Some(i) => self.walk.truncate(i + 1),
                None => self.walk.push(neighbor),
            }
            self.current = neighbor;
        }
        self.temperature = cooled;

        let succeeded = self.current == self.goal;
        let frozen = !succeeded && self.temperature < self.config.annealing.min_temperature;
        let open = if frozen {
            Vec::new()
        } else {
            self.space.neighbors(self.current, &self.directions)?
        };
        self.record(
            open,
            StepExtra::Annealing {
                temperature,
                current_cost,
                neighbor: Some(neighbor),
                neighbor_cost: Some(neighbor_cost),
                acceptance_probability: decision.probability,
                accepted: decision.accepted,
            },
        )?;

        if succeeded {
            self.finish(Outcome::Succeeded);
        } else if frozen {
            self.finish(Outcome::Stuck);
        }
        Ok(())
    }

    fn open_positions(&self) -> Vec<Position> {
        self.frontier.as_ref().map(|f| f.positions()).unwrap_or_default()
    }

    /// Path from current back to start
    fn current_path(&self) -> Vec<Position> {
        if self.strategy == StrategyKind::SimulatedAnnealing {
            return self.walk.iter().rev().copied().collect();
        }
        let mut path = vec![self.current];
        let mut at = self.current;
        while let Some(parent) = self.nodes.get(&at).and_then(|n| n.parent) {
            if path.len() > self.nodes.len() {
                break;
            }
            path.push(parent);
            at = parent;
        }
        path
    }

    fn record(&mut self, open_set: Vec<Position>, extra: StepExtra) -> Result<()> {
        let path = self.current_path();
        let path_cost = self.space.path_cost(&path)?;
        let step = Step {
            index: self.trace.step_count(),
            open_set,
            closed_set: self.closed.clone(),
            current: self.current,
            path,
            path_cost,
            extra,
        };
        self.trace.push(step);
        Ok(())
    }
}
