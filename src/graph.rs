//! Explicit node/edge graphs.
//!
//! Each node sits at a layout [`Position`], which doubles as its identity in
//! traces, so a graph run produces the same [`crate::Step`] records as a
//! grid run. Labels map positions back to node names for display.

use crate::error::GridError;
use crate::grid::{Direction, Position};
use crate::space::SearchSpace;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: Position,
    pub cost: f64,
}

/// Undirected weighted graph stored as adjacency lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<Position, usize>,
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at its layout position. Adding an existing position relabels it.
    pub fn add_node(&mut self, label: &str, position: Position) -> Position {
        match self.index.get(&position) {
            Some(&id) => self.nodes[id].label = label.to_string(),
            None => {
                self.index.insert(position, self.nodes.len());
                self.nodes.push(Node {
                    label: label.to_string(),
                    position,
                });
                self.adjacency.push(Vec::new());
            }
        }
        position
    }

    /// Connect two nodes both ways. Neighbors come back in the order edges
    /// were added; re-adding an edge only updates its cost. Negative costs
    /// are raised to 0.
    pub fn add_edge(&mut self, a: Position, b: Position, cost: f64) -> Result<(), GridError> {
        let ia = self.node_id(a)?;
        let ib = self.node_id(b)?;
        if ia == ib {
            return Err(GridError::NotAdjacent(a, b));
        }
        let cost = cost.max(0.0);
        Self::link(&mut self.adjacency[ia], b, cost);
        Self::link(&mut self.adjacency[ib], a, cost);
        Ok(())
    }

    fn link(edges: &mut Vec<Edge>, to: Position, cost: f64) {
        match edges.iter_mut().find(|e| e.to == to) {
            Some(edge) => edge.cost = cost,
            None => edges.push(Edge { to, cost }),
        }
    }

    fn node_id(&self, pos: Position) -> Result<usize, GridError> {
        self.index.get(&pos).copied().ok_or(GridError::UnknownNode(pos))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn position_of(&self, label: &str) -> Option<Position> {
        self.nodes.iter().find(|n| n.label == label).map(|n| n.position)
    }

    pub fn label(&self, pos: Position) -> Option<&str> {
        self.index.get(&pos).map(|&id| self.nodes[id].label.as_str())
    }

    /// Labels for a run of positions; positions that are not nodes show as `?`
    pub fn labels(&self, positions: &[Position]) -> Vec<&str> {
        positions.iter().map(|&p| self.label(p).unwrap_or("?")).collect()
    }
}

impl SearchSpace for Graph {
    fn check(&self, pos: Position) -> Result<(), GridError> {
        self.node_id(pos).map(|_| ())
    }

    fn neighbors(&self, pos: Position, _order: &[Direction]) -> Result<Vec<Position>, GridError> {
        let id = self.node_id(pos)?;
        Ok(self.adjacency[id].iter().map(|e| e.to).collect())
    }

    fn cost(&self, a: Position, b: Position) -> Result<f64, GridError> {
        let id = self.node_id(a)?;
        self.node_id(b)?;
        self.adjacency[id]
            .iter()
            .find(|e| e.to == b)
            .map(|e| e.cost)
            .ok_or(GridError::NotAdjacent(a, b))
    }

    fn describe(&self) -> String {
        format!("graph with {} nodes", self.nodes.len())
    }
}

const TREE_NODES: [(&str, i32, i32); 7] = [
    ("A", 4, 1),
    ("B", 2, 3),
    ("C", 6, 3),
    ("D", 1, 5),
    ("E", 3, 5),
    ("F", 5, 5),
    ("G", 7, 5),
];

const TREE_EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (1, 3), (1, 4), (2, 5), (2, 6)];

/// Seven-node binary tree rooted at A, unit edge costs.
///
/// With `left_first` children are linked left to right (B before C);
/// otherwise right to left.
pub fn tree(left_first: bool) -> Graph {
    let mut graph = Graph::new();
    let positions: Vec<Position> = TREE_NODES
        .iter()
        .map(|&(label, x, y)| graph.add_node(label, Position::new(x, y)))
        .collect();

    let mut edges = TREE_EDGES.to_vec();
    if !left_first {
        for pair in edges.chunks_mut(2) {
            pair.reverse();
        }
    }
    for (a, b) in edges {
        // both ends were added above
        let _ = graph.add_edge(positions[a], positions[b], 1.0);
    }
    graph
}

/// Tree for the breadth-first demo: start A, goal G, so the queue runs
/// `B C`, `C D E`, `D E F G` before draining.
pub fn bfs_tree() -> (Graph, Position, Position) {
    (tree(true), Position::new(4, 1), Position::new(7, 5))
}

/// Tree for the depth-first demo: start A, goal F. Children are linked
/// right to left so the stack pops the left child first and nodes are
/// expanded A, B, D, E, C, F.
pub fn dfs_tree() -> (Graph, Position, Position) {
    (tree(false), Position::new(4, 1), Position::new(5, 5))
}
