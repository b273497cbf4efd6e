use crate::error::GridError;
use crate::grid::{Direction, Grid, Position};

/// Anything the expand loop can walk: a grid of cells or an explicit graph.
///
/// Nodes are identified by [`Position`]; for a graph that is the node's
/// layout coordinate. Costs must be symmetric.
pub trait SearchSpace {
    /// Fails when `pos` is not a walkable node
    fn check(&self, pos: Position) -> Result<(), GridError>;

    /// Walkable neighbors of `pos`. Grids follow `order`; graphs ignore it
    /// and return edges in insertion order.
    fn neighbors(&self, pos: Position, order: &[Direction]) -> Result<Vec<Position>, GridError>;

    /// Cost of the move between two neighboring nodes
    fn cost(&self, a: Position, b: Position) -> Result<f64, GridError>;

    /// Short description for log lines
    fn describe(&self) -> String;

    /// Total cost of walking `path` in order
    fn path_cost(&self, path: &[Position]) -> Result<f64, GridError> {
        let mut total = 0.0;
        for pair in path.windows(2) {
            total += self.cost(pair[0], pair[1])?;
        }
        Ok(total)
    }
}

impl SearchSpace for Grid {
    fn check(&self, pos: Position) -> Result<(), GridError> {
        Grid::validate(self, pos).map(|_| ())
    }

    fn neighbors(&self, pos: Position, order: &[Direction]) -> Result<Vec<Position>, GridError> {
        Grid::neighbors(self, pos, order)
    }

    fn cost(&self, a: Position, b: Position) -> Result<f64, GridError> {
        Grid::cost(self, a, b)
    }

    fn describe(&self) -> String {
        format!("{}x{} grid", self.cols(), self.rows())
    }

    fn path_cost(&self, path: &[Position]) -> Result<f64, GridError> {
        Grid::path_cost(self, path)
    }
}
