use crate::error::{GridError, Result, SearchError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position on the grid. `y` grows downward, so North is `y - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(&self, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Direction leading from `self` to an adjacent `other`, if any
    pub fn direction_to(&self, other: &Position) -> Option<Direction> {
        let delta = (other.x - self.x, other.y - self.y);
        Direction::ALL.into_iter().find(|d| d.delta() == delta)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Movement directions, in the default clockwise-from-north order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::N => (0, -1),
            Direction::NE => (1, -1),
            Direction::E => (1, 0),
            Direction::SE => (1, 1),
            Direction::S => (0, 1),
            Direction::SW => (-1, 1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, -1),
        }
    }

    pub fn is_diagonal(&self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }
}

/// A single grid cell. Cost is always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    pub is_obstacle: bool,
    pub cost: f64,
}

/// Grid of cells, row-major.
///
/// The grid is built once (constructors, `set_blocked`, `set_cost`,
/// `parse_layout`) and only read afterwards: runs borrow it immutably.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid with all cells free at cost 1
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.max(0);
        let cols = cols.max(0);
        let cells = (0..rows * cols)
            .map(|id| Cell {
                position: Position::new(id % cols, id / cols),
                is_obstacle: false,
                cost: 1.0,
            })
            .collect();
        Grid { rows, cols, cells }
    }

    /// Create a grid with the given obstacles. Out-of-range entries are ignored.
    pub fn with_blocked(rows: i32, cols: i32, blocked: &[Position]) -> Self {
        let mut grid = Self::new(rows, cols);
        for &pos in blocked {
            // ignoring is fine here, the grid is still being assembled
            let _ = grid.set_blocked(pos, true);
        }
        grid
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    /// Convert (x, y) coordinates to a cell index
    pub fn get_id(&self, pos: Position) -> usize {
        (pos.x + pos.y * self.cols) as usize
    }

    /// Convert a cell index back to a position
    pub fn get_coords(&self, id: usize) -> Position {
        let id = id as i32;
        Position::new(id % self.cols, id / self.cols)
    }

    pub fn cell(&self, pos: Position) -> std::result::Result<&Cell, GridError> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds {
                position: pos,
                width: self.cols,
                height: self.rows,
            });
        }
        Ok(&self.cells[self.get_id(pos)])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Out-of-bounds positions count as blocked
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.cell(pos).map(|c| c.is_obstacle).unwrap_or(true)
    }

    /// Check that `pos` is inside the grid and walkable
    pub fn validate(&self, pos: Position) -> std::result::Result<&Cell, GridError> {
        let cell = self.cell(pos)?;
        if cell.is_obstacle {
            return Err(GridError::Obstacle(pos));
        }
        Ok(cell)
    }

    pub fn set_blocked(&mut self, pos: Position, blocked: bool) -> std::result::Result<(), GridError> {
        self.cell(pos)?;
        let id = self.get_id(pos);
        self.cells[id].is_obstacle = blocked;
        Ok(())
    }

    /// Set the terrain cost of a cell. Costs below 1 are raised to 1.
    pub fn set_cost(&mut self, pos: Position, cost: f64) -> std::result::Result<(), GridError> {
        self.cell(pos)?;
        let id = self.get_id(pos);
        self.cells[id].cost = cost.max(1.0);
        Ok(())
    }

    /// Walkable neighbors of `pos`, in the order given.
    ///
    /// Diagonal moves need both orthogonal cells to be free (no corner cutting).
    pub fn neighbors(&self, pos: Position, order: &[Direction]) -> std::result::Result<Vec<Position>, GridError> {
        self.validate(pos)?;
        let mut result = Vec::with_capacity(order.len());
        for &dir in order {
            let next = pos.offset(dir);
            if self.is_blocked(next) {
                continue;
            }
            if dir.is_diagonal() {
                let (dx, dy) = dir.delta();
                if self.is_blocked(Position::new(pos.x + dx, pos.y))
                    || self.is_blocked(Position::new(pos.x, pos.y + dy))
                {
                    continue;
                }
            }
            result.push(next);
        }
        Ok(result)
    }

    /// Edge cost between adjacent cells: the mean of both terrain costs,
    /// scaled by sqrt(2) for diagonal moves.
    pub fn cost(&self, a: Position, b: Position) -> std::result::Result<f64, GridError> {
        let from = self.validate(a)?;
        let to = self.validate(b)?;
        let dir = a.direction_to(&b).ok_or(GridError::NotAdjacent(a, b))?;
        let blended = (from.cost + to.cost) / 2.0;
        if dir.is_diagonal() {
            Ok(blended * std::f64::consts::SQRT_2)
        } else {
            Ok(blended)
        }
    }

    /// Total cost of walking `path` in order
    pub fn path_cost(&self, path: &[Position]) -> std::result::Result<f64, GridError> {
        let mut total = 0.0;
        for pair in path.windows(2) {
            total += self.cost(pair[0], pair[1])?;
        }
        Ok(total)
    }

    /// Parse a text layout: `.` free, `#` obstacle, `1`-`9` weighted cell,
    /// `S` start, `G` goal. Returns the grid with the optional start/goal.
    pub fn parse_layout(text: &str) -> Result<(Grid, Option<Position>, Option<Position>)> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            return Err(SearchError::Layout("no grid rows found".to_string()));
        }

        let cols = lines[0].chars().count() as i32;
        let rows = lines.len() as i32;
        let mut grid = Grid::new(rows, cols);
        let mut start = None;
        let mut goal = None;

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != cols {
                return Err(SearchError::Layout(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    line.chars().count(),
                    cols
                )));
            }
            for (x, ch) in line.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                match ch {
                    '.' => {}
                    '#' => grid.set_blocked(pos, true)?,
                    'S' => start = Some(pos),
                    'G' => goal = Some(pos),
                    '1'..='9' => {
                        let cost = ch.to_digit(10).map(f64::from).unwrap_or(1.0);
                        grid.set_cost(pos, cost)?;
                    }
                    other => {
                        return Err(SearchError::Layout(format!(
                            "unexpected character '{}' at ({},{})",
                            other, x, y
                        )));
                    }
                }
            }
        }

        Ok((grid, start, goal))
    }

    /// Render the grid in the layout format, without start/goal markers
    pub fn render(&self) -> String {
        self.render_with_path(&[], None, None)
    }

    /// Render with `*` for path cells and `S`/`G` markers
    pub fn render_with_path(&self, path: &[Position], start: Option<Position>, goal: Option<Position>) -> String {
        let mut result = String::new();
        for y in 0..self.rows {
            for x in 0..self.cols {
                let pos = Position::new(x, y);
                let cell = &self.cells[self.get_id(pos)];
                let symbol = if Some(pos) == start {
                    'S'
                } else if Some(pos) == goal {
                    'G'
                } else if path.contains(&pos) {
                    '*'
                } else if cell.is_obstacle {
                    '#'
                } else if cell.cost > 1.0 {
                    char::from_digit(cell.cost.round().min(9.0) as u32, 10).unwrap_or('?')
                } else {
                    '.'
                };
                result.push(symbol);
            }
            result.push('\n');
        }
        result
    }
}

/// Format a path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
