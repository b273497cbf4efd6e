#![allow(dead_code)]

use rand::Rng;
use rand_chacha::ChaCha20Rng;
use search_trace::grid::format_path;
use search_trace::{Direction, Grid, Outcome, Position, StrategyKind, Trace};
use std::collections::{HashSet, VecDeque};
use std::sync::Once;

static INIT: Once = Once::new();

/// Install a test subscriber once; filter with RUST_LOG
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Mirror a layout left-right
pub fn flip_layout_horizontal(layout: &str) -> String {
    layout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().rev().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mirror a layout top-bottom
pub fn flip_layout_vertical(layout: &str) -> String {
    let mut lines: Vec<&str> = layout.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
    lines.reverse();
    lines.join("\n")
}

pub fn flip_position_horizontal(pos: Position, cols: i32) -> Position {
    Position::new(cols - 1 - pos.x, pos.y)
}

pub fn flip_position_vertical(pos: Position, rows: i32) -> Position {
    Position::new(pos.x, rows - 1 - pos.y)
}

/// Brute-force BFS: fewest moves from start to goal
pub fn reference_edge_count(grid: &Grid, start: Position, goal: Position, dirs: &[Direction]) -> Option<usize> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start);
    queue.push_back((start, 0));
    while let Some((pos, depth)) = queue.pop_front() {
        if pos == goal {
            return Some(depth);
        }
        for next in grid.neighbors(pos, dirs).unwrap() {
            if seen.insert(next) {
                queue.push_back((next, depth + 1));
            }
        }
    }
    None
}

/// Brute-force Dijkstra (quadratic scan, no heap): cheapest cost from start to goal
pub fn reference_cost(grid: &Grid, start: Position, goal: Position, dirs: &[Direction]) -> Option<f64> {
    let n = (grid.rows() * grid.cols()) as usize;
    let mut dist = vec![f64::INFINITY; n];
    let mut done = vec![false; n];
    dist[grid.get_id(start)] = 0.0;

    loop {
        let mut best: Option<usize> = None;
        for id in 0..n {
            if !done[id] && dist[id].is_finite() && best.map_or(true, |b| dist[id] < dist[b]) {
                best = Some(id);
            }
        }
        let id = best?;
        done[id] = true;
        let pos = grid.get_coords(id);
        if pos == goal {
            return Some(dist[id]);
        }
        for next in grid.neighbors(pos, dirs).unwrap() {
            let nid = grid.get_id(next);
            let d = dist[id] + grid.cost(pos, next).unwrap();
            if d < dist[nid] {
                dist[nid] = d;
            }
        }
    }
}

/// Random grid with the given obstacle density; corners (0,0) and the
/// opposite one are always free. `max_cost > 1` adds weighted cells.
pub fn random_grid(rng: &mut ChaCha20Rng, rows: i32, cols: i32, density: f64, max_cost: u32) -> Grid {
    let mut grid = Grid::new(rows, cols);
    for y in 0..rows {
        for x in 0..cols {
            let pos = Position::new(x, y);
            if rng.gen::<f64>() < density {
                grid.set_blocked(pos, true).unwrap();
            } else if max_cost > 1 {
                grid.set_cost(pos, rng.gen_range(1..=max_cost) as f64).unwrap();
            }
        }
    }
    grid.set_blocked(Position::new(0, 0), false).unwrap();
    grid.set_blocked(Position::new(cols - 1, rows - 1), false).unwrap();
    grid
}

/// Visualize a path on a grid
pub fn visualize_path(grid: &Grid, path: &[Position], start: Position, goal: Position) -> String {
    let mut result = String::new();
    result.push_str(&format!("\nPath: {}\n", format_path(path)));
    result.push_str(&format!(
        "Length: {} moves, Cost: {:.2}\n\n",
        path.len().saturating_sub(1),
        grid.path_cost(path).unwrap_or(f64::NAN)
    ));
    result.push_str(&grid.render_with_path(path, Some(start), Some(goal)));
    result
}

/// Consecutive positions are adjacent and walkable, first is start, last is goal
pub fn assert_valid_path(grid: &Grid, path: &[Position], start: Position, goal: Position) {
    assert_eq!(path.first(), Some(&start), "path must begin at start");
    assert_eq!(path.last(), Some(&goal), "path must end at goal");
    for p in path {
        assert!(grid.validate(*p).is_ok(), "{} is not walkable", p);
    }
    for pair in path.windows(2) {
        assert!(
            pair[0].direction_to(&pair[1]).is_some(),
            "{} and {} are not adjacent",
            pair[0],
            pair[1]
        );
    }
}

/// Structural checks that hold for every trace
pub fn assert_trace_invariants(grid: &Grid, trace: &Trace) {
    assert!(trace.step_count() >= 1);
    assert!(trace.is_finished());
    for (i, step) in trace.steps().iter().enumerate() {
        assert_eq!(step.index, i);
        assert_eq!(step.path.first(), Some(&step.current), "step {}", i);
        assert_eq!(step.path.last(), Some(&trace.start), "step {}", i);
        let unique: HashSet<_> = step.closed_set.iter().collect();
        assert_eq!(unique.len(), step.closed_set.len(), "duplicate in closed set at step {}", i);
        if trace.strategy != StrategyKind::SimulatedAnnealing {
            for p in &step.open_set {
                assert!(!step.closed_set.contains(p), "{} open and closed at step {}", p, i);
            }
        }
        let cost = grid.path_cost(&step.path).unwrap();
        assert!((cost - step.path_cost).abs() < 1e-9, "step {} path cost", i);
    }
    if let Some(solution) = trace.solution() {
        assert_valid_path(grid, &solution, trace.start, trace.goal);
    }
    if trace.outcome() != Some(Outcome::Succeeded) {
        assert!(trace.last().unwrap().open_set.is_empty());
    }
}
