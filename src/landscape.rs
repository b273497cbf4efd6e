//! Landscape classification for local search.
//!
//! Hill climbing minimizes the heuristic, so "uphill" here means towards a
//! lower estimate. Classification is a pure query over grid + heuristic +
//! goal; nothing is stored on the cells.

use crate::error::GridError;
use crate::grid::{Direction, Grid, Position};
use crate::heuristic::Heuristic;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandscapeFeature {
    /// Every orthogonal neighbor is worse
    LocalOptimum,
    /// No neighbor improves, but some are equally good
    Plateau,
    /// Only a diagonal cell improves, which a 4-connected climber cannot take
    Ridge,
    /// Flat neighbors next to an improving one
    Shoulder,
}

/// Classify a single walkable cell. The goal itself is never classified.
pub fn classify(
    grid: &Grid,
    pos: Position,
    goal: Position,
    heuristic: Heuristic,
) -> Result<Option<LandscapeFeature>, GridError> {
    grid.validate(pos)?;
    if pos == goal {
        return Ok(None);
    }

    let here = heuristic.estimate(pos, goal);
    let mut better = false;
    let mut equal = false;
    for next in grid.neighbors(pos, &Direction::CARDINAL)? {
        let h = heuristic.estimate(next, goal);
        if h < here {
            better = true;
        } else if h == here {
            equal = true;
        }
    }

    let feature = match (better, equal) {
        (true, true) => Some(LandscapeFeature::Shoulder),
        (true, false) => None,
        (false, _) if diagonal_improves(grid, pos, goal, heuristic, here) => Some(LandscapeFeature::Ridge),
        (false, true) => Some(LandscapeFeature::Plateau),
        (false, false) => Some(LandscapeFeature::LocalOptimum),
    };
    Ok(feature)
}

fn diagonal_improves(grid: &Grid, pos: Position, goal: Position, heuristic: Heuristic, here: f64) -> bool {
    Direction::ALL
        .iter()
        .filter(|d| d.is_diagonal())
        .map(|&d| pos.offset(d))
        .filter(|&p| !grid.is_blocked(p))
        .any(|p| heuristic.estimate(p, goal) < here)
}

/// Classify every walkable cell, in row-major order, skipping plain slopes
pub fn classify_all(grid: &Grid, goal: Position, heuristic: Heuristic) -> Vec<(Position, LandscapeFeature)> {
    grid.cells()
        .filter(|cell| !cell.is_obstacle)
        .filter_map(|cell| {
            classify(grid, cell.position, goal, heuristic)
                .ok()
                .flatten()
                .map(|feature| (cell.position, feature))
        })
        .collect()
}
