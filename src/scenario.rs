//! Named demo grids with start, goal and a recommended configuration.
//!
//! Layouts use the text format of [`Grid::parse_layout`].

use crate::annealing::CoolingSchedule;
use crate::config::{AnnealingConfig, RunConfig};
use crate::engine::{create_run, SearchRun, StrategyKind};
use crate::error::{Result, SearchError};
use crate::grid::{Direction, Grid, Position};
use crate::trace::Trace;

// Walls at x=2 (y 1-5) and x=5 (y 2-6), bridged by (3,3) and (4,3)
const SEARCH_DEMO: &str = "
    ........
    .S#.....
    ..#..#..
    ..####..
    ..#..#..
    ..#..#..
    .....#G.
    ........
";

// Demo grid with (2,1) opened and a pocket around (6,0)
const GREEDY_DEAD_END: &str = "
    .....#.#
    .S.....#
    ..#..##.
    ..####..
    ..#..#..
    ..#..#..
    .....#G.
    ........
";

// Walls at x=3 (y 2-5), x=5 (y 1-4), (2,4), and the trap cell (4,3)
const HILL_TRAP: &str = "
    ........
    .S...#..
    ...#.#..
    ...###..
    ..##.#..
    ...#....
    ......G.
    ........
";

const HILL: &str = "
    ........
    .S...#..
    ...#.#..
    ...#.#..
    ..##.#..
    ...#....
    ......G.
    ........
";

const OPEN_FIELD: &str = "
    S.......
    ........
    ........
    ........
    ........
    ........
    ........
    .......G
";

const WEIGHTED_MARSH: &str = "
    ........
    ..9999..
    ..9999..
    S.9999.G
    ..9999..
    ..9999..
    ........
    ........
";

const SOUTH_FIRST: [Direction; 4] = [Direction::S, Direction::E, Direction::N, Direction::W];

pub const SCENARIO_NAMES: [&str; 8] = [
    "search_demo",
    "greedy_dead_end",
    "greedy_backtracking",
    "hill_climbing_stuck",
    "hill_climbing_success",
    "annealing",
    "open_field",
    "weighted_marsh",
];

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub grid: Grid,
    pub start: Position,
    pub goal: Position,
    /// Strategy the scenario was designed to show
    pub strategy: StrategyKind,
    pub config: RunConfig,
}

impl Scenario {
    /// Build a scenario from a layout containing both `S` and `G`
    pub fn from_layout(
        name: &str,
        description: &str,
        layout: &str,
        strategy: StrategyKind,
        config: RunConfig,
    ) -> Result<Self> {
        let (grid, start, goal) = Grid::parse_layout(layout)?;
        let start = start.ok_or_else(|| SearchError::Layout(format!("{}: no start 'S'", name)))?;
        let goal = goal.ok_or_else(|| SearchError::Layout(format!("{}: no goal 'G'", name)))?;
        Ok(Scenario {
            name: name.to_string(),
            description: description.to_string(),
            grid,
            start,
            goal,
            strategy,
            config,
        })
    }

    pub fn by_name(name: &str) -> Result<Self> {
        let defaults = RunConfig::default();
        match name {
            "search_demo" => Self::from_layout(
                name,
                "Two walls between (1,1) and (6,6); shared by BFS, DFS, Greedy and A*",
                SEARCH_DEMO,
                StrategyKind::AStar,
                defaults,
            ),
            "greedy_dead_end" => Self::from_layout(
                name,
                "Greedy without backtracking follows the straight line east into a pocket at (6,0)",
                GREEDY_DEAD_END,
                StrategyKind::GreedyBestFirst,
                defaults.with_backtracking(false),
            ),
            "greedy_backtracking" => Self::from_layout(
                name,
                "Same grid as greedy_dead_end; the global open set lets Greedy back out of the pocket",
                GREEDY_DEAD_END,
                StrategyKind::GreedyBestFirst,
                defaults,
            ),
            "hill_climbing_stuck" => Self::from_layout(
                name,
                "East-first tie-breaking climbs into the local optimum at (4,2)",
                HILL_TRAP,
                StrategyKind::HillClimbing,
                defaults,
            ),
            "hill_climbing_success" => Self::from_layout(
                name,
                "South-first tie-breaking on the same grid walks down column 1 and reaches the goal",
                HILL_TRAP,
                StrategyKind::HillClimbing,
                defaults.with_neighbor_order(&SOUTH_FIRST),
            ),
            "annealing" => Self::from_layout(
                name,
                "Hill grid explored by simulated annealing",
                HILL,
                StrategyKind::SimulatedAnnealing,
                defaults.with_seed(7).with_annealing(AnnealingConfig {
                    initial_temperature: 5.0,
                    min_temperature: 0.05,
                    cooling: CoolingSchedule::Geometric { alpha: 0.97 },
                }),
            ),
            "open_field" => Self::from_layout(
                name,
                "Empty 8x8 grid, corner to corner",
                OPEN_FIELD,
                StrategyKind::Bfs,
                defaults,
            ),
            "weighted_marsh" => Self::from_layout(
                name,
                "A marsh of cost-9 cells between start and goal; A* walks around it",
                WEIGHTED_MARSH,
                StrategyKind::AStar,
                defaults,
            ),
            other => Err(SearchError::UnknownScenario(other.to_string())),
        }
    }

    pub fn all() -> Result<Vec<Self>> {
        SCENARIO_NAMES.iter().map(|name| Self::by_name(name)).collect()
    }

    /// Run with the scenario's configuration
    pub fn create_run(&self, strategy: StrategyKind) -> Result<SearchRun<'_>> {
        self.create_run_with(strategy, self.config.clone())
    }

    pub fn create_run_with(&self, strategy: StrategyKind, config: RunConfig) -> Result<SearchRun<'_>> {
        create_run(&self.grid, self.start, self.goal, strategy, config)
    }

    /// Run the given strategy to completion
    pub fn run(&self, strategy: StrategyKind) -> Result<Trace> {
        let mut run = self.create_run(strategy)?;
        run.run()?;
        Ok(run.into_trace())
    }

    /// Run the strategy the scenario was built for
    pub fn run_default(&self) -> Result<Trace> {
        self.run(self.strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_parse() {
        let scenarios = Scenario::all().unwrap();
        assert_eq!(scenarios.len(), SCENARIO_NAMES.len());
        for s in &scenarios {
            assert_eq!(s.grid.rows(), 8, "{}", s.name);
            assert_eq!(s.grid.cols(), 8, "{}", s.name);
            assert!(s.grid.validate(s.start).is_ok());
            assert!(s.grid.validate(s.goal).is_ok());
        }
    }

    #[test]
    fn test_demo_grid_obstacles() {
        let s = Scenario::by_name("search_demo").unwrap();
        assert_eq!(s.start, Position::new(1, 1));
        assert_eq!(s.goal, Position::new(6, 6));
        for y in 1..=5 {
            assert!(s.grid.is_blocked(Position::new(2, y)));
        }
        for y in 2..=6 {
            assert!(s.grid.is_blocked(Position::new(5, y)));
        }
        assert!(s.grid.is_blocked(Position::new(3, 3)));
        assert!(s.grid.is_blocked(Position::new(4, 3)));
        assert_eq!(s.grid.cells().filter(|c| c.is_obstacle).count(), 12);
    }

    #[test]
    fn test_unknown_scenario() {
        assert!(matches!(
            Scenario::by_name("maze_of_doom"),
            Err(SearchError::UnknownScenario(_))
        ));
    }
}
