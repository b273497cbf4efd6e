mod common;

use common::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use search_trace::{search, Direction, Outcome, Position, RunConfig, StrategyKind};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bfs_finds_fewest_moves(rows in 2..9i32, cols in 2..9i32, density in 0.0..0.4f64, seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let grid = random_grid(&mut rng, rows, cols, density, 1);
        let (start, goal) = (Position::new(0, 0), Position::new(cols - 1, rows - 1));

        let trace = search(&grid, start, goal, StrategyKind::Bfs, RunConfig::default()).unwrap();
        match reference_edge_count(&grid, start, goal, &Direction::CARDINAL) {
            Some(moves) => {
                prop_assert_eq!(trace.outcome(), Some(Outcome::Succeeded));
                let solution = trace.solution().unwrap();
                prop_assert_eq!(solution.len() - 1, moves);
            }
            None => prop_assert_eq!(trace.outcome(), Some(Outcome::Exhausted)),
        }
    }

    #[test]
    fn astar_finds_cheapest_path(rows in 2..7i32, cols in 2..7i32, density in 0.0..0.3f64, seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let grid = random_grid(&mut rng, rows, cols, density, 5);
        let (start, goal) = (Position::new(0, 0), Position::new(cols - 1, rows - 1));

        let trace = search(&grid, start, goal, StrategyKind::AStar, RunConfig::default()).unwrap();
        match reference_cost(&grid, start, goal, &Direction::CARDINAL) {
            Some(cost) => {
                prop_assert_eq!(trace.outcome(), Some(Outcome::Succeeded));
                let found = trace.last().unwrap().path_cost;
                prop_assert!((found - cost).abs() < 1e-9, "A* {} vs Dijkstra {}", found, cost);
            }
            None => prop_assert_eq!(trace.outcome(), Some(Outcome::Exhausted)),
        }
    }

    #[test]
    fn astar_diagonal_finds_cheapest_path(rows in 2..7i32, cols in 2..7i32, density in 0.0..0.3f64, seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let grid = random_grid(&mut rng, rows, cols, density, 3);
        let (start, goal) = (Position::new(0, 0), Position::new(cols - 1, rows - 1));
        let config = RunConfig::default().with_diagonal(true);

        let trace = search(&grid, start, goal, StrategyKind::AStar, config).unwrap();
        if let Some(cost) = reference_cost(&grid, start, goal, &Direction::ALL) {
            let found = trace.last().unwrap().path_cost;
            prop_assert!((found - cost).abs() < 1e-9, "A* {} vs Dijkstra {}", found, cost);
        }
    }

    #[test]
    fn systematic_strategies_agree_on_reachability(rows in 2..8i32, cols in 2..8i32, density in 0.0..0.45f64, seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let grid = random_grid(&mut rng, rows, cols, density, 1);
        let (start, goal) = (Position::new(0, 0), Position::new(cols - 1, rows - 1));
        let reachable = reference_edge_count(&grid, start, goal, &Direction::CARDINAL).is_some();

        for strategy in [StrategyKind::Bfs, StrategyKind::Dfs, StrategyKind::GreedyBestFirst, StrategyKind::AStar] {
            let trace = search(&grid, start, goal, strategy, RunConfig::default()).unwrap();
            assert_trace_invariants(&grid, &trace);
            prop_assert_eq!(trace.outcome() == Some(Outcome::Succeeded), reachable);
        }
    }

    #[test]
    fn local_search_always_terminates(rows in 2..8i32, cols in 2..8i32, density in 0.0..0.3f64, seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let grid = random_grid(&mut rng, rows, cols, density, 1);
        let (start, goal) = (Position::new(0, 0), Position::new(cols - 1, rows - 1));
        let config = RunConfig::default().with_seed(seed);

        for strategy in [StrategyKind::HillClimbing, StrategyKind::SimulatedAnnealing] {
            let trace = search(&grid, start, goal, strategy, config.clone()).unwrap();
            assert_trace_invariants(&grid, &trace);
            prop_assert!(trace.outcome().is_some());
        }
    }
}
