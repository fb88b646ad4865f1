use rand::prelude::*;

use super::*;

/// Attempts with a fresh start cell before giving up on randomness.
pub const MAX_ATTEMPTS: u32 = 20;

/// Cells visited per attempt before it counts as failed.
pub const MAX_EXPANSIONS: u32 = 50_000;

/// The start cell is picked among the first rows so the path unfolds downwards.
const START_ROWS: Coord = 3;

/// Randomized depth-first search with backtracking, falls back to [`zigzag_path`] when every
/// attempt fails.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomPathGenerator {
    seed: u64,
    max_attempts: u32,
    max_expansions: u32,
}

impl RandomPathGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_attempts: MAX_ATTEMPTS,
            max_expansions: MAX_EXPANSIONS,
        }
    }

    pub fn with_max_attempts(self, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..self
        }
    }

    pub fn with_max_expansions(self, max_expansions: u32) -> Self {
        Self {
            max_expansions,
            ..self
        }
    }
}

impl PathGenerator for RandomPathGenerator {
    fn generate(self, requested: GridTopology, length: Label) -> Board {
        let topology = requested.playable();
        if topology != requested {
            log::warn!(
                "Grid {}x{} cannot hold a path, using {}x{}",
                requested.rows,
                requested.cols,
                topology.rows,
                topology.cols
            );
        }
        let wanted = usize::from(length) + 1;

        if wanted > usize::from(topology.total_cells()) {
            log::warn!(
                "Path of {} cells does not fit a {}x{} grid, using zigzag",
                wanted,
                topology.rows,
                topology.cols
            );
            return fallback(topology, length);
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for attempt in 1..=self.max_attempts {
            let start = Cell::new(
                rng.random_range(0..topology.rows.min(START_ROWS)),
                rng.random_range(0..topology.cols),
            );

            let mut search = Search::new(topology, wanted, self.max_expansions);
            if search.visit(start, &mut rng) {
                log::debug!(
                    "Path found from {:?} on attempt {}, {} expansions left",
                    start,
                    attempt,
                    search.budget
                );
                return Board::from_path_unchecked(topology, search.path, false);
            }
            log::debug!("Attempt {} from {:?} found no path", attempt, start);
        }

        log::warn!(
            "Failed to generate path after {} attempts, using zigzag",
            self.max_attempts
        );
        fallback(topology, length)
    }
}

fn fallback(topology: GridTopology, length: Label) -> Board {
    Board::from_path_unchecked(topology, zigzag_path(topology, length), true)
}

/// Uniform Fisher-Yates permutation.
fn shuffle(directions: &mut [Direction; 4], rng: &mut SmallRng) {
    for i in (1..directions.len()).rev() {
        let j = rng.random_range(0..=i);
        directions.swap(i, j);
    }
}

/// State of a single attempt, discarded when the attempt fails.
struct Search {
    topology: GridTopology,
    visited: Array2<bool>,
    path: Vec<Cell>,
    wanted: usize,
    budget: u32,
}

impl Search {
    fn new(topology: GridTopology, wanted: usize, budget: u32) -> Self {
        Self {
            topology,
            visited: Array2::default(topology.dim()),
            path: Vec::with_capacity(wanted),
            wanted,
            budget,
        }
    }

    fn visit(&mut self, cell: Cell, rng: &mut SmallRng) -> bool {
        if self.budget == 0 {
            return false;
        }
        self.budget -= 1;

        self.visited[cell.to_nd_index()] = true;
        self.path.push(cell);

        if self.path.len() == self.wanted {
            return true;
        }

        let mut directions = Direction::ALL;
        shuffle(&mut directions, rng);
        for direction in directions {
            let Some(next) = self.topology.step(cell, direction) else {
                continue;
            };
            if !self.visited[next.to_nd_index()] && self.visit(next, rng) {
                return true;
            }
        }

        log::trace!("Backtracking from {:?} at depth {}", cell, self.path.len());
        self.visited[cell.to_nd_index()] = false;
        self.path.pop();
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_grid() -> GridTopology {
        GameConfig::DEFAULT.topology
    }

    #[test]
    fn generated_boards_hold_every_label_once() {
        for seed in 0..10 {
            let board = RandomPathGenerator::new(seed).generate(default_grid(), TOTAL_NUMBERS);

            assert_eq!(board.goal(), TOTAL_NUMBERS);
            assert_path_invariants(&board);
        }
    }

    #[test]
    fn start_cell_is_near_the_top() {
        for seed in 0..10 {
            let board = RandomPathGenerator::new(seed).generate(default_grid(), TOTAL_NUMBERS);
            if !board.is_fallback() {
                assert!(board.start().row < 3, "seed {seed} started at {:?}", board.start());
            }
        }
    }

    #[test]
    fn same_seed_gives_same_board() {
        let a = RandomPathGenerator::new(42).generate(default_grid(), TOTAL_NUMBERS);
        let b = RandomPathGenerator::new(42).generate(default_grid(), TOTAL_NUMBERS);

        assert_eq!(a, b);
    }

    #[test]
    fn short_paths_on_small_grids_are_random() {
        let grid = GridTopology::new(4, 4).unwrap();

        let board = RandomPathGenerator::new(7).generate(grid, 6);

        assert!(!board.is_fallback());
        assert_eq!(board.goal(), 6);
        assert_path_invariants(&board);
    }

    #[test]
    fn no_attempts_forces_zigzag() {
        let board = RandomPathGenerator::new(1)
            .with_max_attempts(0)
            .generate(default_grid(), TOTAL_NUMBERS);

        assert!(board.is_fallback());
        assert_eq!(board.goal(), TOTAL_NUMBERS);
        assert_eq!(board.path(), zigzag_path(default_grid(), TOTAL_NUMBERS).as_slice());
        assert_path_invariants(&board);
    }

    #[test]
    fn exhausted_budget_forces_zigzag() {
        let board = RandomPathGenerator::new(1)
            .with_max_expansions(3)
            .generate(default_grid(), TOTAL_NUMBERS);

        assert!(board.is_fallback());
        assert_path_invariants(&board);
    }

    #[test]
    fn oversized_path_is_cut_to_grid() {
        let grid = GridTopology::new(2, 3).unwrap();

        let board = RandomPathGenerator::new(3).generate(grid, 10);

        assert!(board.is_fallback());
        assert_eq!(board.goal(), 5);
        assert_path_invariants(&board);
    }

    #[test]
    fn empty_grid_still_yields_a_board() {
        for (rows, cols) in [(0, 0), (0, 4), (5, 0)] {
            let board = RandomPathGenerator::new(3)
                .generate(GridTopology::new_unchecked(rows, cols), TOTAL_NUMBERS);

            assert!(board.topology().total_cells() >= 2);
            assert!(board.goal() >= 1);
            assert_path_invariants(&board);
        }
    }

    #[test]
    fn shuffle_keeps_every_direction() {
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..50 {
            let mut directions = Direction::ALL;
            shuffle(&mut directions, &mut rng);
            for direction in Direction::ALL {
                assert!(directions.contains(&direction));
            }
        }
    }
}
