use crate::board::Board;
use crate::cache::DuplicateCache;
use crate::node::{Frontier, NodeArena, NodeId};
use log::{debug, info, trace, warn};
use rand::{thread_rng, Rng};
use std::rc::Rc;
use std::time::Instant;
use thiserror::Error;

pub const DEFAULT_CACHE_CAPACITY: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("Initial board has no cells")]
    EmptyBoard,
    #[error("No solution for unsolvable board")]
    Unsolvable,
    #[error("Search exceeded the limit of {limit} expansions")]
    ExpansionLimitExceeded { limit: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Running,
    Solved,
    Unsolvable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    cache_capacity: usize,
    max_expansions: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_expansions: None,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boards each side remembers for duplicate pruning.
    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    /// Give up once both sides together have taken `limit` expansion steps.
    pub fn with_max_expansions(mut self, limit: u64) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    pub fn max_expansions(&self) -> Option<u64> {
        self.max_expansions
    }
}

enum Step {
    Goal(NodeId),
    Continue,
    Exhausted,
}

/// One best-first search: its nodes, its frontier and its duplicate cache.
struct SearchSide {
    label: &'static str,
    arena: NodeArena,
    frontier: Frontier,
    cache: DuplicateCache<Rc<Board>>,
    expanded: u64,
}

impl SearchSide {
    fn new(label: &'static str, board: Board, cache_capacity: usize) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.root(Rc::new(board));
        let mut frontier = Frontier::new();
        frontier.insert(root, arena.get(root).priority());

        Self {
            label,
            arena,
            frontier,
            cache: DuplicateCache::new(cache_capacity),
            expanded: 0,
        }
    }

    fn step(&mut self) -> Step {
        let Some(id) = self.frontier.pop_min() else {
            return Step::Exhausted;
        };
        self.expanded += 1;

        let node = self.arena.get(id);
        let board = Rc::clone(node.board());
        let path_length = node.path_length();

        if self.cache.contains(&board) {
            trace!("{}: skipping duplicate at depth {}", self.label, path_length);
            return Step::Continue;
        }
        self.cache.push(Rc::clone(&board));

        if board.is_goal() {
            return Step::Goal(id);
        }

        trace!(
            "{}: expanding depth {} with manhattan {}",
            self.label,
            path_length,
            board.manhattan()
        );
        for neighbor in board.neighbors() {
            if self.cache.contains(neighbor) {
                continue;
            }
            let child = self.arena.child(id, Rc::clone(neighbor));
            self.frontier.insert(child, self.arena.get(child).priority());
        }

        Step::Continue
    }
}

/// Finds a shortest sequence of slides to the goal, or decides there is none.
///
/// The board is searched side by side with its twin, one expansion each per
/// round. Exactly one of the two is solvable, so whichever reaches the goal
/// first settles the question.
#[derive(Debug)]
pub struct Solver {
    state: SolverState,
    solution: Vec<Rc<Board>>,
    expanded: u64,
}

impl Solver {
    /// Solves `initial`, drawing its twin from the thread-local generator.
    ///
    /// # Errors
    ///
    /// `SolverError::EmptyBoard` if `initial` has no cells.
    pub fn new(initial: Board) -> Result<Self, SolverError> {
        Self::with_rng(initial, &mut thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(initial: Board, rng: &mut R) -> Result<Self, SolverError> {
        Self::with_config(initial, SolverConfig::default(), rng)
    }

    /// # Errors
    ///
    /// `SolverError::EmptyBoard` if `initial` has no cells, and
    /// `SolverError::ExpansionLimitExceeded` if the config sets a limit that
    /// the search runs into.
    pub fn with_config<R: Rng + ?Sized>(
        initial: Board,
        config: SolverConfig,
        rng: &mut R,
    ) -> Result<Self, SolverError> {
        if initial.dimension() == 0 {
            return Err(SolverError::EmptyBoard);
        }

        let size = initial.dimension();
        info!(
            "Searching for a solution of a {}x{} board with manhattan distance {}",
            size,
            size,
            initial.manhattan()
        );
        let start = Instant::now();

        let twin = initial.twin_with(rng).clone();
        let mut primary = SearchSide::new("primary", initial, config.cache_capacity);
        let mut twin = SearchSide::new("twin", twin, config.cache_capacity);

        let mut state = SolverState::Running;
        let mut solution = Vec::new();
        while state == SolverState::Running {
            if let Some(limit) = config.max_expansions {
                if primary.expanded + twin.expanded >= limit {
                    warn!("Giving up after {} expansions", limit);
                    return Err(SolverError::ExpansionLimitExceeded { limit });
                }
            }

            let primary_step = primary.step();
            let twin_step = twin.step();
            state = match (primary_step, twin_step) {
                (Step::Goal(id), _) => {
                    solution = primary.arena.path_to(id);
                    SolverState::Solved
                }
                (_, Step::Goal(_)) => SolverState::Unsolvable,
                (Step::Exhausted, Step::Exhausted) => {
                    warn!("Both frontiers ran dry; treating the board as unsolvable");
                    SolverState::Unsolvable
                }
                _ => SolverState::Running,
            };
        }

        let expanded = primary.expanded + twin.expanded;
        debug!(
            "primary expanded {} of {} nodes, twin expanded {} of {} nodes",
            primary.expanded,
            primary.arena.len(),
            twin.expanded,
            twin.arena.len()
        );
        match state {
            SolverState::Solved => info!(
                "Solved in {} moves after {} expansions in {:.3}s",
                solution.len() - 1,
                expanded,
                start.elapsed().as_secs_f64()
            ),
            _ => info!(
                "Board is unsolvable, decided after {} expansions in {:.3}s",
                expanded,
                start.elapsed().as_secs_f64()
            ),
        }

        Ok(Self {
            state,
            solution,
            expanded,
        })
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn is_solvable(&self) -> bool {
        self.state == SolverState::Solved
    }

    /// Length of the shortest solution.
    ///
    /// `None` is the unsolvable sentinel: it is returned exactly when
    /// [`Solver::is_solvable`] is false.
    pub fn moves(&self) -> Option<usize> {
        if self.is_solvable() {
            Some(self.solution.len() - 1)
        } else {
            None
        }
    }

    /// Boards from the initial one to the goal, both inclusive.
    ///
    /// # Errors
    ///
    /// `SolverError::Unsolvable` if the board cannot be solved.
    pub fn solution(&self) -> Result<&[Rc<Board>], SolverError> {
        if !self.is_solvable() {
            return Err(SolverError::Unsolvable);
        }
        Ok(&self.solution)
    }

    /// Expansion steps taken by both searches together.
    pub fn expanded(&self) -> u64 {
        self.expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn config_defaults_and_builders() {
        let config = SolverConfig::default();
        assert_eq!(config.cache_capacity(), DEFAULT_CACHE_CAPACITY);
        assert_eq!(config.max_expansions(), None);

        let config = SolverConfig::new()
            .with_cache_capacity(8)
            .with_max_expansions(1000);
        assert_eq!(config.cache_capacity(), 8);
        assert_eq!(config.max_expansions(), Some(1000));
    }

    #[test]
    fn empty_board_is_rejected() {
        assert_eq!(
            Solver::new(Board::new(Vec::new())).unwrap_err(),
            SolverError::EmptyBoard
        );
    }

    #[test]
    fn single_cell_board_is_already_solved() {
        let solver = Solver::new(Board::goal(1)).unwrap();
        assert_eq!(solver.state(), SolverState::Solved);
        assert_eq!(solver.moves(), Some(0));
        assert_eq!(solver.expanded(), 2);
    }

    #[test]
    fn expansion_limit_stops_long_searches() {
        let board = Board::new(vec![vec![8, 6, 7], vec![2, 5, 4], vec![3, 0, 1]]);
        let config = SolverConfig::new().with_max_expansions(10);
        let err = Solver::with_config(board, config, &mut StdRng::seed_from_u64(3)).unwrap_err();
        assert_eq!(err, SolverError::ExpansionLimitExceeded { limit: 10 });
    }

    #[test]
    fn tiny_cache_still_finds_a_shortest_path() {
        let mut rng = StdRng::seed_from_u64(11);
        let board = Board::scramble(3, 12, &mut rng);
        let expected = Solver::with_rng(board.clone(), &mut rng).unwrap().moves();

        let config = SolverConfig::new().with_cache_capacity(4);
        let solver = Solver::with_config(board, config, &mut rng).unwrap();
        assert_eq!(solver.moves(), expected);
    }

    #[test]
    fn unsolvable_board_has_no_solution() {
        let board = Board::new(vec![vec![2, 1], vec![3, 0]]);
        let solver = Solver::with_rng(board, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(solver.state(), SolverState::Unsolvable);
        assert!(!solver.is_solvable());
        assert_eq!(solver.moves(), None);
        assert_eq!(solver.solution().unwrap_err(), SolverError::Unsolvable);
    }
}
