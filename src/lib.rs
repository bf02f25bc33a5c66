//! Optimal solver for n×n sliding tile puzzles.
//!
//! ```
//! use npuzzle_solver::{Board, Solver};
//!
//! let board = Board::new(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 0, 8]]);
//! let solver = Solver::new(board).unwrap();
//! assert!(solver.is_solvable());
//! assert_eq!(solver.moves(), Some(1));
//! ```

pub mod board;
pub mod cache;
pub mod node;
pub mod solver;

pub use board::{Board, Move, ParseBoardError};
pub use cache::DuplicateCache;
pub use node::{Frontier, NodeArena, NodeId, SearchNode};
pub use solver::{Solver, SolverConfig, SolverError, SolverState, DEFAULT_CACHE_CAPACITY};
