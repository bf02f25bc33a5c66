use log::info;
use npuzzle_solver::{Board, Solver, SolverError, SolverState};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::{HashSet, VecDeque};

fn board(rows: &[&[u32]]) -> Board {
    Board::new(rows.iter().map(|row| row.to_vec()).collect())
}

/// Breadth-first distance to the goal, keyed on raw tiles.
fn bfs_distance(start: &Board) -> Option<usize> {
    let mut seen: HashSet<Vec<Vec<u32>>> = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start.tiles().to_vec());
    queue.push_back((start.clone(), 0));

    while let Some((current, distance)) = queue.pop_front() {
        if current.is_goal() {
            return Some(distance);
        }
        for neighbor in current.neighbors() {
            if seen.insert(neighbor.tiles().to_vec()) {
                queue.push_back((Board::new(neighbor.tiles().to_vec()), distance + 1));
            }
        }
    }
    None
}

fn assert_valid_solution(initial: &Board, solver: &Solver) {
    let solution = solver.solution().unwrap();
    assert_eq!(solver.moves(), Some(solution.len() - 1));
    assert_eq!(&*solution[0], initial);
    assert!(solution[solution.len() - 1].is_goal());
    for pair in solution.windows(2) {
        assert!(pair[0].move_to(&pair[1]).is_some());
    }
}

#[test_log::test]
fn one_slide_from_goal() {
    let initial = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]);
    let solver = Solver::new(initial.clone()).unwrap();
    assert!(solver.is_solvable());
    assert_eq!(solver.moves(), Some(1));
    assert_valid_solution(&initial, &solver);
}

#[test_log::test]
fn swapped_last_tiles_are_unsolvable() {
    let initial = board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]]);
    let solver = Solver::with_rng(initial, &mut StdRng::seed_from_u64(1)).unwrap();
    assert!(!solver.is_solvable());
    assert_eq!(solver.state(), SolverState::Unsolvable);
    assert_eq!(solver.moves(), None);
    assert_eq!(solver.solution().unwrap_err(), SolverError::Unsolvable);
}

#[test_log::test]
fn goal_board_needs_no_moves() {
    let initial = Board::goal(3);
    let solver = Solver::new(initial.clone()).unwrap();
    assert_eq!(solver.moves(), Some(0));
    let solution = solver.solution().unwrap();
    assert_eq!(solution.len(), 1);
    assert_eq!(&*solution[0], &initial);
}

#[test_log::test]
fn solution_starts_from_the_given_board() {
    let initial = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
    let solver = Solver::new(initial.clone()).unwrap();
    assert_eq!(solver.moves(), Some(4));
    assert_valid_solution(&initial, &solver);
}

#[test_log::test]
fn matches_breadth_first_distance() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..8 {
        let steps = rng.gen_range(5..20);
        let initial = Board::scramble(3, steps, &mut rng);
        let expected = bfs_distance(&initial);
        let solver = Solver::with_rng(initial.clone(), &mut rng).unwrap();
        info!("{} scramble steps, {:?} moves", steps, solver.moves());
        assert_eq!(solver.moves(), expected);
        assert_valid_solution(&initial, &solver);
    }
}

#[test_log::test]
fn solves_four_by_four_scrambles() {
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..3 {
        let initial = Board::scramble(4, 14, &mut rng);
        let solver = Solver::with_rng(initial.clone(), &mut rng).unwrap();
        assert!(solver.moves().is_some_and(|moves| moves <= 14));
        assert_valid_solution(&initial, &solver);
    }
}

#[test_log::test]
fn classification_agrees_with_parity() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..6 {
        let solvable = Board::scramble(3, 12, &mut rng);
        // A twin of a solvable board is an unsolvable one.
        let unsolvable = Board::new(solvable.twin_with(&mut rng).tiles().to_vec());
        assert!(!unsolvable.has_solvable_parity());

        let solver = Solver::with_rng(unsolvable, &mut rng).unwrap();
        assert!(!solver.is_solvable());

        let solver = Solver::with_rng(solvable, &mut rng).unwrap();
        assert!(solver.is_solvable());
    }
}

#[test_log::test]
fn unsolvable_two_by_two() {
    let initial = board(&[&[2, 1], &[3, 0]]);
    let solver = Solver::with_rng(initial, &mut StdRng::seed_from_u64(4)).unwrap();
    assert!(!solver.is_solvable());
    assert!(solver.solution().is_err());
}

#[test_log::test]
fn parsed_board_solves() {
    let initial: Board = "3\n 1  4  3\n 2  6  5\n 7  8  0\n".parse().unwrap();
    let expected = bfs_distance(&initial);
    let solver = Solver::new(initial.clone()).unwrap();
    assert!(solver.is_solvable());
    assert_eq!(solver.moves(), expected);
    assert_valid_solution(&initial, &solver);
}
