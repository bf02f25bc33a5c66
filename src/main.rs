use crossterm::{
    queue,
    style::{Print, PrintStyledContent, Stylize},
};
use log::error;
use npuzzle_solver::{Board, ParseBoardError, Solver, SolverError};
use std::{
    env, fs,
    io::{self, Write},
    process::ExitCode,
};
use thiserror::Error;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Could not read board file: {0}")]
    Io(#[from] io::Error),
    #[error("Could not parse board file: {0}")]
    Parse(#[from] ParseBoardError),
    #[error(transparent)]
    Solver(#[from] SolverError),
}

fn sample_board() -> Board {
    Board::new(vec![vec![1, 4, 3], vec![2, 6, 5], vec![7, 8, 0]])
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), DemoError> {
    let board = match env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?.parse::<Board>()?,
        None => sample_board(),
    };

    let mut stdout = io::stdout();
    println!("Initial board:");
    draw(&mut stdout, &board)?;

    let solver = Solver::new(board)?;
    println!("Solvable: {}", solver.is_solvable());
    println!(
        "Minimum number of moves: {}",
        solver.moves().map_or(-1, |moves| moves as i64)
    );

    match solver.solution() {
        Ok(solution) => {
            println!();
            for pair in solution.windows(2) {
                match pair[0].move_to(&pair[1]) {
                    Some(dir) => println!("{}", dir),
                    None => println!("?"),
                }
                draw(&mut stdout, &pair[1])?;
                println!();
            }
        }
        Err(e) => println!("{}", e),
    }

    Ok(())
}

/// Tiles already in their goal cell are green, the rest yellow.
fn draw(out: &mut impl Write, board: &Board) -> io::Result<()> {
    let size = board.dimension();
    let width = (size * size).to_string().len() + 1;

    for (row, tiles) in board.tiles().iter().enumerate() {
        for (col, &tile) in tiles.iter().enumerate() {
            let cell = if tile == 0 {
                format!("{:>width$}", ".").dark_grey()
            } else if tile as usize == size * row + col + 1 {
                format!("{:>width$}", tile).green()
            } else {
                format!("{:>width$}", tile).yellow()
            };
            queue!(out, PrintStyledContent(cell))?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}
