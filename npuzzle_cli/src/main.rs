#![doc = include_str!("../README.md")]

use clap::{Parser, ValueEnum};
use cpu_time::ProcessTime;
use log::debug;
use npuzzle::board::Board;
use npuzzle::heuristic::{Heuristic, Manhattan, MisplacedTiles, TilesOut};
use npuzzle::snail::{canonical_goal, generate_solvable, is_solvable};
use npuzzle::solver::{Solver, Step};
use npuzzle::stats::SearchStats;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::{fs, io};

/// Solves sliding-tile puzzles toward the snail goal layout.
#[derive(Parser)]
#[command(name = "npuzzle")]
#[command(version, about, long_about = None)]
struct Args {
    /// Read the starting board from this file instead of standard input.
    #[arg(short, long, value_name = "FILE", conflicts_with = "random")]
    file: Option<PathBuf>,

    /// Generate a random solvable board with the given side length.
    #[arg(short, long, value_name = "SIZE")]
    random: Option<usize>,

    /// Scramble the generated board with this many blank moves, 0 meaning a
    /// random amount.
    #[arg(long, default_value_t = 0, requires = "random")]
    swaps: usize,

    /// Seed for the scramble generator; unseeded runs scramble differently
    /// every time.
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Heuristic guiding the search.
    #[arg(short = 'e', long, value_enum, default_value = "manhattan")]
    heuristic: HeuristicKind,

    /// Search from both ends at once and stitch the paths where they meet.
    #[arg(short, long)]
    bidirectional: bool,

    /// Do not print the boards along the solution path.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
enum HeuristicKind {
    /// Sum of tile distances to their goal cells.
    Manhattan,
    /// Count of tiles away from their goal cells.
    MisplacedTiles,
    /// Count of tiles outside their goal row plus tiles outside their goal
    /// column.
    TilesOut,
}

enum Report {
    Unidirectional(SearchStats),
    Bidirectional { forward: SearchStats, backward: SearchStats },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Unidirectional(stats) => writeln!(f, "{}", stats),
            Report::Bidirectional { forward, backward } => {
                writeln!(f, "forward: {}", forward)?;
                writeln!(f, "backward: {}", backward)
            }
        }
    }
}

fn obtain_board(args: &Args) -> Result<Board, Box<dyn Error>> {
    if let Some(size) = args.random {
        if size == 0 {
            return Err("the board size must be at least 1".into());
        }
        let mut rng = match args.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        return Ok(generate_solvable(size, args.swaps, &mut rng));
    }
    let text = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(Board::from_text(&text)?)
}

fn solve_unidirectional<H: Heuristic>(mut solver: Solver<H>) -> (Option<Vec<Board>>, Report) {
    let path = match solver.run() {
        Step::Solved => Some(solver.path()),
        _ => None,
    };
    (path, Report::Unidirectional(solver.stats()))
}

/// Steps the two solvers alternately, polling for touching paths after
/// every step. Either solver reaching its own goal also ends the run.
fn solve_bidirectional<H: Heuristic>(
    mut forward: Solver<H>,
    mut backward: Solver<H>,
) -> (Option<Vec<Board>>, Report) {
    let path = loop {
        match forward.step() {
            Step::Solved => break Some(forward.path()),
            Step::Exhausted => break None,
            Step::Running => {}
        }
        let stitched = Solver::stitch_paths(&forward, &backward);
        if !stitched.is_empty() {
            break Some(stitched);
        }
        match backward.step() {
            Step::Solved => {
                let mut path = backward.path();
                path.reverse();
                break Some(path);
            }
            Step::Exhausted => break None,
            Step::Running => {}
        }
        let stitched = Solver::stitch_paths(&forward, &backward);
        if !stitched.is_empty() {
            break Some(stitched);
        }
    };
    let report = Report::Bidirectional {
        forward: forward.stats(),
        backward: backward.stats(),
    };
    (path, report)
}

fn run<H: Heuristic>(
    bidirectional: bool,
    start: Board,
    goal: Board,
    make: impl Fn(&Board) -> H,
) -> (Option<Vec<Board>>, Report) {
    if bidirectional {
        let toward_goal = make(&goal);
        let toward_start = make(&start);
        let forward = Solver::new(start.clone(), goal.clone(), toward_goal);
        let backward = Solver::new(goal, start, toward_start);
        solve_bidirectional(forward, backward)
    } else {
        let toward_goal = make(&goal);
        solve_unidirectional(Solver::new(start, goal, toward_goal))
    }
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let args = Args::parse();

    let board = match obtain_board(&args) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    if !is_solvable(&board) {
        eprintln!("this puzzle cannot be solved");
        return ExitCode::FAILURE;
    }
    let goal = canonical_goal(board.size());
    debug!("searching from\n{}\ntoward\n{}", board, goal);

    let start_moment = ProcessTime::try_now().expect("Getting process time failed");
    let (path, report) = match args.heuristic {
        HeuristicKind::Manhattan => run(args.bidirectional, board, goal, Manhattan::new),
        HeuristicKind::MisplacedTiles => run(args.bidirectional, board, goal, MisplacedTiles::new),
        HeuristicKind::TilesOut => run(args.bidirectional, board, goal, TilesOut::new),
    };
    let elapsed = start_moment.try_elapsed().expect("Getting process time failed");

    let Some(path) = path else {
        eprintln!("this puzzle cannot be solved");
        return ExitCode::FAILURE;
    };
    if !args.quiet {
        for board in &path {
            println!("{}\n", board);
        }
    }
    println!("solved in {} moves", path.len() - 1);
    print!("{}", report);
    println!("{:.3} seconds of cpu time", elapsed.as_secs_f64());
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_run_unidirectional_two_move_instance() {
        let start = Board::from_tiles(3, vec![0, 1, 3,  8, 2, 4,  7, 6, 5]).unwrap();
        let goal = canonical_goal(3);
        let (path, report) = run(false, start.clone(), goal.clone(), Manhattan::new);
        let path = path.unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        let Report::Unidirectional(stats) = report else {
            panic!("a single solver reports alone");
        };
        assert_eq!(stats, SearchStats { total_states: 4, max_states: 5 });
    }

    #[test]
    fn test_run_bidirectional_meets_in_the_middle() {
        let start = Board::from_tiles(3, vec![0, 1, 3,  8, 2, 4,  7, 6, 5]).unwrap();
        let goal = canonical_goal(3);
        let (path, report) = run(true, start.clone(), goal.clone(), Manhattan::new);
        let path = path.unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert!(matches!(report, Report::Bidirectional { .. }));
    }
}
