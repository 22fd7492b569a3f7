//! Rubik's Cube Solver
//!
//! Scrambles a 3x3x3 cube and solves it, either layer by layer or with a
//! bounded A* search, printing the moves, per-move descriptions and the
//! sticker net of the cube.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, FromArgMatches, Parser, Subcommand};
use env_logger::TimestampPrecision;
use log::LevelFilter;

use cubesolve::layer::LayerConfig;
use cubesolve::moves::{compose, format_sequence, parse_sequence};
use cubesolve::search::{SearchConfig, DEFAULT_DEPTH_BOUND, DEFAULT_MAX_EXPANSIONS};
use cubesolve::{
    grid, scramble_with_seed, solve, Algorithm, Cube, CubeError, Move, Result, SolveOptions,
    SolveResult, DEFAULT_SCRAMBLE_LENGTH,
};

/// Scrambles and solves a 3x3x3 Rubik's Cube.
#[derive(Parser)]
#[command(name = "cubesolve")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a random scramble and show the scrambled cube.
    Scramble(ScrambleArgs),
    /// Solve a scramble and print the solution with its metrics.
    Solve(SolveArgs),
    /// Apply a move sequence to the solved cube and show the result.
    Show {
        /// Moves in standard notation, e.g. "R U R' U'".
        #[arg(long)]
        moves: String,
    },
}

#[derive(Args, Clone)]
struct ScrambleArgs {
    /// Number of random moves.
    #[arg(long, default_value_t = DEFAULT_SCRAMBLE_LENGTH)]
    length: usize,
    /// Seed for a reproducible scramble.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Clone)]
struct SolveArgs {
    /// Solve this sequence instead of a random scramble.
    #[arg(long)]
    moves: Option<String>,
    #[command(flatten)]
    scramble: ScrambleArgs,
    /// "layer-by-layer" or "search".
    #[arg(long, default_value = "layer-by-layer")]
    algorithm: Algorithm,
    /// Longest solution the search considers.
    #[arg(long, default_value_t = DEFAULT_DEPTH_BOUND)]
    depth_bound: u8,
    /// Search expansions before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_EXPANSIONS)]
    max_expansions: usize,
    /// Wall-clock limit for the whole solve, in milliseconds.
    #[arg(long)]
    time_limit_ms: Option<u64>,
    /// Report search failures instead of falling back to the layer method.
    #[arg(long)]
    no_fallback: bool,
    /// Keep the raw layer-method output without merging same-face turns.
    #[arg(long)]
    no_simplify: bool,
    /// Print every move with its description.
    #[arg(long)]
    steps: bool,
}

impl SolveArgs {
    /// The arguments of a bare `solve` invocation, with every flag at its default.
    fn defaults() -> Result<Self> {
        let command = SolveArgs::augment_args(clap::Command::new("solve"));
        command
            .try_get_matches_from(["solve"])
            .and_then(|matches| SolveArgs::from_arg_matches(&matches))
            .map_err(|e| CubeError::InvalidArgument(e.to_string()))
    }

    fn options(&self) -> SolveOptions {
        let mut options = SolveOptions::new(self.algorithm)
            .with_layer(LayerConfig::default().with_simplify(!self.no_simplify))
            .with_search(
                SearchConfig::default()
                    .with_depth_bound(self.depth_bound)
                    .with_max_expansions(self.max_expansions),
            )
            .with_fallback(!self.no_fallback);
        if let Some(millis) = self.time_limit_ms {
            options = options.with_time_limit(Duration::from_millis(millis));
        }
        options
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let outcome = match cli.command {
        Some(Command::Scramble(args)) => run_scramble(&args),
        Some(Command::Solve(args)) => run_solve(&args),
        Some(Command::Show { moves }) => run_show(&moves),
        // default: random scramble solved layer by layer
        None => SolveArgs::defaults().and_then(|args| run_solve(&args)),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// The sticker net of `cube`, one letter per sticker.
fn render(cube: &Cube) -> String {
    grid::format_net(&grid::project(cube))
}

/// Prints a random scramble and the cube it produces.
fn run_scramble(args: &ScrambleArgs) -> Result<()> {
    let (cube, moves) = scramble_with_seed(args.length, args.seed)?;
    println!("Scramble: {}", format_sequence(&moves));
    print!("{}", render(&cube));
    Ok(())
}

/// Prints the cube reached from solved by `moves`.
fn run_show(moves: &str) -> Result<()> {
    let cube = compose(&parse_sequence(moves)?);
    print!("{}", render(&cube));
    Ok(())
}

/// The cube to solve and the moves that produced it.
fn starting_cube(args: &SolveArgs) -> Result<(Cube, Vec<Move>)> {
    match &args.moves {
        Some(notation) => {
            let moves = parse_sequence(notation)?;
            Ok((compose(&moves), moves))
        }
        None => scramble_with_seed(args.scramble.length, args.scramble.seed),
    }
}

/// Solves the requested scramble and prints the result.
fn run_solve(args: &SolveArgs) -> Result<()> {
    let (cube, scramble) = starting_cube(args)?;
    println!("Scramble: {}", format_sequence(&scramble));
    print!("{}", render(&cube));

    let result = solve(&cube, &args.options())?;
    println!();
    print!("{}", format_report(&result, args.steps));
    Ok(())
}

/// Formats the solution, optional per-move descriptions and metrics.
fn format_report(result: &SolveResult, steps: bool) -> String {
    let metrics = &result.metrics;
    let mut output = format!("Solution ({} moves):", metrics.move_count);
    if !result.moves.is_empty() {
        output.push(' ');
        output.push_str(&format_sequence(&result.moves));
    }
    output.push('\n');

    if steps {
        for (i, step) in result.steps.iter().enumerate() {
            let mv = step.mv.to_string();
            output.push_str(&format!("{:>4}. {mv:<3} {}\n", i + 1, step.description));
        }
    }

    output.push_str(&format!("Algorithm: {}\n", metrics.algorithm));
    output.push_str(&format!("Time: {:.3} ms\n", metrics.elapsed.as_secs_f64() * 1000.0));
    output.push_str(&format!("Moves/s: {:.1}\n", metrics.moves_per_second));
    output.push_str(&format!("Efficiency: {:.1}%\n", metrics.efficiency));
    output
}
