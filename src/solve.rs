//! The solve boundary: algorithm choice, options, cancellation, results and playback.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::error::{CubeError, Result};
use crate::layer::{LayerConfig, LayerSolver};
use crate::moves::Move;
use crate::pieces::Cube;
use crate::search::{SearchConfig, SearchSolver};
use crate::CubeSolver;

/// Move count of a good solution, used as the efficiency baseline.
pub const OPTIMAL_BASELINE: usize = 20;

/// Which solver produces the moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[default]
    LayerByLayer,
    Search,
}

impl Algorithm {
    /// Display name reported in metrics.
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::LayerByLayer => "Layer-by-Layer",
            Algorithm::Search => "A* Search",
        }
    }

    /// Efficiency points lost per move above the baseline.
    pub const fn penalty_factor(self) -> f64 {
        match self {
            Algorithm::LayerByLayer => 0.5,
            Algorithm::Search => 0.25,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = CubeError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "layer-by-layer" | "layer" => Ok(Algorithm::LayerByLayer),
            "search" | "astar" => Ok(Algorithm::Search),
            _ => Err(CubeError::invalid(format!(
                "unknown algorithm {name:?}, expected \"layer-by-layer\" or \"search\""
            ))),
        }
    }
}

/// One recorded move with the state it leads to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveStep {
    pub mv: Move,
    /// Snapshot after `mv`.
    pub cube: Cube,
    pub description: String,
}

/// Informational figures about one solve.
#[derive(Clone, Debug, PartialEq)]
pub struct Metrics {
    pub move_count: usize,
    pub elapsed: Duration,
    /// Zero when the solve finished too fast to measure.
    pub moves_per_second: f64,
    /// `100 − (moves − 20) × factor`, clamped to `0..=100`.
    pub efficiency: f64,
    pub algorithm: Algorithm,
}

impl Metrics {
    pub fn new(algorithm: Algorithm, move_count: usize, elapsed: Duration) -> Self {
        let seconds = elapsed.as_secs_f64();
        let moves_per_second = if seconds > 0.0 {
            move_count as f64 / seconds
        } else {
            0.0
        };
        let excess = move_count as f64 - OPTIMAL_BASELINE as f64;
        let efficiency = (100.0 - excess * algorithm.penalty_factor()).clamp(0.0, 100.0);

        Self {
            move_count,
            elapsed,
            moves_per_second,
            efficiency,
            algorithm,
        }
    }
}

/// The outcome of a solve: moves, per-move snapshots and metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveResult {
    /// The state the solve started from.
    pub start: Cube,
    pub moves: Vec<Move>,
    pub steps: Vec<SolveStep>,
    pub metrics: Metrics,
}

impl SolveResult {
    /// Playback: the index after `index` and the snapshot reached by step `index`.
    pub fn step_forward(&self, index: usize) -> Result<(usize, Cube)> {
        let step = self.steps.get(index).ok_or(CubeError::OutOfRange {
            index,
            len: self.steps.len(),
        })?;
        Ok((index + 1, step.cube))
    }

    /// The state after every move; the start itself for an empty solution.
    pub fn final_state(&self) -> Cube {
        self.steps.last().map_or(self.start, |step| step.cube)
    }
}

/// See [`SolveResult::step_forward`].
pub fn step_forward(result: &SolveResult, index: usize) -> Result<(usize, Cube)> {
    result.step_forward(index)
}

/// Shared flag for cancelling a running solve from another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Cancellation and wall-clock limits the solvers poll while they work.
#[derive(Clone, Debug, Default)]
pub struct Budget {
    cancel: CancelToken,
    limit: Option<Duration>,
    deadline: Option<Instant>,
}

impl Budget {
    /// No deadline, with a fresh cancel token.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// A budget that expires `time_limit` from now, if given.
    pub fn new(cancel: CancelToken, time_limit: Option<Duration>) -> Self {
        Self {
            cancel,
            limit: time_limit,
            deadline: time_limit.map(|limit| Instant::now() + limit),
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Fails with `Cancelled` or `TimedOut` once the budget is spent.
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(CubeError::Cancelled);
        }
        match (self.deadline, self.limit) {
            (Some(deadline), Some(limit)) if Instant::now() >= deadline => {
                Err(CubeError::TimedOut(limit))
            }
            _ => Ok(()),
        }
    }
}

/// Everything a caller can tune about a solve.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveOptions {
    pub algorithm: Algorithm,
    pub layer: LayerConfig,
    pub search: SearchConfig,
    /// Fall back to the layer method when the search gives up.
    pub fallback: bool,
    pub time_limit: Option<Duration>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            layer: LayerConfig::default(),
            search: SearchConfig::default(),
            fallback: true,
            time_limit: None,
        }
    }
}

impl SolveOptions {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_layer(mut self, layer: LayerConfig) -> Self {
        self.layer = layer;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    fn solver(&self, algorithm: Algorithm) -> Box<dyn CubeSolver> {
        match algorithm {
            Algorithm::LayerByLayer => Box::new(LayerSolver::new(self.layer)),
            Algorithm::Search => Box::new(SearchSolver::new(self.search)),
        }
    }
}

/// Solves `cube` with the chosen algorithm.
pub fn solve(cube: &Cube, options: &SolveOptions) -> Result<SolveResult> {
    solve_with_cancel(cube, options, CancelToken::new())
}

/// [`solve`], observing `cancel` between algorithm applications and search batches.
pub fn solve_with_cancel(
    cube: &Cube,
    options: &SolveOptions,
    cancel: CancelToken,
) -> Result<SolveResult> {
    cube.validate()?;
    let budget = Budget::new(cancel, options.time_limit);
    let started = Instant::now();
    info!("Solving with {}", options.algorithm);

    let primary = options.solver(options.algorithm);
    let (algorithm, steps) = match primary.solve_steps(cube, &budget) {
        Ok(steps) => (primary.algorithm(), steps),
        Err(CubeError::SearchExhausted {
            depth_bound,
            expanded,
        }) if options.fallback && primary.algorithm() == Algorithm::Search => {
            let fallback = options.solver(Algorithm::LayerByLayer);
            warn!(
                "Search gave up after {expanded} expansions (depth bound {depth_bound}); falling back to {}",
                fallback.algorithm()
            );
            (fallback.algorithm(), fallback.solve_steps(cube, &budget)?)
        }
        Err(error) => return Err(error),
    };

    let moves: Vec<Move> = steps.iter().map(|step| step.mv).collect();
    let metrics = Metrics::new(algorithm, moves.len(), started.elapsed());
    info!(
        "{} solved in {} moves ({:?})",
        algorithm, metrics.move_count, metrics.elapsed
    );

    Ok(SolveResult {
        start: *cube,
        moves,
        steps,
        metrics,
    })
}

/// A solve running on a worker thread.
#[derive(Debug)]
pub struct SolveHandle {
    cancel: CancelToken,
    worker: JoinHandle<Result<SolveResult>>,
}

impl SolveHandle {
    /// Asks the worker to stop; `join` then returns `Cancelled` unless it already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the worker and returns its result.
    pub fn join(self) -> Result<SolveResult> {
        self.worker.join().unwrap_or_else(|_| {
            Err(CubeError::InternalInconsistency {
                stage: "worker",
                piece: String::from("cube"),
                detail: String::from("solver thread panicked"),
            })
        })
    }
}

/// Starts [`solve`] on a new thread.
pub fn spawn_solve(cube: Cube, options: SolveOptions) -> SolveHandle {
    let cancel = CancelToken::new();
    let token = cancel.clone();
    let worker = thread::spawn(move || solve_with_cancel(&cube, &options, token));
    SolveHandle { cancel, worker }
}
