//! Rubik's Cube Solver Library
//!
//! Models the 3x3x3 cube as corner and edge pieces, applies face turns
//! through a compile-time transition table, and solves scrambles either
//! with a staged layer-by-layer method or with a bounded A* search.

pub mod error;
pub mod grid;
pub mod layer;
pub mod moves;
pub mod pieces;
pub mod scramble;
pub mod search;
pub mod solve;

pub use error::{CubeError, Result};
pub use grid::{from_facelets, project, Color, Facelets};
pub use moves::{Face, Move, Turn};
pub use pieces::{Corner, Cube, Edge};
pub use scramble::{scramble, scramble_with_seed, DEFAULT_SCRAMBLE_LENGTH};
pub use solve::{
    solve, spawn_solve, step_forward, Algorithm, Budget, CancelToken, Metrics, SolveHandle,
    SolveOptions, SolveResult, SolveStep,
};

/// Trait that erases the solver choice for dynamic dispatch.
///
/// The solve boundary picks an implementation from [`Algorithm`] at run time
/// and drives it through the vtable, so fallback between solvers needs no
/// generics.
pub trait CubeSolver: Send + Sync {
    /// The algorithm reported in metrics for solutions from this solver.
    fn algorithm(&self) -> Algorithm;

    /// Solves `cube`, recording one step per move, while `budget` allows.
    fn solve_steps(&self, cube: &Cube, budget: &Budget) -> Result<Vec<SolveStep>>;
}

/// Piece-identity solvedness of `cube`.
pub fn is_solved(cube: &Cube) -> bool {
    cube.is_solved()
}
