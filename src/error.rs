//! Error taxonomy shared by the engine, the solvers and the solve boundary.

use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while building, moving or solving a cube.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    /// Rejected input: bad scramble length, malformed move symbol, impossible sticker grid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A layer stage stopped making progress although the cube invariants say it must.
    #[error("{stage} stage made no progress on {piece}: {detail}")]
    InternalInconsistency {
        stage: &'static str,
        piece: String,
        detail: String,
    },
    /// The search hit its depth bound or expansion budget without reaching the solved state.
    #[error("Search exhausted after {expanded} expansions (depth bound {depth_bound})")]
    SearchExhausted { depth_bound: u8, expanded: usize },
    /// Playback asked for a step past the end of a solution.
    #[error("Step index {index} is out of range for a solution of {len} steps")]
    OutOfRange { index: usize, len: usize },
    /// The caller cancelled the solve.
    #[error("Solve cancelled")]
    Cancelled,
    /// The solve ran past the caller's wall-clock limit.
    #[error("Solve exceeded its time limit of {0:?}")]
    TimedOut(Duration),
}

pub type Result<T> = std::result::Result<T, CubeError>;

impl CubeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CubeError::InvalidArgument(message.into())
    }
}
