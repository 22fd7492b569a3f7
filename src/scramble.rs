//! Random scrambles built by composing legal face turns.
//!
//! The caller owns the random source, so a seeded generator gives
//! reproducible scrambles.

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{CubeError, Result};
use crate::moves::{compose, Move, NUM_MOVES};
use crate::pieces::Cube;

/// Length used when the caller does not pick one.
pub const DEFAULT_SCRAMBLE_LENGTH: usize = 20;

/// A generator seeded from `seed`, for reproducible scrambles.
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// A generator seeded from the operating system.
pub fn entropy_rng() -> SmallRng {
    SmallRng::from_os_rng()
}

/// True when `candidate` would waste or cancel part of the sequence so far.
///
/// A turn of the same face as the previous move merges with it, and a third
/// turn on one axis merges with the first (`R L R` is `R2 L`).
fn is_redundant(sequence: &[Move], candidate: Move) -> bool {
    match sequence {
        [.., previous] if previous.face == candidate.face => true,
        [.., first, second] => {
            first.face.axis() == candidate.face.axis()
                && second.face.axis() == candidate.face.axis()
        }
        _ => false,
    }
}

/// Draws `length` moves, redrawing any that would collapse into their neighbours.
pub fn scramble_moves<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Result<Vec<Move>> {
    if length == 0 {
        return Err(CubeError::invalid("scramble length must be at least 1"));
    }

    let mut sequence = Vec::with_capacity(length);
    while sequence.len() < length {
        let candidate = Move::ALL[rng.random_range(0..NUM_MOVES)];
        if !is_redundant(&sequence, candidate) {
            sequence.push(candidate);
        }
    }
    Ok(sequence)
}

/// A random reachable state and the moves that produced it from solved.
pub fn scramble<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Result<(Cube, Vec<Move>)> {
    let moves = scramble_moves(length, rng)?;
    let cube = compose(&moves);
    debug!("Scrambled with {} moves", moves.len());
    Ok((cube, moves))
}

/// [`scramble`] with a seeded generator, or an OS-seeded one when `seed` is `None`.
pub fn scramble_with_seed(length: usize, seed: Option<u64>) -> Result<(Cube, Vec<Move>)> {
    let mut rng = match seed {
        Some(seed) => seeded_rng(seed),
        None => entropy_rng(),
    };
    scramble(length, &mut rng)
}
