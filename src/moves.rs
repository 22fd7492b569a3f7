//! Face turns and their action on the cube state.
//!
//! The 18 legal moves are built at compile time from the six clockwise
//! quarter turns, each written as a slot transformation: `perm[slot]` names
//! the slot whose piece lands in `slot`, and `orient[slot]` is the twist or
//! flip that piece picks up on the way.

use std::fmt;
use std::str::FromStr;

use crate::error::{CubeError, Result};
use crate::pieces::{Cube, NUM_CORNERS, NUM_EDGES};

/// Number of distinct face turns.
pub const NUM_MOVES: usize = 18;

/// One of the six outer layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

    /// Side faces in counter-clockwise order as seen from above.
    pub const SIDES: [Face; 4] = [Face::F, Face::R, Face::B, Face::L];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::R => Face::L,
            Face::F => Face::B,
            Face::D => Face::U,
            Face::L => Face::R,
            Face::B => Face::F,
        }
    }

    /// 0 for U/D, 1 for R/L, 2 for F/B. Opposite faces share an axis and commute.
    #[inline]
    pub const fn axis(self) -> usize {
        self as usize % 3
    }

    /// The face playing this face's role when `Face::SIDES[view]` is treated as the front.
    ///
    /// U and D stay put; side faces advance `view` steps around the cube.
    pub fn in_view(self, view: usize) -> Face {
        match Face::SIDES.iter().position(|&side| side == self) {
            Some(position) => Face::SIDES[(position + view) % 4],
            None => self,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Face::U => 'U',
            Face::R => 'R',
            Face::F => 'F',
            Face::D => 'D',
            Face::L => 'L',
            Face::B => 'B',
        }
    }

    fn from_symbol(symbol: char) -> Option<Face> {
        Face::ALL.into_iter().find(|face| face.symbol() == symbol)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// How far a face is turned, seen from outside that face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Turn {
    Clockwise,
    Double,
    CounterClockwise,
}

impl Turn {
    pub const ALL: [Turn; 3] = [Turn::Clockwise, Turn::Double, Turn::CounterClockwise];

    /// Clockwise quarter turns this turn amounts to (1, 2 or 3).
    #[inline]
    pub const fn quarter_turns(self) -> u8 {
        self as u8 + 1
    }

    /// The turn equal to `quarters` clockwise quarter turns, or `None` for a multiple of four.
    pub const fn from_quarter_turns(quarters: u8) -> Option<Turn> {
        match quarters % 4 {
            1 => Some(Turn::Clockwise),
            2 => Some(Turn::Double),
            3 => Some(Turn::CounterClockwise),
            _ => None,
        }
    }

    pub const fn inverse(self) -> Turn {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::Double => Turn::Double,
            Turn::CounterClockwise => Turn::Clockwise,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::Double => "2",
            Turn::CounterClockwise => "'",
        }
    }
}

/// A single face turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

impl Move {
    pub const fn new(face: Face, turn: Turn) -> Self {
        Self { face, turn }
    }

    /// All 18 moves, ordered by face and then by turn.
    pub const ALL: [Move; NUM_MOVES] = {
        let mut moves = [Move::new(Face::U, Turn::Clockwise); NUM_MOVES];
        let mut index = 0;
        while index < NUM_MOVES {
            moves[index] = Move::new(Face::ALL[index / 3], Turn::ALL[index % 3]);
            index += 1;
        }
        moves
    };

    /// Position in `Move::ALL` and in the transition table.
    #[inline]
    pub const fn index(self) -> usize {
        self.face as usize * 3 + self.turn as usize
    }

    /// The move that undoes this one: itself for half turns, the opposite direction otherwise.
    #[inline]
    pub const fn inverse(self) -> Move {
        Move::new(self.face, self.turn.inverse())
    }

    #[inline]
    pub const fn is_quarter_turn(self) -> bool {
        !matches!(self.turn, Turn::Double)
    }

    /// The slot transformation this move performs.
    #[inline]
    pub fn transformation(self) -> &'static Cube {
        &MOVE_TABLE[self.index()]
    }

    /// Applies this move to `cube`, returning the new state.
    #[inline]
    pub fn apply(self, cube: &Cube) -> Cube {
        cube.multiply(self.transformation())
    }

    /// This move as seen with `Face::SIDES[view]` as the front.
    #[inline]
    pub fn in_view(self, view: usize) -> Move {
        Move::new(self.face.in_view(view), self.turn)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.turn.suffix())
    }
}

impl FromStr for Move {
    type Err = CubeError;

    fn from_str(symbol: &str) -> Result<Self> {
        let mut chars = symbol.chars();
        let face = chars
            .next()
            .and_then(Face::from_symbol)
            .ok_or_else(|| CubeError::invalid(format!("unknown move symbol {symbol:?}")))?;
        let turn = match chars.as_str() {
            "" => Turn::Clockwise,
            "2" => Turn::Double,
            "'" | "’" => Turn::CounterClockwise,
            _ => {
                return Err(CubeError::invalid(format!(
                    "unknown move symbol {symbol:?}"
                )))
            }
        };
        Ok(Move::new(face, turn))
    }
}

/// Standard move constants, e.g. `R`, `R2` and `RI` for R'.
pub mod notation {
    use super::{Face, Move, Turn};

    pub const U: Move = Move::new(Face::U, Turn::Clockwise);
    pub const U2: Move = Move::new(Face::U, Turn::Double);
    pub const UI: Move = Move::new(Face::U, Turn::CounterClockwise);
    pub const R: Move = Move::new(Face::R, Turn::Clockwise);
    pub const R2: Move = Move::new(Face::R, Turn::Double);
    pub const RI: Move = Move::new(Face::R, Turn::CounterClockwise);
    pub const F: Move = Move::new(Face::F, Turn::Clockwise);
    pub const F2: Move = Move::new(Face::F, Turn::Double);
    pub const FI: Move = Move::new(Face::F, Turn::CounterClockwise);
    pub const D: Move = Move::new(Face::D, Turn::Clockwise);
    pub const D2: Move = Move::new(Face::D, Turn::Double);
    pub const DI: Move = Move::new(Face::D, Turn::CounterClockwise);
    pub const L: Move = Move::new(Face::L, Turn::Clockwise);
    pub const L2: Move = Move::new(Face::L, Turn::Double);
    pub const LI: Move = Move::new(Face::L, Turn::CounterClockwise);
    pub const B: Move = Move::new(Face::B, Turn::Clockwise);
    pub const B2: Move = Move::new(Face::B, Turn::Double);
    pub const BI: Move = Move::new(Face::B, Turn::CounterClockwise);
}

/// Builds a quarter-turn transformation from slot tables.
const fn quarter_turn(
    corner_perm: [u8; NUM_CORNERS],
    corner_orient: [u8; NUM_CORNERS],
    edge_perm: [u8; NUM_EDGES],
    edge_orient: [u8; NUM_EDGES],
) -> Cube {
    Cube {
        corner_perm,
        corner_orient,
        edge_perm,
        edge_orient,
    }
}

/// Clockwise quarter turns in `Face::ALL` order.
///
/// Slot order is URF UFL ULB UBR DFR DLF DBL DRB for corners and
/// UR UF UL UB DR DF DL DB FR FL BL BR for edges.
const QUARTER_TURNS: [Cube; 6] = [
    // U
    quarter_turn(
        [3, 0, 1, 2, 4, 5, 6, 7],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [3, 0, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11],
        [0; NUM_EDGES],
    ),
    // R
    quarter_turn(
        [4, 1, 2, 0, 7, 5, 6, 3],
        [2, 0, 0, 1, 1, 0, 0, 2],
        [8, 1, 2, 3, 11, 5, 6, 7, 4, 9, 10, 0],
        [0; NUM_EDGES],
    ),
    // F
    quarter_turn(
        [1, 5, 2, 3, 0, 4, 6, 7],
        [1, 2, 0, 0, 2, 1, 0, 0],
        [0, 9, 2, 3, 4, 8, 6, 7, 1, 5, 10, 11],
        [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
    ),
    // D
    quarter_turn(
        [0, 1, 2, 3, 5, 6, 7, 4],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 1, 2, 3, 5, 6, 7, 4, 8, 9, 10, 11],
        [0; NUM_EDGES],
    ),
    // L
    quarter_turn(
        [0, 2, 6, 3, 4, 1, 5, 7],
        [0, 1, 2, 0, 0, 2, 1, 0],
        [0, 1, 10, 3, 4, 5, 9, 7, 8, 2, 6, 11],
        [0; NUM_EDGES],
    ),
    // B
    quarter_turn(
        [0, 1, 3, 7, 4, 5, 2, 6],
        [0, 0, 1, 2, 0, 0, 2, 1],
        [0, 1, 2, 11, 4, 5, 6, 10, 8, 9, 3, 7],
        [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
    ),
];

/// Builds the transition table for all 18 moves at compile time.
///
/// Entry `face * 3 + turn` is the clockwise quarter turn composed with
/// itself `turn.quarter_turns()` times.
const fn build_move_table() -> [Cube; NUM_MOVES] {
    let mut table = [Cube::SOLVED; NUM_MOVES];

    let mut face = 0;
    while face < 6 {
        let quarter = QUARTER_TURNS[face];
        let mut power = quarter;
        let mut turn = 0;
        while turn < 3 {
            table[face * 3 + turn] = power;
            power = power.multiply(&quarter);
            turn += 1;
        }
        face += 1;
    }

    table
}

static MOVE_TABLE: [Cube; NUM_MOVES] = build_move_table();

/// Applies `moves` to `cube` in order.
pub fn apply_sequence(cube: &Cube, moves: &[Move]) -> Cube {
    moves.iter().fold(*cube, |state, mv| mv.apply(&state))
}

/// The state reached from the solved cube by `moves`.
pub fn compose(moves: &[Move]) -> Cube {
    apply_sequence(&Cube::SOLVED, moves)
}

/// The sequence that undoes `moves`.
pub fn invert_sequence(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|mv| mv.inverse()).collect()
}

/// Relabels a sequence written with F as the front for `Face::SIDES[view]` as the front.
pub fn in_view(moves: &[Move], view: usize) -> Vec<Move> {
    moves.iter().map(|mv| mv.in_view(view)).collect()
}

/// Parses whitespace-separated notation such as `"R U R' U'"`.
///
/// Nothing is applied anywhere; a malformed symbol rejects the whole sequence.
pub fn parse_sequence(notation: &str) -> Result<Vec<Move>> {
    notation.split_whitespace().map(str::parse).collect()
}

/// Formats moves as space-separated notation.
pub fn format_sequence(moves: &[Move]) -> String {
    moves
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Merges runs of turns on the same face.
///
/// `R R` becomes `R2`, `R R'` disappears, and merging continues as long as
/// the previous surviving move turns the same face. Returns the merged moves
/// together with, for each of them, the index of the input move that opened
/// the run.
pub fn simplify_with_origins(moves: &[Move]) -> Vec<(Move, usize)> {
    // (face, accumulated quarter turns, origin index)
    let mut runs: Vec<(Face, u8, usize)> = Vec::with_capacity(moves.len());

    for (index, mv) in moves.iter().enumerate() {
        if let Some(last) = runs.last_mut() {
            if last.0 == mv.face {
                last.1 = (last.1 + mv.turn.quarter_turns()) % 4;
                if last.1 == 0 {
                    runs.pop();
                }
                continue;
            }
        }
        runs.push((mv.face, mv.turn.quarter_turns(), index));
    }

    runs.into_iter()
        .filter_map(|(face, quarters, origin)| {
            Turn::from_quarter_turns(quarters).map(|turn| (Move::new(face, turn), origin))
        })
        .collect()
}

/// Merges runs of turns on the same face; see [`simplify_with_origins`].
pub fn simplify(moves: &[Move]) -> Vec<Move> {
    simplify_with_origins(moves)
        .into_iter()
        .map(|(mv, _)| mv)
        .collect()
}
