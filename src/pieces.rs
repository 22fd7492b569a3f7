//! Piece definitions and the piece-identity cube state.
//!
//! Slots and pieces share one naming scheme: in the solved cube the piece
//! `Corner::Urf` sits in the slot `Corner::Urf` with orientation 0. Centers
//! never move, so they are not part of the state.
//!
//! Orientation conventions:
//! - A corner's orientation counts how far its U/D sticker is twisted
//!   clockwise away from the U/D face of its slot (0, 1 or 2).
//! - An edge's orientation is 1 when its reference sticker (U/D for top and
//!   bottom edges, F/B for middle-layer edges) is off the slot's reference face.

use std::fmt;

use crate::error::{CubeError, Result};

/// Number of corner slots (and corner pieces).
pub const NUM_CORNERS: usize = 8;

/// Number of edge slots (and edge pieces).
pub const NUM_EDGES: usize = 12;

/// A corner slot or corner piece, named by the faces it touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Corner {
    Urf,
    Ufl,
    Ulb,
    Ubr,
    Dfr,
    Dlf,
    Dbl,
    Drb,
}

impl Corner {
    pub const ALL: [Corner; NUM_CORNERS] = [
        Corner::Urf,
        Corner::Ufl,
        Corner::Ulb,
        Corner::Ubr,
        Corner::Dfr,
        Corner::Dlf,
        Corner::Dbl,
        Corner::Drb,
    ];

    /// Corners of the U layer, in the order a clockwise U turn cycles them.
    pub const TOP: [Corner; 4] = [Corner::Urf, Corner::Ufl, Corner::Ulb, Corner::Ubr];

    /// Corners of the D layer.
    pub const BOTTOM: [Corner; 4] = [Corner::Dfr, Corner::Dlf, Corner::Dbl, Corner::Drb];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(index: usize) -> Corner {
        Self::ALL[index]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Corner::Urf => "URF",
            Corner::Ufl => "UFL",
            Corner::Ulb => "ULB",
            Corner::Ubr => "UBR",
            Corner::Dfr => "DFR",
            Corner::Dlf => "DLF",
            Corner::Dbl => "DBL",
            Corner::Drb => "DRB",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An edge slot or edge piece, named by the faces it touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Edge {
    Ur,
    Uf,
    Ul,
    Ub,
    Dr,
    Df,
    Dl,
    Db,
    Fr,
    Fl,
    Bl,
    Br,
}

impl Edge {
    pub const ALL: [Edge; NUM_EDGES] = [
        Edge::Ur,
        Edge::Uf,
        Edge::Ul,
        Edge::Ub,
        Edge::Dr,
        Edge::Df,
        Edge::Dl,
        Edge::Db,
        Edge::Fr,
        Edge::Fl,
        Edge::Bl,
        Edge::Br,
    ];

    /// Edges of the U layer, in the order a clockwise U turn cycles them.
    pub const TOP: [Edge; 4] = [Edge::Ur, Edge::Uf, Edge::Ul, Edge::Ub];

    /// Edges of the D layer.
    pub const BOTTOM: [Edge; 4] = [Edge::Dr, Edge::Df, Edge::Dl, Edge::Db];

    /// Edges of the middle (E) layer.
    pub const MIDDLE: [Edge; 4] = [Edge::Fr, Edge::Fl, Edge::Bl, Edge::Br];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(index: usize) -> Edge {
        Self::ALL[index]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Edge::Ur => "UR",
            Edge::Uf => "UF",
            Edge::Ul => "UL",
            Edge::Ub => "UB",
            Edge::Dr => "DR",
            Edge::Df => "DF",
            Edge::Dl => "DL",
            Edge::Db => "DB",
            Edge::Fr => "FR",
            Edge::Fl => "FL",
            Edge::Bl => "BL",
            Edge::Br => "BR",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Piece-identity cube state: which piece sits in each slot, and how it is turned.
///
/// Fixed-size arrays keep the state `Copy` and its equality and hashing O(20),
/// so snapshots can be kept freely and used as search keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cube {
    /// `corner_perm[slot]` is the index of the corner piece occupying `slot`.
    pub(crate) corner_perm: [u8; NUM_CORNERS],
    /// Orientation (0..3) of the piece in each corner slot.
    pub(crate) corner_orient: [u8; NUM_CORNERS],
    /// `edge_perm[slot]` is the index of the edge piece occupying `slot`.
    pub(crate) edge_perm: [u8; NUM_EDGES],
    /// Orientation (0..2) of the piece in each edge slot.
    pub(crate) edge_orient: [u8; NUM_EDGES],
}

impl Default for Cube {
    fn default() -> Self {
        Self::SOLVED
    }
}

impl Cube {
    /// Every piece home, orientation 0.
    pub const SOLVED: Cube = Cube {
        corner_perm: [0, 1, 2, 3, 4, 5, 6, 7],
        corner_orient: [0; NUM_CORNERS],
        edge_perm: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        edge_orient: [0; NUM_EDGES],
    };

    pub const fn solved() -> Self {
        Self::SOLVED
    }

    /// Builds a cube from `(piece, orientation)` pairs listed by slot.
    ///
    /// Fails with `InvalidArgument` unless the result is reachable from the
    /// solved cube by face turns.
    pub fn from_parts(
        corners: [(Corner, u8); NUM_CORNERS],
        edges: [(Edge, u8); NUM_EDGES],
    ) -> Result<Self> {
        let mut cube = Self::SOLVED;
        for (slot, (piece, orientation)) in corners.into_iter().enumerate() {
            cube.corner_perm[slot] = piece as u8;
            cube.corner_orient[slot] = orientation;
        }
        for (slot, (piece, orientation)) in edges.into_iter().enumerate() {
            cube.edge_perm[slot] = piece as u8;
            cube.edge_orient[slot] = orientation;
        }
        cube.validate()?;
        Ok(cube)
    }

    /// Piece-identity solvedness; sticker colors are never consulted.
    #[inline]
    pub fn is_solved(&self) -> bool {
        *self == Self::SOLVED
    }

    /// The corner piece in `slot` and its orientation.
    #[inline]
    pub fn corner_at(&self, slot: Corner) -> (Corner, u8) {
        (
            Corner::from_index(self.corner_perm[slot.index()] as usize),
            self.corner_orient[slot.index()],
        )
    }

    /// The edge piece in `slot` and its orientation.
    #[inline]
    pub fn edge_at(&self, slot: Edge) -> (Edge, u8) {
        (
            Edge::from_index(self.edge_perm[slot.index()] as usize),
            self.edge_orient[slot.index()],
        )
    }

    /// The slot currently holding corner `piece`, and the piece's orientation there.
    pub fn locate_corner(&self, piece: Corner) -> (Corner, u8) {
        for slot in Corner::ALL {
            if self.corner_perm[slot.index()] == piece as u8 {
                return (slot, self.corner_orient[slot.index()]);
            }
        }
        unreachable!("corner permutation is a bijection")
    }

    /// The slot currently holding edge `piece`, and the piece's orientation there.
    pub fn locate_edge(&self, piece: Edge) -> (Edge, u8) {
        for slot in Edge::ALL {
            if self.edge_perm[slot.index()] == piece as u8 {
                return (slot, self.edge_orient[slot.index()]);
            }
        }
        unreachable!("edge permutation is a bijection")
    }

    #[inline]
    pub fn corner_is_solved(&self, piece: Corner) -> bool {
        self.corner_at(piece) == (piece, 0)
    }

    #[inline]
    pub fn edge_is_solved(&self, piece: Edge) -> bool {
        self.edge_at(piece) == (piece, 0)
    }

    /// The state reached by performing `self` and then `other`.
    ///
    /// Both operands are read as "slot `i` receives the piece from slot `p[i]`"
    /// transformations, so applying a move is `cube.multiply(&move_cube)`.
    pub const fn multiply(&self, other: &Cube) -> Cube {
        let mut result = Cube::SOLVED;

        let mut slot = 0;
        while slot < NUM_CORNERS {
            let from = other.corner_perm[slot] as usize;
            result.corner_perm[slot] = self.corner_perm[from];
            result.corner_orient[slot] = (self.corner_orient[from] + other.corner_orient[slot]) % 3;
            slot += 1;
        }

        let mut slot = 0;
        while slot < NUM_EDGES {
            let from = other.edge_perm[slot] as usize;
            result.edge_perm[slot] = self.edge_perm[from];
            result.edge_orient[slot] = (self.edge_orient[from] + other.edge_orient[slot]) % 2;
            slot += 1;
        }

        result
    }

    /// Parity (0 = even, 1 = odd) of the corner permutation.
    pub fn corner_parity(&self) -> u8 {
        permutation_parity(&self.corner_perm)
    }

    /// Parity (0 = even, 1 = odd) of the edge permutation.
    pub fn edge_parity(&self) -> u8 {
        permutation_parity(&self.edge_perm)
    }

    /// Sum of corner orientations modulo 3.
    pub fn twist(&self) -> u8 {
        self.corner_orient.iter().map(|&o| o as u32).sum::<u32>() as u8 % 3
    }

    /// Sum of edge orientations modulo 2.
    pub fn flip(&self) -> u8 {
        self.edge_orient.iter().map(|&o| o as u32).sum::<u32>() as u8 % 2
    }

    /// Corners not at home with orientation 0.
    pub fn misplaced_corners(&self) -> usize {
        Corner::ALL
            .iter()
            .filter(|&&corner| !self.corner_is_solved(corner))
            .count()
    }

    /// Edges not at home with orientation 0.
    pub fn misplaced_edges(&self) -> usize {
        Edge::ALL
            .iter()
            .filter(|&&edge| !self.edge_is_solved(edge))
            .count()
    }

    /// Checks every invariant of a reachable state.
    pub fn validate(&self) -> Result<()> {
        check_bijection(&self.corner_perm, "corner")?;
        check_bijection(&self.edge_perm, "edge")?;

        if let Some(&bad) = self.corner_orient.iter().find(|&&o| o > 2) {
            return Err(CubeError::invalid(format!("corner orientation {bad} is not 0, 1 or 2")));
        }
        if let Some(&bad) = self.edge_orient.iter().find(|&&o| o > 1) {
            return Err(CubeError::invalid(format!("edge orientation {bad} is not 0 or 1")));
        }
        if self.twist() != 0 {
            return Err(CubeError::invalid("corner orientations do not sum to 0 mod 3"));
        }
        if self.flip() != 0 {
            return Err(CubeError::invalid("edge orientations do not sum to 0 mod 2"));
        }
        if self.corner_parity() != self.edge_parity() {
            return Err(CubeError::invalid(
                "corner and edge permutation parities differ",
            ));
        }
        Ok(())
    }
}

/// Ensures every piece index `0..perm.len()` appears exactly once.
fn check_bijection(perm: &[u8], kind: &str) -> Result<()> {
    let mut seen = [false; NUM_EDGES];
    for &piece in perm {
        let piece = piece as usize;
        if piece >= perm.len() {
            return Err(CubeError::invalid(format!("unknown {kind} piece {piece}")));
        }
        if seen[piece] {
            return Err(CubeError::invalid(format!("{kind} piece {piece} appears twice")));
        }
        seen[piece] = true;
    }
    Ok(())
}

/// Parity of a permutation given as a slot-to-piece table.
pub(crate) fn permutation_parity(perm: &[u8]) -> u8 {
    let mut inversions = 0u32;
    for i in 0..perm.len() {
        for j in (i + 1)..perm.len() {
            if perm[i] > perm[j] {
                inversions += 1;
            }
        }
    }
    (inversions % 2) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved_parts() -> ([(Corner, u8); NUM_CORNERS], [(Edge, u8); NUM_EDGES]) {
        (Corner::ALL.map(|c| (c, 0)), Edge::ALL.map(|e| (e, 0)))
    }

    #[test]
    fn test_solved_is_solved_and_valid() {
        let cube = Cube::solved();
        assert!(cube.is_solved());
        assert!(cube.validate().is_ok());
        assert_eq!(cube.misplaced_corners(), 0);
        assert_eq!(cube.misplaced_edges(), 0);
    }

    #[test]
    fn test_index_roundtrip() {
        for corner in Corner::ALL {
            assert_eq!(Corner::from_index(corner.index()), corner);
        }
        for edge in Edge::ALL {
            assert_eq!(Edge::from_index(edge.index()), edge);
        }
    }

    #[test]
    fn test_from_parts_accepts_double_swap() {
        let (mut corners, mut edges) = solved_parts();
        corners.swap(0, 1);
        edges.swap(0, 1);
        let cube = Cube::from_parts(corners, edges).unwrap();
        assert!(!cube.is_solved());
        assert_eq!(cube.corner_parity(), 1);
        assert_eq!(cube.edge_parity(), 1);
        assert_eq!(cube.locate_corner(Corner::Urf), (Corner::Ufl, 0));
        assert_eq!(cube.locate_edge(Edge::Uf), (Edge::Ur, 0));
    }

    #[test]
    fn test_from_parts_rejects_parity_mismatch() {
        let (mut corners, edges) = solved_parts();
        corners.swap(0, 1);
        assert!(matches!(
            Cube::from_parts(corners, edges),
            Err(CubeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_parts_rejects_single_twist() {
        let (mut corners, edges) = solved_parts();
        corners[3].1 = 1;
        assert!(Cube::from_parts(corners, edges).is_err());
    }

    #[test]
    fn test_from_parts_rejects_single_flip() {
        let (corners, mut edges) = solved_parts();
        edges[7].1 = 1;
        assert!(Cube::from_parts(corners, edges).is_err());
    }

    #[test]
    fn test_from_parts_rejects_duplicate_piece() {
        let (corners, mut edges) = solved_parts();
        edges[0].0 = Edge::Uf;
        assert!(Cube::from_parts(corners, edges).is_err());
    }

    #[test]
    fn test_multiply_by_solved_is_identity() {
        let (mut corners, mut edges) = solved_parts();
        corners.swap(2, 5);
        edges.swap(4, 9);
        let cube = Cube::from_parts(corners, edges).unwrap();
        assert_eq!(cube.multiply(&Cube::SOLVED), cube);
        assert_eq!(Cube::SOLVED.multiply(&cube), cube);
    }

    #[test]
    fn test_misplaced_counts_orientation() {
        let (mut corners, mut edges) = solved_parts();
        corners[0].1 = 1;
        corners[1].1 = 2;
        edges[0].1 = 1;
        edges[1].1 = 1;
        let cube = Cube::from_parts(corners, edges).unwrap();
        assert_eq!(cube.misplaced_corners(), 2);
        assert_eq!(cube.misplaced_edges(), 2);
        assert!(!cube.is_solved());
    }
}
