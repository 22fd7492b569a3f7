//! Sticker view of a cube: six faces of nine colored facelets.
//!
//! The projection is derived from the piece state and is display-only; the
//! solvers never look at colors. Facelets on each face are numbered 0..9 in
//! reading order with the face seen from outside, U and D oriented so that
//! their rows line up with F in the unfolded net:
//!
//! ```text
//!         U0 U1 U2
//!         U3 U4 U5
//!         U6 U7 U8
//! L0 L1 L2 F0 F1 F2 R0 R1 R2 B0 B1 B2
//! L3 L4 L5 F3 F4 F5 R3 R4 R5 B3 B4 B5
//! L6 L7 L8 F6 F7 F8 R6 R7 R8 B6 B7 B8
//!         D0 D1 D2
//!         D3 D4 D5
//!         D6 D7 D8
//! ```

use crate::error::{CubeError, Result};
use crate::moves::Face;
use crate::pieces::{Corner, Cube, Edge, NUM_CORNERS, NUM_EDGES};

/// Facelets per face.
pub const STICKERS_PER_FACE: usize = 9;

/// Index of the fixed center facelet on every face.
const CENTER: usize = 4;

/// Sticker colors. Each face's center fixes its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White,
    Red,
    Green,
    Yellow,
    Orange,
    Blue,
}

impl Color {
    /// Colors in `Face::ALL` order.
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Blue,
    ];

    /// The color of `face`'s center.
    #[inline]
    pub const fn of_face(face: Face) -> Color {
        Self::ALL[face as usize]
    }

    /// The face whose center carries this color.
    #[inline]
    pub const fn face(self) -> Face {
        Face::ALL[self as usize]
    }

    pub const fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Yellow => 'Y',
            Color::Orange => 'O',
            Color::Blue => 'B',
        }
    }
}

/// The observable 6×9 sticker grid, indexed `[face.index()][facelet]`.
pub type Facelets = [[Color; STICKERS_PER_FACE]; 6];

/// A facelet position: face and index within that face.
type Facelet = (Face, usize);

/// Facelets of each corner slot, starting with its U/D facelet and going clockwise.
const CORNER_FACELETS: [[Facelet; 3]; NUM_CORNERS] = [
    [(Face::U, 8), (Face::R, 0), (Face::F, 2)],
    [(Face::U, 6), (Face::F, 0), (Face::L, 2)],
    [(Face::U, 0), (Face::L, 0), (Face::B, 2)],
    [(Face::U, 2), (Face::B, 0), (Face::R, 2)],
    [(Face::D, 2), (Face::F, 8), (Face::R, 6)],
    [(Face::D, 0), (Face::L, 8), (Face::F, 6)],
    [(Face::D, 6), (Face::B, 8), (Face::L, 6)],
    [(Face::D, 8), (Face::R, 8), (Face::B, 6)],
];

/// Facelets of each edge slot, starting with its reference facelet.
const EDGE_FACELETS: [[Facelet; 2]; NUM_EDGES] = [
    [(Face::U, 5), (Face::R, 1)],
    [(Face::U, 7), (Face::F, 1)],
    [(Face::U, 3), (Face::L, 1)],
    [(Face::U, 1), (Face::B, 1)],
    [(Face::D, 5), (Face::R, 7)],
    [(Face::D, 1), (Face::F, 7)],
    [(Face::D, 3), (Face::L, 7)],
    [(Face::D, 7), (Face::B, 7)],
    [(Face::F, 5), (Face::R, 3)],
    [(Face::F, 3), (Face::L, 5)],
    [(Face::B, 5), (Face::L, 3)],
    [(Face::B, 3), (Face::R, 5)],
];

/// The colors of a corner piece, in the order of its home slot's facelets.
#[inline]
fn corner_colors(piece: usize) -> [Color; 3] {
    CORNER_FACELETS[piece].map(|(face, _)| Color::of_face(face))
}

/// The colors of an edge piece, in the order of its home slot's facelets.
#[inline]
fn edge_colors(piece: usize) -> [Color; 2] {
    EDGE_FACELETS[piece].map(|(face, _)| Color::of_face(face))
}

#[inline]
fn sticker(grid: &Facelets, (face, index): Facelet) -> Color {
    grid[face.index()][index]
}

/// Derives the sticker grid from the piece state.
pub fn project(cube: &Cube) -> Facelets {
    let mut grid: Facelets = Color::ALL.map(|color| [color; STICKERS_PER_FACE]);

    for (slot, facelets) in CORNER_FACELETS.iter().enumerate() {
        let (piece, orientation) = cube.corner_at(Corner::from_index(slot));
        let colors = corner_colors(piece.index());
        for (n, color) in colors.into_iter().enumerate() {
            let (face, index) = facelets[(n + orientation as usize) % 3];
            grid[face.index()][index] = color;
        }
    }

    for (slot, facelets) in EDGE_FACELETS.iter().enumerate() {
        let (piece, orientation) = cube.edge_at(Edge::from_index(slot));
        let colors = edge_colors(piece.index());
        for (n, color) in colors.into_iter().enumerate() {
            let (face, index) = facelets[(n + orientation as usize) % 2];
            grid[face.index()][index] = color;
        }
    }

    grid
}

/// True when every face shows a single color.
///
/// Weaker than [`Cube::is_solved`]; meant for display consistency checks.
pub fn is_visually_solved(grid: &Facelets) -> bool {
    grid.iter()
        .all(|face| face.iter().all(|&color| color == face[0]))
}

/// Rebuilds the piece state behind a sticker grid.
///
/// This is the inverse of [`project`] and doubles as its validity check:
/// wrong centers, color counts other than nine, sticker combinations that no
/// piece carries, duplicated pieces, and twist, flip or parity violations
/// are all rejected with `InvalidArgument`.
pub fn from_facelets(grid: &Facelets) -> Result<Cube> {
    for face in Face::ALL {
        let center = grid[face.index()][CENTER];
        if center != Color::of_face(face) {
            return Err(CubeError::invalid(format!(
                "center of face {face} is {center:?}, expected {:?}",
                Color::of_face(face)
            )));
        }
    }

    let mut counts = [0usize; 6];
    for color in grid.iter().flatten() {
        counts[*color as usize] += 1;
    }
    if let Some((color, count)) = Color::ALL
        .iter()
        .zip(counts)
        .find(|(_, count)| *count != STICKERS_PER_FACE)
    {
        return Err(CubeError::invalid(format!(
            "{count} stickers of {color:?}, expected {STICKERS_PER_FACE}"
        )));
    }

    let mut corners = [(Corner::Urf, 0u8); NUM_CORNERS];
    for (slot, facelets) in CORNER_FACELETS.iter().enumerate() {
        let stickers = facelets.map(|facelet| sticker(grid, facelet));
        // orientation is where the U/D sticker sits among the slot's facelets
        let orientation = stickers
            .iter()
            .position(|&color| matches!(color.face(), Face::U | Face::D))
            .ok_or_else(|| {
                CubeError::invalid(format!(
                    "corner slot {} has no U or D sticker",
                    Corner::from_index(slot)
                ))
            })?;
        let clockwise = [stickers[(orientation + 1) % 3], stickers[(orientation + 2) % 3]];
        let piece = (0..NUM_CORNERS)
            .find(|&piece| {
                let colors = corner_colors(piece);
                colors[0] == stickers[orientation] && colors[1..] == clockwise
            })
            .ok_or_else(|| {
                CubeError::invalid(format!(
                    "corner slot {} shows colors no corner carries",
                    Corner::from_index(slot)
                ))
            })?;
        corners[slot] = (Corner::from_index(piece), orientation as u8);
    }

    let mut edges = [(Edge::Ur, 0u8); NUM_EDGES];
    for (slot, facelets) in EDGE_FACELETS.iter().enumerate() {
        let stickers = facelets.map(|facelet| sticker(grid, facelet));
        let found = (0..NUM_EDGES).find_map(|piece| {
            let colors = edge_colors(piece);
            if colors == stickers {
                Some((piece, 0))
            } else if colors == [stickers[1], stickers[0]] {
                Some((piece, 1))
            } else {
                None
            }
        });
        let (piece, orientation) = found.ok_or_else(|| {
            CubeError::invalid(format!(
                "edge slot {} shows colors no edge carries",
                Edge::from_index(slot)
            ))
        })?;
        edges[slot] = (Edge::from_index(piece), orientation);
    }

    Cube::from_parts(corners, edges)
}

/// Formats the sticker grid as an unfolded net, one letter per sticker.
///
/// U sits above F, the L F R B band runs across the middle, D sits below F.
pub fn format_net(grid: &Facelets) -> String {
    let face_row = |face: Face, row: usize| -> String {
        grid[face.index()][row * 3..row * 3 + 3]
            .iter()
            .map(|color| color.letter())
            .collect()
    };

    let mut output = String::new();
    for row in 0..3 {
        output.push_str("    ");
        output.push_str(&face_row(Face::U, row));
        output.push('\n');
    }
    for row in 0..3 {
        let band: Vec<String> = [Face::L, Face::F, Face::R, Face::B]
            .iter()
            .map(|&face| face_row(face, row))
            .collect();
        output.push_str(&band.join(" "));
        output.push('\n');
    }
    for row in 0..3 {
        output.push_str("    ");
        output.push_str(&face_row(Face::D, row));
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::notation::{R, U};
    use crate::moves::{compose, parse_sequence, Move};

    #[test]
    fn test_solved_projection_is_uniform() {
        let grid = project(&Cube::SOLVED);
        assert!(is_visually_solved(&grid));
        for face in Face::ALL {
            assert!(grid[face.index()]
                .iter()
                .all(|&color| color == Color::of_face(face)));
        }
    }

    #[test]
    fn test_every_move_keeps_nine_of_each_color() {
        for mv in Move::ALL {
            let grid = project(&mv.apply(&Cube::SOLVED));
            let mut counts = [0; 6];
            for color in grid.iter().flatten() {
                counts[*color as usize] += 1;
            }
            assert_eq!(counts, [9; 6], "{mv}");
            assert!(!is_visually_solved(&grid), "{mv}");
        }
    }

    #[test]
    fn test_u_turn_brings_right_colors_to_front() {
        let grid = project(&U.apply(&Cube::SOLVED));
        // clockwise U moves the R face's top row onto F
        assert_eq!(&grid[Face::F.index()][0..3], &[Color::Red; 3]);
        assert_eq!(&grid[Face::F.index()][3..9], &[Color::Green; 6]);
        assert_eq!(&grid[Face::L.index()][0..3], &[Color::Green; 3]);
    }

    #[test]
    fn test_r_turn_brings_front_colors_to_top() {
        let grid = project(&R.apply(&Cube::SOLVED));
        for index in [2, 5, 8] {
            assert_eq!(grid[Face::U.index()][index], Color::Green);
            assert_eq!(grid[Face::F.index()][index], Color::Yellow);
        }
    }

    #[test]
    fn test_from_facelets_inverts_projection() {
        let cube = compose(&parse_sequence("R U2 F' L D B2 R' U F2").unwrap());
        assert_eq!(from_facelets(&project(&cube)).unwrap(), cube);
        assert_eq!(from_facelets(&project(&Cube::SOLVED)).unwrap(), Cube::SOLVED);
    }

    #[test]
    fn test_from_facelets_rejects_moved_center() {
        let mut grid = project(&Cube::SOLVED);
        grid[Face::U.index()][CENTER] = Color::Red;
        grid[Face::R.index()][CENTER] = Color::White;
        assert!(matches!(
            from_facelets(&grid),
            Err(CubeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_facelets_rejects_bad_counts() {
        let mut grid = project(&Cube::SOLVED);
        grid[Face::U.index()][0] = Color::Blue;
        assert!(from_facelets(&grid).is_err());
    }

    #[test]
    fn test_from_facelets_rejects_flipped_edge() {
        // a single flipped edge keeps the color counts but is unreachable
        let mut grid = project(&Cube::SOLVED);
        grid[Face::U.index()][7] = Color::Green;
        grid[Face::F.index()][1] = Color::White;
        assert!(from_facelets(&grid).is_err());
    }

    #[test]
    fn test_from_facelets_rejects_twisted_corner() {
        let mut grid = project(&Cube::SOLVED);
        grid[Face::U.index()][8] = Color::Green;
        grid[Face::R.index()][0] = Color::White;
        grid[Face::F.index()][2] = Color::Red;
        assert!(from_facelets(&grid).is_err());
    }

    #[test]
    fn test_format_net_solved() {
        let net = format_net(&project(&Cube::SOLVED));
        let lines: Vec<&str> = net.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "    WWW");
        assert_eq!(lines[4], "OOO GGG RRR BBB");
        assert_eq!(lines[8], "    YYY");
    }
}
