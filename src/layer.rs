//! Layer-by-layer solver.
//!
//! Six stages run in order: the D cross, the D corners, the middle edges,
//! then the U layer in three passes (flip edges, twist corners, permute).
//! Each stage looks at the current state, builds a fixed algorithm for every
//! unsolved piece, and applies the shortest one. Algorithms are written with
//! F as the front face and relabelled for the other three sides.
//!
//! Every application must strictly shrink the stage's progress measure, and
//! each stage is bounded by a small number of applications. A stage that
//! stalls reports `InternalInconsistency` instead of looping.

use log::{debug, trace};

use crate::error::{CubeError, Result};
use crate::moves::notation::*;
use crate::moves::{apply_sequence, in_view, invert_sequence, simplify_with_origins, Move};
use crate::pieces::{permutation_parity, Corner, Cube, Edge};
use crate::solve::{Budget, SolveStep};
use crate::{Algorithm, CubeSolver};

/// Cross edges by view: the edge below the front face.
const CROSS_EDGES: [Edge; 4] = [Edge::Df, Edge::Dr, Edge::Db, Edge::Dl];

/// First-layer corners by view: the corner below the front-right edge.
const FIRST_LAYER_CORNERS: [Corner; 4] = [Corner::Dfr, Corner::Drb, Corner::Dbl, Corner::Dlf];

/// Middle edges by view: the front-right edge.
const MIDDLE_EDGES: [Edge; 4] = [Edge::Fr, Edge::Br, Edge::Bl, Edge::Fl];

/// Top edges by view: the edge above the front face.
const EDGES_ABOVE: [Edge; 4] = [Edge::Uf, Edge::Ur, Edge::Ub, Edge::Ul];

/// Top corners by view: the corner above the front-right edge.
const CORNERS_ABOVE: [Corner; 4] = [Corner::Urf, Corner::Ubr, Corner::Ulb, Corner::Ufl];

/// Adjustments of the U face, indexed by quarter turns.
const AUF: [&[Move]; 4] = [&[], &[U], &[U2], &[UI]];

/// Drops a flipped edge from UF into DF.
const CROSS_FLIPPED: [Move; 4] = [UI, RI, F, R];

/// Lifts the front-right corner into the U layer.
const CORNER_POP: [Move; 3] = [R, U, RI];

/// Inserts the URF corner into DFR, by the corner's orientation.
const CORNER_INSERT: [&[Move]; 3] = [&[R, U2, RI, UI, R, U, RI], &[R, U, RI], &[FI, UI, F]];

/// Inserts into FR the edge at UF whose front sticker faces front.
const EDGE_INSERT_RIGHT: [Move; 8] = [U, R, UI, RI, UI, FI, U, F];

/// Inserts into FR the edge at UR whose right sticker faces right.
const EDGE_INSERT_LEFT: [Move; 8] = [UI, FI, U, F, U, R, UI, RI];

/// Turns a horizontal line of oriented top edges into a cross.
const LINE_FLIP: [Move; 6] = [F, R, U, RI, UI, FI];

/// Turns an L of oriented top edges (at UL and UB) into a cross.
const ANGLE_FLIP: [Move; 6] = [F, U, R, UI, RI, FI];

/// Two repetitions twist the URF corner one step. The lower layers stay
/// disturbed until every top corner is oriented.
const CORNER_TWIST: [Move; 4] = [RI, DI, R, D];

/// Inverse of [`CORNER_TWIST`]; two repetitions twist the URF corner the other way.
const CORNER_UNTWIST: [Move; 4] = [DI, RI, D, R];

/// Three-cycle of top corners.
const CORNER_CYCLE: [Move; 9] = [RI, F, RI, B2, R, FI, RI, B2, R2];

/// Three-cycle of top edges.
const EDGE_CYCLE: [Move; 11] = [R, UI, R, U, R, U, R, UI, RI, UI, R2];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerConfig {
    /// Merge adjacent turns of the same face in the finished solution.
    pub simplify: bool,
}

impl LayerConfig {
    #[must_use]
    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self { simplify: true }
    }
}

/// The six stages, in solving order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Cross,
    FirstLayer,
    SecondLayer,
    LastLayerCross,
    LastLayerOrient,
    LastLayerPermute,
}

/// One algorithm chosen by a stage, and what it is for.
struct Application {
    moves: Vec<Move>,
    /// The piece or piece group the algorithm serves.
    piece: String,
    /// Human-readable purpose, e.g. "place DF edge".
    goal: String,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Cross,
        Stage::FirstLayer,
        Stage::SecondLayer,
        Stage::LastLayerCross,
        Stage::LastLayerOrient,
        Stage::LastLayerPermute,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Stage::Cross => "Cross",
            Stage::FirstLayer => "First layer",
            Stage::SecondLayer => "Second layer",
            Stage::LastLayerCross => "Last layer cross",
            Stage::LastLayerOrient => "Last layer orientation",
            Stage::LastLayerPermute => "Last layer permutation",
        }
    }

    /// Upper bound on algorithm applications within the stage.
    const fn max_applications(self) -> usize {
        match self {
            Stage::LastLayerPermute => 6,
            _ => 4,
        }
    }

    /// True when this stage's own goal holds, regardless of earlier stages.
    fn goal_holds(self, cube: &Cube) -> bool {
        match self {
            Stage::Cross => CROSS_EDGES.iter().all(|&edge| cube.edge_is_solved(edge)),
            Stage::FirstLayer => FIRST_LAYER_CORNERS
                .iter()
                .all(|&corner| cube.corner_is_solved(corner)),
            Stage::SecondLayer => MIDDLE_EDGES.iter().all(|&edge| cube.edge_is_solved(edge)),
            Stage::LastLayerCross => flipped_top_edges(cube) == 0,
            Stage::LastLayerOrient => twisted_top_corners(cube) == 0,
            Stage::LastLayerPermute => cube.is_solved(),
        }
    }

    /// True when the goals of this stage and of every earlier stage hold.
    pub fn is_complete(self, cube: &Cube) -> bool {
        Stage::ALL[..=self as usize]
            .iter()
            .all(|stage| stage.goal_holds(cube))
    }

    /// Progress measure; zero exactly when the stage has nothing left to do.
    fn remaining(self, cube: &Cube) -> Result<usize> {
        Ok(match self {
            Stage::Cross => unsolved(&CROSS_EDGES, |&edge| cube.edge_is_solved(edge)).count(),
            Stage::FirstLayer => {
                unsolved(&FIRST_LAYER_CORNERS, |&corner| cube.corner_is_solved(corner)).count()
            }
            Stage::SecondLayer => {
                unsolved(&MIDDLE_EDGES, |&edge| cube.edge_is_solved(edge)).count()
            }
            Stage::LastLayerCross => flipped_top_edges(cube),
            Stage::LastLayerOrient => twisted_top_corners(cube),
            Stage::LastLayerPermute => {
                let (auf, wrong) = permutation_frame(cube)?;
                2 * wrong + usize::from(auf != 0)
            }
        })
    }

    fn next_application(self, cube: &Cube) -> Result<Option<Application>> {
        match self {
            Stage::Cross => cheapest(
                cube,
                unsolved(&CROSS_EDGES, |&edge| cube.edge_is_solved(edge)),
                cross_edge,
            ),
            Stage::FirstLayer => cheapest(
                cube,
                unsolved(&FIRST_LAYER_CORNERS, |&corner| cube.corner_is_solved(corner)),
                first_layer_corner,
            ),
            Stage::SecondLayer => cheapest(
                cube,
                unsolved(&MIDDLE_EDGES, |&edge| cube.edge_is_solved(edge)),
                middle_edge,
            ),
            Stage::LastLayerCross => top_cross(cube),
            Stage::LastLayerOrient => Ok(top_corner_twist(cube)),
            Stage::LastLayerPermute => top_permutation(cube),
        }
    }

    fn inconsistency(self, piece: impl Into<String>, detail: impl Into<String>) -> CubeError {
        CubeError::InternalInconsistency {
            stage: self.name(),
            piece: piece.into(),
            detail: detail.into(),
        }
    }
}

/// Views whose target piece is not yet home.
fn unsolved<'a, T>(
    targets: &'a [T],
    solved: impl Fn(&T) -> bool + 'a,
) -> impl Iterator<Item = usize> + 'a {
    targets
        .iter()
        .enumerate()
        .filter(move |(_, target)| !solved(*target))
        .map(|(view, _)| view)
}

/// The shortest application among `views`, the earliest view on ties.
///
/// Placing one piece never disturbs another solved piece of the same stage,
/// so any unsolved piece may go next.
fn cheapest(
    cube: &Cube,
    views: impl Iterator<Item = usize>,
    build: fn(&Cube, usize) -> Result<Application>,
) -> Result<Option<Application>> {
    let mut best: Option<Application> = None;
    for view in views {
        let application = build(cube, view)?;
        if best
            .as_ref()
            .map_or(true, |best| application.moves.len() < best.moves.len())
        {
            best = Some(application);
        }
    }
    Ok(best)
}

fn with_auf(cube: &Cube, quarters: usize) -> Cube {
    apply_sequence(cube, AUF[quarters])
}

/// The U adjustment that carries the edge in top slot `from` to top slot `to`.
fn align_edge(from: Edge, to: Edge) -> Option<&'static [Move]> {
    (0..4)
        .find(|&quarters| with_auf(&Cube::SOLVED, quarters).edge_at(to).0 == from)
        .map(|quarters| AUF[quarters])
}

/// The U adjustment that carries the corner in top slot `from` to top slot `to`.
fn align_corner(from: Corner, to: Corner) -> Option<&'static [Move]> {
    (0..4)
        .find(|&quarters| with_auf(&Cube::SOLVED, quarters).corner_at(to).0 == from)
        .map(|quarters| AUF[quarters])
}

/// Accumulates an algorithm while tracking the state it leads to.
struct Builder {
    cube: Cube,
    moves: Vec<Move>,
}

impl Builder {
    fn new(cube: &Cube) -> Self {
        Self {
            cube: *cube,
            moves: Vec::new(),
        }
    }

    fn push(&mut self, moves: &[Move]) {
        self.cube = apply_sequence(&self.cube, moves);
        self.moves.extend_from_slice(moves);
    }

    fn finish(self, piece: String, goal: String) -> Application {
        Application {
            moves: self.moves,
            piece,
            goal,
        }
    }
}

fn cross_edge(cube: &Cube, view: usize) -> Result<Application> {
    let target = CROSS_EDGES[view];
    let piece = format!("{target} edge");
    let mut builder = Builder::new(cube);

    let (slot, _) = builder.cube.locate_edge(target);
    if let Some(bottom) = CROSS_EDGES.iter().position(|&edge| edge == slot) {
        builder.push(&in_view(&[F2], bottom));
    } else if let Some(middle) = MIDDLE_EDGES.iter().position(|&edge| edge == slot) {
        builder.push(&in_view(&CORNER_POP, middle));
    }

    let (slot, _) = builder.cube.locate_edge(target);
    let auf = align_edge(slot, EDGES_ABOVE[view]).ok_or_else(|| {
        Stage::Cross.inconsistency(&piece, format!("cannot bring {slot} over the cross"))
    })?;
    builder.push(auf);

    let (_, orientation) = builder.cube.locate_edge(target);
    if orientation == 0 {
        builder.push(&in_view(&[F2], view));
    } else {
        builder.push(&in_view(&CROSS_FLIPPED, view));
    }

    let goal = format!("place {piece}");
    Ok(builder.finish(piece, goal))
}

fn first_layer_corner(cube: &Cube, view: usize) -> Result<Application> {
    let target = FIRST_LAYER_CORNERS[view];
    let piece = format!("{target} corner");
    let mut builder = Builder::new(cube);

    let (slot, _) = builder.cube.locate_corner(target);
    if let Some(bottom) = FIRST_LAYER_CORNERS.iter().position(|&corner| corner == slot) {
        builder.push(&in_view(&CORNER_POP, bottom));
    }

    let (slot, _) = builder.cube.locate_corner(target);
    let auf = align_corner(slot, CORNERS_ABOVE[view]).ok_or_else(|| {
        Stage::FirstLayer.inconsistency(&piece, format!("cannot bring {slot} over its slot"))
    })?;
    builder.push(auf);

    let (_, orientation) = builder.cube.locate_corner(target);
    builder.push(&in_view(CORNER_INSERT[orientation as usize], view));

    let goal = format!("insert {piece}");
    Ok(builder.finish(piece, goal))
}

fn middle_edge(cube: &Cube, view: usize) -> Result<Application> {
    let target = MIDDLE_EDGES[view];
    let piece = format!("{target} edge");
    let mut builder = Builder::new(cube);

    let (slot, _) = builder.cube.locate_edge(target);
    if let Some(middle) = MIDDLE_EDGES.iter().position(|&edge| edge == slot) {
        builder.push(&in_view(&EDGE_INSERT_RIGHT, middle));
    }

    // edge orientation is measured against F/B, so odd views see it flipped
    let (slot, orientation) = builder.cube.locate_edge(target);
    let faces_front = (orientation as usize ^ (view & 1)) == 1;
    let (above, insert) = if faces_front {
        (EDGES_ABOVE[view], &EDGE_INSERT_RIGHT)
    } else {
        (EDGES_ABOVE[(view + 1) % 4], &EDGE_INSERT_LEFT)
    };
    let auf = align_edge(slot, above).ok_or_else(|| {
        Stage::SecondLayer.inconsistency(&piece, format!("cannot bring {slot} to {above}"))
    })?;
    builder.push(auf);
    builder.push(&in_view(insert, view));

    let goal = format!("insert {piece}");
    Ok(builder.finish(piece, goal))
}

fn flipped_top_edges(cube: &Cube) -> usize {
    Edge::TOP
        .iter()
        .filter(|&&slot| cube.edge_at(slot).1 != 0)
        .count()
}

fn twisted_top_corners(cube: &Cube) -> usize {
    Corner::TOP
        .iter()
        .filter(|&&slot| cube.corner_at(slot).1 != 0)
        .count()
}

fn flipped_top_slots(cube: &Cube) -> Vec<Edge> {
    Edge::TOP
        .into_iter()
        .filter(|&slot| cube.edge_at(slot).1 != 0)
        .collect()
}

fn top_cross(cube: &Cube) -> Result<Option<Application>> {
    let piece = String::from("last layer edges");
    let flipped = flipped_top_edges(cube);
    if flipped == 0 {
        return Ok(None);
    }

    let mut builder = Builder::new(cube);
    if flipped == 4 {
        builder.push(&LINE_FLIP);
    } else {
        let mut found = false;
        for auf in AUF {
            let adjusted = apply_sequence(cube, auf);
            let slots = flipped_top_slots(&adjusted);
            if slots == [Edge::Uf, Edge::Ub] {
                builder.push(auf);
                builder.push(&LINE_FLIP);
                found = true;
                break;
            }
            if slots == [Edge::Ur, Edge::Uf] {
                builder.push(auf);
                builder.push(&ANGLE_FLIP);
                found = true;
                break;
            }
        }
        if !found {
            return Err(Stage::LastLayerCross.inconsistency(
                piece,
                format!("{flipped} flipped top edges match no pattern"),
            ));
        }
    }

    Ok(Some(builder.finish(piece, String::from("orient last layer edges"))))
}

fn top_corner_twist(cube: &Cube) -> Option<Application> {
    let (auf, adjusted) = (0..4)
        .map(|quarters| (AUF[quarters], with_auf(cube, quarters)))
        .find(|(_, adjusted)| adjusted.corner_at(Corner::Urf).1 != 0)?;

    let (piece, orientation) = adjusted.corner_at(Corner::Urf);
    let twist = if orientation == 1 {
        &CORNER_TWIST
    } else {
        &CORNER_UNTWIST
    };

    let mut builder = Builder::new(cube);
    builder.push(auf);
    builder.push(twist);
    builder.push(twist);

    let piece = format!("{piece} corner");
    let goal = format!("twist {piece}");
    Some(builder.finish(piece, goal))
}

fn wrong_top_corners(cube: &Cube) -> usize {
    Corner::TOP
        .iter()
        .filter(|&&slot| cube.corner_at(slot).0 != slot)
        .count()
}

fn wrong_top_edges(cube: &Cube) -> usize {
    Edge::TOP
        .iter()
        .filter(|&&slot| cube.edge_at(slot).0 != slot)
        .count()
}

/// The U adjustment under which the top corners form an even permutation
/// with the fewest misplaced top pieces, and that count.
///
/// U turns alternate the parity of the top corners, so two of the four
/// adjustments always qualify.
fn permutation_frame(cube: &Cube) -> Result<(usize, usize)> {
    (0..4)
        .filter_map(|quarters| {
            let adjusted = with_auf(cube, quarters);
            let top = Corner::TOP.map(|slot| adjusted.corner_at(slot).0 as u8);
            (permutation_parity(&top) == 0)
                .then(|| (quarters, wrong_top_corners(&adjusted) + wrong_top_edges(&adjusted)))
        })
        .min_by_key(|&(_, wrong)| wrong)
        .ok_or_else(|| {
            Stage::LastLayerPermute.inconsistency(
                "last layer corners",
                "no U adjustment gives an even corner permutation",
            )
        })
}

fn top_permutation(cube: &Cube) -> Result<Option<Application>> {
    let (quarters, wrong) = permutation_frame(cube)?;
    if wrong == 0 {
        if quarters == 0 {
            return Ok(None);
        }
        return Ok(Some(Application {
            moves: AUF[quarters].to_vec(),
            piece: String::from("last layer"),
            goal: String::from("align last layer"),
        }));
    }

    let adjusted = with_auf(cube, quarters);
    let corners = wrong_top_corners(&adjusted) > 0;
    let (algorithm, piece): (&[Move], &str) = if corners {
        (&CORNER_CYCLE[..], "last layer corners")
    } else {
        (&EDGE_CYCLE[..], "last layer edges")
    };
    let count_wrong = |state: &Cube| {
        if corners {
            wrong_top_corners(state)
        } else {
            wrong_top_edges(state)
        }
    };
    let goal_count = if count_wrong(&adjusted) == 3 { 0 } else { 3 };

    let inverse = invert_sequence(algorithm);
    let variant = (0..4)
        .flat_map(|view| [in_view(algorithm, view), in_view(&inverse, view)])
        .find(|variant| {
            count_wrong(&with_auf(&apply_sequence(cube, variant), quarters)) == goal_count
        })
        .ok_or_else(|| {
            Stage::LastLayerPermute.inconsistency(
                piece,
                format!("no cycle leaves {goal_count} of them misplaced"),
            )
        })?;

    let goal = format!("cycle {piece}");
    Ok(Some(Application {
        moves: variant,
        piece: piece.to_string(),
        goal,
    }))
}

/// Applies one stage to `cube`, appending `(move, description)` pairs.
fn run_stage(
    stage: Stage,
    cube: &mut Cube,
    moves: &mut Vec<(Move, String)>,
    budget: &Budget,
) -> Result<()> {
    let mut remaining = stage.remaining(cube)?;
    let mut applications = 0;

    while let Some(application) = stage.next_application(cube)? {
        budget.check()?;
        if applications == stage.max_applications() {
            return Err(stage.inconsistency(
                application.piece,
                format!("still unfinished after {applications} algorithms"),
            ));
        }
        applications += 1;

        let next = apply_sequence(cube, &application.moves);
        let after = stage.remaining(&next)?;
        if after >= remaining {
            return Err(stage.inconsistency(
                application.piece,
                format!("progress measure went from {remaining} to {after}"),
            ));
        }
        trace!(
            "{}: {} with {} moves",
            stage.name(),
            application.goal,
            application.moves.len()
        );

        let count = application.moves.len();
        for (index, mv) in application.moves.into_iter().enumerate() {
            let description = format!("{}: {} ({}/{count})", stage.name(), application.goal, index + 1);
            moves.push((mv, description));
        }
        *cube = next;
        remaining = after;
    }

    if !stage.is_complete(cube) {
        return Err(stage.inconsistency(
            "cube",
            "stage finished but an earlier layer is disturbed",
        ));
    }
    debug!("{} stage done after {applications} algorithms", stage.name());
    Ok(())
}

/// Replays `(move, description)` pairs from `start`, recording a snapshot after each move.
fn into_steps(start: &Cube, moves: Vec<(Move, String)>) -> Vec<SolveStep> {
    let mut cube = *start;
    moves
        .into_iter()
        .map(|(mv, description)| {
            cube = mv.apply(&cube);
            SolveStep {
                mv,
                cube,
                description,
            }
        })
        .collect()
}

/// Deterministic layer-by-layer solver.
#[derive(Clone, Debug, Default)]
pub struct LayerSolver {
    config: LayerConfig,
}

impl LayerSolver {
    pub fn new(config: LayerConfig) -> Self {
        Self { config }
    }

    /// Runs all six stages on `cube`.
    pub fn solve(&self, cube: &Cube, budget: &Budget) -> Result<Vec<SolveStep>> {
        budget.check()?;
        let mut state = *cube;
        let mut moves = Vec::new();
        for stage in Stage::ALL {
            run_stage(stage, &mut state, &mut moves, budget)?;
        }

        let raw = moves.len();
        if self.config.simplify {
            moves = simplify_with_origins(&moves.iter().map(|(mv, _)| *mv).collect::<Vec<_>>())
                .into_iter()
                .map(|(mv, origin)| (mv, moves[origin].1.clone()))
                .collect();
        }
        debug!("Layer solution: {raw} moves, {} after simplification", moves.len());

        Ok(into_steps(cube, moves))
    }
}

impl CubeSolver for LayerSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::LayerByLayer
    }

    fn solve_steps(&self, cube: &Cube, budget: &Budget) -> Result<Vec<SolveStep>> {
        self.solve(cube, budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{compose, parse_sequence};
    use crate::scramble::{scramble, seeded_rng};

    fn solve_moves(cube: &Cube) -> Vec<Move> {
        LayerSolver::default()
            .solve(cube, &Budget::unlimited())
            .unwrap()
            .into_iter()
            .map(|step| step.mv)
            .collect()
    }

    #[test]
    fn test_solved_cube_needs_no_moves() {
        assert!(solve_moves(&Cube::SOLVED).is_empty());
    }

    #[test]
    fn test_view_tables_agree() {
        for view in 0..4 {
            let side = F.in_view(view).face;
            assert!(CROSS_EDGES[view].name().contains(side.symbol()));
            assert!(EDGES_ABOVE[view].name().contains(side.symbol()));
            assert!(FIRST_LAYER_CORNERS[view].name().contains(side.symbol()));
            assert!(CORNERS_ABOVE[view].name().contains(side.symbol()));
            assert!(MIDDLE_EDGES[view].name().contains(side.symbol()));
        }
    }

    #[test]
    fn test_single_moves_are_solved() {
        for mv in Move::ALL {
            let cube = mv.apply(&Cube::SOLVED);
            let solution = solve_moves(&cube);
            assert!(apply_sequence(&cube, &solution).is_solved(), "{mv}");
        }
    }

    #[test_log::test]
    fn test_random_scrambles_are_solved() {
        let mut rng = seeded_rng(42);
        for _ in 0..200 {
            let (cube, _) = scramble(25, &mut rng).unwrap();
            let steps = LayerSolver::default()
                .solve(&cube, &Budget::unlimited())
                .unwrap();
            let last = steps.last().map(|step| step.cube).unwrap_or(cube);
            assert!(last.is_solved());
        }
    }

    #[test]
    fn test_each_stage_completes_in_order() {
        let cube = compose(&parse_sequence("F2 D' L U2 B R' D2 F' U L2 B' R2 U'").unwrap());
        let mut state = cube;
        let mut moves = Vec::new();
        for stage in Stage::ALL {
            run_stage(stage, &mut state, &mut moves, &Budget::unlimited()).unwrap();
            assert!(stage.is_complete(&state), "{}", stage.name());
        }
        assert!(state.is_solved());
    }

    #[test]
    fn test_snapshots_follow_moves() {
        let cube = compose(&parse_sequence("R U F' L2 D B'").unwrap());
        let steps = LayerSolver::default()
            .solve(&cube, &Budget::unlimited())
            .unwrap();
        let mut state = cube;
        for step in &steps {
            state = step.mv.apply(&state);
            assert_eq!(state, step.cube);
        }
    }

    #[test]
    fn test_descriptions_name_stage_and_piece() {
        let cube = compose(&parse_sequence("D").unwrap());
        let steps = LayerSolver::new(LayerConfig::default().with_simplify(false))
            .solve(&cube, &Budget::unlimited())
            .unwrap();
        assert!(steps[0].description.starts_with("Cross: place DF edge (1/"));
    }

    #[test]
    fn test_simplification_never_lengthens() {
        let mut rng = seeded_rng(3);
        for _ in 0..20 {
            let (cube, _) = scramble(20, &mut rng).unwrap();
            let raw = LayerSolver::new(LayerConfig::default().with_simplify(false))
                .solve(&cube, &Budget::unlimited())
                .unwrap();
            let simplified = LayerSolver::default()
                .solve(&cube, &Budget::unlimited())
                .unwrap();
            assert!(simplified.len() <= raw.len());
            assert!(simplified.last().unwrap().cube.is_solved());
        }
    }

    #[test]
    fn test_mean_solution_length_over_seeded_batch() {
        let mut rng = seeded_rng(2024);
        let count = 300;
        let total: usize = (0..count)
            .map(|_| {
                let (cube, _) = scramble(25, &mut rng).unwrap();
                solve_moves(&cube).len()
            })
            .sum();
        let mean = total as f64 / count as f64;
        assert!(mean <= 120.0, "mean solution length {mean}");
    }

    #[test]
    fn test_corner_twist_takes_eight_moves_either_way() {
        let mut rng = seeded_rng(11);
        for _ in 0..50 {
            let (cube, _) = scramble(25, &mut rng).unwrap();
            let Some(application) = top_corner_twist(&cube) else {
                continue;
            };
            assert!(application.moves.len() <= 9);
            let after = apply_sequence(&cube, &application.moves);
            assert_eq!(twisted_top_corners(&after), twisted_top_corners(&cube) - 1);
        }
    }

    #[test]
    fn test_untwist_matches_four_twists() {
        assert_eq!(invert_sequence(&CORNER_TWIST), CORNER_UNTWIST.to_vec());
        assert_eq!(
            compose(&CORNER_TWIST.repeat(4)),
            compose(&CORNER_UNTWIST.repeat(2))
        );
    }

    #[test]
    fn test_cross_picks_shortest_placement() {
        let cube = compose(&parse_sequence("D R F'").unwrap());
        let first = Stage::Cross.next_application(&cube).unwrap().unwrap();
        let before = Stage::Cross.remaining(&cube).unwrap();
        let placed = apply_sequence(&cube, &first.moves);
        assert_eq!(Stage::Cross.remaining(&placed).unwrap(), before - 1);
        for view in unsolved(&CROSS_EDGES, |&edge| cube.edge_is_solved(edge)) {
            assert!(first.moves.len() <= cross_edge(&cube, view).unwrap().moves.len());
        }
    }

    #[test]
    fn test_cancelled_budget_stops_solver() {
        let budget = Budget::unlimited();
        budget.cancel_token().cancel();
        let cube = compose(&parse_sequence("R U").unwrap());
        assert_eq!(
            LayerSolver::default().solve(&cube, &budget),
            Err(CubeError::Cancelled)
        );
    }
}
