//! Best-first (A*) search for short solutions.
//!
//! Key points:
//! - Admissible, consistent heuristic: one face turn moves four corners and
//!   four edges, so it can fix at most four of each
//! - Binary-heap frontier ordered by `g + h`, deeper nodes first on ties
//! - FxHashMap closed set keyed by the full piece state, keeping the best depth seen
//! - Successor pruning: never turn the parent's face again, and generate
//!   commuting opposite-face pairs in one order only
//! - Node arena with parent links, so frontier entries stay small and `Copy`
//!
//! The search is bounded by a depth limit and an expansion budget; running
//! out of either reports `SearchExhausted`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::error::{CubeError, Result};
use crate::moves::Move;
use crate::pieces::Cube;
use crate::solve::{Budget, SolveStep};
use crate::{Algorithm, CubeSolver};

/// God's number in the half-turn metric.
pub const DEFAULT_DEPTH_BOUND: u8 = 20;

pub const DEFAULT_MAX_EXPANSIONS: usize = 100_000;

/// Expansions between cancellation and deadline checks.
const CHECK_INTERVAL: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Deepest solution length considered.
    pub depth_bound: u8,
    /// Closed-set insertions allowed before giving up.
    pub max_expansions: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_bound: DEFAULT_DEPTH_BOUND,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn with_depth_bound(mut self, depth_bound: u8) -> Self {
        self.depth_bound = depth_bound;
        self
    }

    #[must_use]
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }
}

/// Lower bound on the moves needed to solve `cube`.
pub fn heuristic(cube: &Cube) -> u8 {
    let corners = cube.misplaced_corners().div_ceil(4);
    let edges = cube.misplaced_edges().div_ceil(4);
    corners.max(edges) as u8
}

/// Whether `candidate` may follow `previous` in a generated sequence.
fn is_allowed(previous: Option<Move>, candidate: Move) -> bool {
    match previous {
        None => true,
        Some(previous) if previous.face == candidate.face => false,
        // opposite faces commute; keep only the descending order
        Some(previous) => {
            previous.face.axis() != candidate.face.axis() || candidate.face < previous.face
        }
    }
}

/// A frontier entry. Ordered so that `BinaryHeap` pops the lowest `f` first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frontier {
    f: u8,
    g: u8,
    cube: Cube,
    /// Arena index of the node that reached `cube`; `None` for the start.
    node: Option<usize>,
    last: Option<Move>,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| self.cube.cmp(&other.cube))
            .then_with(|| self.last.cmp(&other.last))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Walks parent links back to the start.
fn reconstruct(arena: &[(Option<usize>, Move)], mut node: Option<usize>) -> Vec<Move> {
    let mut moves = Vec::new();
    while let Some(index) = node {
        let (parent, mv) = arena[index];
        moves.push(mv);
        node = parent;
    }
    moves.reverse();
    moves
}

/// Heuristic best-first solver.
#[derive(Clone, Debug, Default)]
pub struct SearchSolver {
    config: SearchConfig,
}

impl SearchSolver {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Finds a shortest solution of at most `depth_bound` moves.
    pub fn search(&self, cube: &Cube, budget: &Budget) -> Result<Vec<Move>> {
        budget.check()?;

        let SearchConfig {
            depth_bound,
            max_expansions,
        } = self.config;

        let mut frontier = BinaryHeap::new();
        let mut closed: FxHashMap<Cube, u8> = FxHashMap::default();
        let mut arena: Vec<(Option<usize>, Move)> = Vec::new();
        let mut expanded = 0usize;

        let start_h = heuristic(cube);
        if start_h <= depth_bound {
            frontier.push(Frontier {
                f: start_h,
                g: 0,
                cube: *cube,
                node: None,
                last: None,
            });
        }

        while let Some(entry) = frontier.pop() {
            if entry.cube.is_solved() {
                let moves = reconstruct(&arena, entry.node);
                info!(
                    "Search found a {}-move solution after {expanded} expansions",
                    moves.len()
                );
                return Ok(moves);
            }

            if closed
                .get(&entry.cube)
                .is_some_and(|&seen| seen <= entry.g)
            {
                continue;
            }
            closed.insert(entry.cube, entry.g);

            expanded += 1;
            if expanded > max_expansions {
                break;
            }
            if expanded % CHECK_INTERVAL == 0 {
                budget.check()?;
                debug!(
                    "Search: {expanded} expanded, {} queued, f = {}",
                    frontier.len(),
                    entry.f
                );
            }

            if entry.g >= depth_bound {
                continue;
            }

            let g = entry.g + 1;
            for mv in Move::ALL {
                if !is_allowed(entry.last, mv) {
                    continue;
                }
                let next = mv.apply(&entry.cube);
                if closed.get(&next).is_some_and(|&seen| seen <= g) {
                    continue;
                }
                let f = g + heuristic(&next);
                if f > depth_bound {
                    continue;
                }
                arena.push((entry.node, mv));
                frontier.push(Frontier {
                    f,
                    g,
                    cube: next,
                    node: Some(arena.len() - 1),
                    last: Some(mv),
                });
            }
        }

        debug!("Search exhausted after {expanded} expansions");
        Err(CubeError::SearchExhausted {
            depth_bound,
            expanded,
        })
    }

    /// Runs [`SearchSolver::search`] and records a snapshot after every move.
    pub fn solve(&self, cube: &Cube, budget: &Budget) -> Result<Vec<SolveStep>> {
        let moves = self.search(cube, budget)?;
        let count = moves.len();
        let mut state = *cube;
        Ok(moves
            .into_iter()
            .enumerate()
            .map(|(index, mv)| {
                state = mv.apply(&state);
                SolveStep {
                    mv,
                    cube: state,
                    description: format!("Search: move {} of {count}", index + 1),
                }
            })
            .collect())
    }
}

impl CubeSolver for SearchSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Search
    }

    fn solve_steps(&self, cube: &Cube, budget: &Budget) -> Result<Vec<SolveStep>> {
        self.solve(cube, budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::notation::*;
    use crate::moves::{apply_sequence, compose, parse_sequence};

    fn search(cube: &Cube) -> Result<Vec<Move>> {
        SearchSolver::default().search(cube, &Budget::unlimited())
    }

    #[test]
    fn test_heuristic_is_zero_only_when_solved() {
        assert_eq!(heuristic(&Cube::SOLVED), 0);
        for mv in Move::ALL {
            assert_eq!(heuristic(&mv.apply(&Cube::SOLVED)), 1, "{mv}");
        }
    }

    #[test]
    fn test_heuristic_never_overestimates_short_scrambles() {
        let cube = compose(&[R, U]);
        assert!(heuristic(&cube) <= 2);
        let cube = compose(&[R, U, F]);
        assert!(heuristic(&cube) <= 3);
    }

    #[test]
    fn test_pruning_rules() {
        assert!(is_allowed(None, R));
        assert!(!is_allowed(Some(R), R2));
        assert!(!is_allowed(Some(R), RI));
        assert!(is_allowed(Some(L), R));
        assert!(!is_allowed(Some(R), L));
        assert!(is_allowed(Some(D), U));
        assert!(!is_allowed(Some(U), D));
        assert!(is_allowed(Some(U), F));
    }

    #[test]
    fn test_frontier_pops_lowest_f_first() {
        let mut heap = BinaryHeap::new();
        for (f, g) in [(5, 1), (3, 0), (3, 2), (4, 4)] {
            heap.push(Frontier {
                f,
                g,
                cube: Cube::SOLVED,
                node: None,
                last: None,
            });
        }
        let order: Vec<(u8, u8)> = std::iter::from_fn(|| heap.pop())
            .map(|entry| (entry.f, entry.g))
            .collect();
        assert_eq!(order, vec![(3, 2), (3, 0), (4, 4), (5, 1)]);
    }

    #[test]
    fn test_solved_cube_needs_no_moves() {
        assert!(search(&Cube::SOLVED).unwrap().is_empty());
    }

    #[test]
    fn test_single_moves_are_undone() {
        for mv in Move::ALL {
            let solution = search(&mv.apply(&Cube::SOLVED)).unwrap();
            assert_eq!(solution, vec![mv.inverse()]);
        }
    }

    #[test_log::test]
    fn test_short_scrambles_are_solved_optimally() {
        for (scramble, optimal) in [("R U", 2), ("F2 D'", 2), ("R U F", 3), ("L B' U2 R", 4)] {
            let cube = compose(&parse_sequence(scramble).unwrap());
            let solution = search(&cube).unwrap();
            assert!(apply_sequence(&cube, &solution).is_solved(), "{scramble}");
            assert_eq!(solution.len(), optimal, "{scramble}");
        }
    }

    #[test]
    fn test_depth_bound_exhausts() {
        let cube = compose(&parse_sequence("R U F L").unwrap());
        let solver = SearchSolver::new(SearchConfig::default().with_depth_bound(2));
        assert!(matches!(
            solver.search(&cube, &Budget::unlimited()),
            Err(CubeError::SearchExhausted { depth_bound: 2, .. })
        ));
    }

    #[test]
    fn test_expansion_budget_exhausts() {
        let cube = compose(&parse_sequence("R U F L D B R2 U' F2").unwrap());
        let solver = SearchSolver::new(SearchConfig::default().with_max_expansions(10));
        assert!(matches!(
            solver.search(&cube, &Budget::unlimited()),
            Err(CubeError::SearchExhausted { expanded: 11, .. })
        ));
    }

    #[test]
    fn test_steps_end_solved() {
        let cube = compose(&parse_sequence("B2 L'").unwrap());
        let steps = SearchSolver::default()
            .solve(&cube, &Budget::unlimited())
            .unwrap();
        assert_eq!(steps.len(), 2);
        assert!(steps[1].cube.is_solved());
        assert_eq!(steps[0].description, "Search: move 1 of 2");
    }
}
