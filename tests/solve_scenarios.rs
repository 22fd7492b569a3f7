//! End-to-end solve scenarios through the public boundary.

use std::time::Duration;

use cubesolve::grid::{from_facelets, project, Color};
use cubesolve::moves::notation::*;
use cubesolve::moves::{apply_sequence, compose, format_sequence, parse_sequence};
use cubesolve::search::SearchConfig;
use cubesolve::{
    is_solved, scramble, scramble_with_seed, solve, spawn_solve, step_forward, Algorithm,
    CubeError, Cube, Face, SolveOptions,
};

fn solve_with(cube: &Cube, algorithm: Algorithm) -> cubesolve::SolveResult {
    solve(cube, &SolveOptions::new(algorithm)).unwrap()
}

#[test]
fn test_commutator_order_is_discovered() {
    let commutator = [R, U, RI, UI];
    let mut cube = Cube::SOLVED;
    let mut repetitions = 0;
    loop {
        cube = apply_sequence(&cube, &commutator);
        repetitions += 1;
        if cube.is_solved() || repetitions > 1260 {
            break;
        }
    }
    assert_eq!(repetitions, 6);
    assert!(!compose(&[commutator; 4].concat()).is_solved());
}

#[test_log::test]
fn test_solved_cube_has_empty_solution() {
    for algorithm in [Algorithm::LayerByLayer, Algorithm::Search] {
        let result = solve_with(&Cube::SOLVED, algorithm);
        assert!(result.moves.is_empty());
        assert!(result.steps.is_empty());
        assert_eq!(result.metrics.move_count, 0);
        assert_eq!(result.metrics.algorithm, algorithm);
        assert!(is_solved(&result.final_state()));
    }
}

#[test_log::test]
fn test_single_turn_is_solved_by_both() {
    let cube = compose(&[R]);

    let search = solve_with(&cube, Algorithm::Search);
    assert_eq!(search.moves, vec![RI]);

    let layer = solve_with(&cube, Algorithm::LayerByLayer);
    assert!(apply_sequence(&cube, &layer.moves).is_solved());
    assert!(layer.moves.len() >= search.moves.len());
}

#[test_log::test]
fn test_search_never_longer_than_layers() {
    for notation in ["R U", "F2 L'", "U R2 F", "D' B L2", "R U R' U'"] {
        let cube = compose(&parse_sequence(notation).unwrap());
        let search = solve_with(&cube, Algorithm::Search);
        let layer = solve_with(&cube, Algorithm::LayerByLayer);
        assert_eq!(search.metrics.algorithm, Algorithm::Search, "{notation}");
        assert!(search.moves.len() <= layer.moves.len(), "{notation}");
        assert!(search.final_state().is_solved(), "{notation}");
        assert!(layer.final_state().is_solved(), "{notation}");
    }
}

#[test_log::test]
fn test_seeded_scrambles_solve_layer_by_layer() {
    for seed in 0..20 {
        let (cube, moves) = scramble_with_seed(20, Some(seed)).unwrap();
        let result = solve_with(&cube, Algorithm::LayerByLayer);
        assert!(
            result.final_state().is_solved(),
            "seed {seed}: {}",
            format_sequence(&moves)
        );
        assert!(result.metrics.efficiency >= 0.0 && result.metrics.efficiency <= 100.0);
        for step in &result.steps {
            assert!(!step.description.is_empty());
        }
    }
}

#[test]
fn test_scramble_rejects_zero_length() {
    let mut rng = cubesolve::scramble::seeded_rng(11);
    assert!(matches!(
        scramble(0, &mut rng),
        Err(CubeError::InvalidArgument(_))
    ));
}

#[test]
fn test_playback_walks_to_the_end() {
    let cube = compose(&parse_sequence("L2 D' F").unwrap());
    let result = solve_with(&cube, Algorithm::LayerByLayer);

    let mut index = 0;
    let mut state = result.start;
    while index < result.steps.len() {
        let (next, snapshot) = step_forward(&result, index).unwrap();
        state = result.moves[index].apply(&state);
        assert_eq!(snapshot, state);
        index = next;
    }
    assert!(state.is_solved());
    assert_eq!(
        step_forward(&result, index),
        Err(CubeError::OutOfRange {
            index,
            len: result.steps.len()
        })
    );
}

#[test_log::test]
fn test_exhausted_search_falls_back() {
    let (cube, _) = scramble_with_seed(20, Some(99)).unwrap();
    let options = SolveOptions::new(Algorithm::Search)
        .with_search(SearchConfig::default().with_max_expansions(1_000));

    let result = solve(&cube, &options).unwrap();
    assert_eq!(result.metrics.algorithm, Algorithm::LayerByLayer);
    assert!(result.final_state().is_solved());

    assert!(matches!(
        solve(&cube, &options.with_fallback(false)),
        Err(CubeError::SearchExhausted { .. })
    ));
}

#[test]
fn test_zero_time_limit_times_out() {
    let cube = compose(&[R, U, F]);
    for algorithm in [Algorithm::LayerByLayer, Algorithm::Search] {
        let options = SolveOptions::new(algorithm).with_time_limit(Duration::ZERO);
        assert_eq!(
            solve(&cube, &options),
            Err(CubeError::TimedOut(Duration::ZERO))
        );
    }
}

#[test_log::test]
fn test_background_solve_can_be_cancelled() {
    let (cube, _) = scramble_with_seed(20, Some(5)).unwrap();
    let options = SolveOptions::new(Algorithm::Search)
        .with_search(SearchConfig::default().with_max_expansions(usize::MAX))
        .with_fallback(false);

    let handle = spawn_solve(cube, options);
    handle.cancel();
    assert_eq!(handle.join(), Err(CubeError::Cancelled));
}

#[test]
fn test_background_solve_finishes() {
    let cube = compose(&parse_sequence("B' R2 D").unwrap());
    let handle = spawn_solve(cube, SolveOptions::new(Algorithm::Search));
    let result = handle.join().unwrap();
    assert_eq!(result.moves.len(), 3);
    assert!(result.final_state().is_solved());
}

#[test]
fn test_malformed_notation_is_rejected() {
    for notation in ["R X", "R3", "U''", "r"] {
        assert!(
            matches!(parse_sequence(notation), Err(CubeError::InvalidArgument(_))),
            "{notation}"
        );
    }
}

#[test]
fn test_impossible_sticker_grid_is_rejected() {
    let mut grid = project(&compose(&[R, U]));
    // swap two stickers of one edge: a lone flipped edge
    let up = Face::U.index();
    let front = Face::F.index();
    let (a, b) = (grid[up][7], grid[front][1]);
    grid[up][7] = b;
    grid[front][1] = a;
    assert!(matches!(
        from_facelets(&grid),
        Err(CubeError::InvalidArgument(_))
    ));

    let mut grid = project(&Cube::SOLVED);
    grid[Face::D.index()][0] = Color::White;
    assert!(from_facelets(&grid).is_err());
}
