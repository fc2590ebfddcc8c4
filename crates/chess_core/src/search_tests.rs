use super::*;
use crate::movegen::legal_moves;
use crate::notation::parse_move;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn board(fen: &str) -> Board {
    Board::from_fen(fen).unwrap()
}

fn settings(depth: u8) -> SearchSettings {
    SearchSettings {
        depth,
        ..SearchSettings::default()
    }
}

fn run(b: &Board, depth: u8) -> Option<SearchOutcome> {
    search_position(b, &settings(depth), &mut StdRng::seed_from_u64(7))
}

/// Plain negamax without pruning, with the same conventions as the search:
/// mate scores infinite, stalemate zero, leaves scored by `evaluate`.
fn minimax(t: &mut Tracked<'_>, depth: u8, w: &Weights) -> i32 {
    let mut buf = MoveBuf::new();
    t.board().enumerate_moves(&mut buf);
    let mut best: Option<i32> = None;
    for &m in buf.iter() {
        t.start();
        t.do_move(m);
        if !t.board().is_check(true) {
            let v = if depth > 1 {
                -minimax(t, depth - 1, w)
            } else {
                -evaluate(t.board(), w)
            };
            best = Some(best.map_or(v, |b| b.max(v)));
        }
        t.take_back();
    }
    match best {
        Some(v) => v,
        None if t.board().is_check(false) => -INFINITY,
        None => 0,
    }
}

/// Exhaustive root search in the same move order as the real one.
fn reference(b: &Board, depth: u8) -> Option<SearchOutcome> {
    let w = Weights::default();
    let mut tmp = b.clone();
    let mut log = TakeBack::new();
    let mut t = Tracked::new(&mut tmp, &mut log);
    let mut buf = MoveBuf::new();
    t.board().enumerate_moves(&mut buf);
    if depth > 1 {
        t.sort_moves(&mut buf, &w);
    }
    let mut best: Option<SearchOutcome> = None;
    for &m in buf.iter() {
        t.start();
        t.do_move(m);
        if !t.board().is_check(true) {
            let mut v = match depth {
                0 => 0,
                1 => -evaluate(t.board(), &w),
                _ => -minimax(&mut t, depth - 1, &w),
            };
            if v == -INFINITY {
                v = -INFINITY + 1;
            }
            if best.is_none_or(|b| v > b.score) {
                best = Some(SearchOutcome {
                    best_move: m,
                    score: v,
                });
            }
        }
        t.take_back();
    }
    best
}

#[test]
fn test_alpha_beta_matches_minimax() {
    let positions = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -",
        "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1",
        "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
    ];
    for fen in positions {
        let b = board(fen);
        for depth in 1..=3 {
            assert_eq!(run(&b, depth), reference(&b, depth), "{fen} at depth {depth}");
        }
    }
}

#[test]
fn test_kiwipete_depth_two_matches_minimax() {
    let b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -");
    assert_eq!(run(&b, 2), reference(&b, 2));
}

#[test]
fn test_finds_back_rank_mate() {
    let b = board("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    for depth in [2, 3] {
        let out = run(&b, depth).unwrap();
        assert_eq!(out.best_move, parse_move("a1a8").unwrap());
        assert_eq!(out.score, INFINITY);
    }
}

#[test]
fn test_no_result_without_legal_moves() {
    // stalemate
    let b = board("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
    for depth in 0..=3 {
        assert_eq!(run(&b, depth), None);
    }
}

#[test]
fn test_search_is_deterministic() {
    let b = board("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let first = run(&b, 3);
    assert!(first.is_some());
    assert_eq!(first, run(&b, 3));
}

#[test]
fn test_depth_zero_picks_random_legal_move() {
    let b = Board::new_game();
    let legal = legal_moves(&b);
    let mut rng = StdRng::seed_from_u64(1);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..40 {
        let out = search_position(&b, &settings(0), &mut rng).unwrap();
        assert!(legal.contains(&out.best_move));
        assert_eq!(out.score, 0);
        seen.insert(out.best_move);
    }
    assert!(seen.len() > 1, "random mode should not always pick the same move");
}

#[test]
fn test_variety_keeps_choice_within_window() {
    let b = board("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let best = run(&b, 2).unwrap();
    let varied = SearchSettings {
        depth: 2,
        variety: 30,
        weights: Weights::default(),
    };
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10 {
        let out = search_position(&b, &varied, &mut rng).unwrap();
        assert!(out.score >= best.score - 30);
        assert!(out.score <= best.score);
    }
}

#[test]
fn test_step_yields_at_deep_frames() {
    let mut b = Board::new_game();
    let original = b.clone();
    let mut log = TakeBack::new();
    let mut t = Tracked::new(&mut b, &mut log);
    let mut search = Search::new(settings(3));
    search.begin(&mut t);

    let mut slices = 1;
    while !search.step(&mut t) {
        slices += 1;
    }
    // The root yields after each of its moves.
    assert_eq!(slices, 21);
    assert!(search.is_done());
    assert_eq!(search.root_scores().count(), 20);
    assert!(log.is_empty());
    assert_eq!(b, original);
}

#[test]
fn test_shallow_search_runs_in_one_step() {
    let mut b = Board::new_game();
    let mut log = TakeBack::new();
    let mut t = Tracked::new(&mut b, &mut log);
    let mut search = Search::new(settings(2));
    search.begin(&mut t);
    assert!(search.step(&mut t));
    assert!(search.outcome(&mut StdRng::seed_from_u64(0)).is_some());
}

#[test]
#[should_panic(expected = "exceeds")]
fn test_depth_beyond_stack_panics() {
    let _ = Search::new(settings(MAX_SEARCH_DEPTH + 1));
}
