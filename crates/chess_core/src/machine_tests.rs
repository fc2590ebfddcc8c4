use super::*;
use crate::board::START_FEN;

fn mv(text: &str) -> Move {
    parse_move(text).unwrap()
}

fn play(m: &mut Machine, moves: &[&str]) {
    for text in moves {
        let mv = mv(text);
        assert!(m.is_legal_move(mv), "{text} should be legal");
        m.do_move(mv);
    }
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("chess_core_{}_{name}.json", std::process::id()))
}

#[test]
fn test_defaults() {
    let m = Machine::with_seed(1);
    assert_eq!(m.search_depth(), crate::DEFAULT_SEARCH_DEPTH);
    assert_eq!(m.variety(), 0);
    assert!(m.is_human_white());
    assert!(m.is_white_on());
    assert!(m.is_human_on());
    assert_eq!(m.move_count(), 0);
    assert_eq!(m.last_move(), None);
    assert!(!m.is_check());
    assert!(!m.is_mate());
    assert!(!m.is_draw());
    assert!(!m.is_endless());
    assert_eq!(m.value(), 0);
    assert_eq!(m.field(4, 0), 6);
    assert!(!m.is_searching());
}

#[test]
fn test_set_search_depth_bounds() {
    let mut m = Machine::with_seed(1);
    assert!(matches!(
        m.set_search_depth(MAX_SEARCH_DEPTH + 1),
        Err(EngineError::DepthOutOfRange { depth: 9, max: 8 })
    ));
    assert_eq!(m.search_depth(), crate::DEFAULT_SEARCH_DEPTH);
    m.set_search_depth(MAX_SEARCH_DEPTH).unwrap();
    assert_eq!(m.search_depth(), MAX_SEARCH_DEPTH);
    m.set_search_depth(0).unwrap();
}

#[test]
fn test_is_legal_move_rejects_off_board() {
    let m = Machine::with_seed(1);
    assert!(!m.is_legal_move(Move::new(4, 1, 4, 8)));
    assert!(!m.is_legal_move(Move::new(-1, 0, 0, 0)));
    assert!(!m.is_legal_move(mv("e2e5")));
    assert!(m.is_legal_move(mv("e2e4")));
}

#[test]
fn test_do_and_undo_restore_board() {
    let mut m = Machine::with_seed(1);
    let fresh = m.board().clone();
    play(&mut m, &["e2e4"]);
    assert_eq!(m.move_count(), 1);
    assert_eq!(m.last_move(), Some(mv("e2e4")));
    assert!(!m.is_white_on());
    assert!(!m.is_human_on());

    m.undo_move();
    assert_eq!(m.board(), &fresh);
    assert_eq!(m.move_count(), 0);

    // Nothing left to undo.
    m.undo_move();
    assert_eq!(m.board(), &fresh);
}

#[test]
fn test_undo_leaves_no_residue() {
    let mut direct = Machine::with_seed(1);
    play(&mut direct, &["e2e4", "e7e5", "d2d4"]);

    let mut detour = Machine::with_seed(1);
    play(&mut detour, &["e2e4", "e7e5", "g1f3"]);
    detour.undo_move();
    play(&mut detour, &["d2d4"]);

    assert_eq!(direct.board(), detour.board());
    assert_eq!(direct.value(), detour.value());
}

#[test]
fn test_cached_info_follows_moves() {
    let mut m = Machine::with_seed(1);
    assert!(!m.is_check());
    // Fool's mate
    play(&mut m, &["f2f3", "e7e5", "g2g4"]);
    assert!(!m.is_check());
    play(&mut m, &["d8h4"]);
    assert!(m.is_check());
    assert!(m.is_mate());
    assert!(!m.is_draw());
    assert!(m.legal_moves().is_empty());
    assert_eq!(m.search_move(), None);

    m.undo_move();
    assert!(!m.is_check());
    assert!(!m.is_mate());
}

#[test]
fn test_stalemate_and_bare_kings_are_draws() {
    let mut m = Machine::with_seed(1);
    m.set_position_from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(m.is_draw());
    assert!(!m.is_mate());
    assert!(!m.is_check());
    assert_eq!(m.search_move(), None);

    for fen in ["4k3/8/8/8/8/8/8/4K3 w - - 0 1", "4k3/8/8/8/8/8/8/4K3 b - - 0 1"] {
        m.set_position_from_fen(fen).unwrap();
        assert!(m.is_draw(), "{fen}");
    }
}

#[test]
fn test_bad_fen_leaves_game_alone() {
    let mut m = Machine::with_seed(1);
    play(&mut m, &["e2e4"]);
    assert!(m.set_position_from_fen("nonsense").is_err());
    assert_eq!(m.move_count(), 1);
}

#[test]
fn test_search_move_plays_nothing() {
    let mut m = Machine::with_seed(1);
    let before = m.board().clone();
    let out = m.search_move().unwrap();
    assert!(m.is_legal_move(out.best_move));
    assert_eq!(m.board(), &before);
    assert!(!m.is_searching());
}

#[test]
fn test_incremental_search_matches_synchronous() {
    let mut sync = Machine::with_seed(5);
    sync.set_search_depth(3).unwrap();
    play(&mut sync, &["e2e4", "e7e5", "g1f3"]);
    let expected = sync.search_move();
    assert!(expected.is_some());

    for clone_engine in [true, false] {
        let mut m = Machine::with_seed(5);
        m.set_search_depth(3).unwrap();
        play(&mut m, &["e2e4", "e7e5", "g1f3"]);
        m.start_searching(clone_engine);
        assert!(m.is_searching());
        let mut slices = 0;
        while !m.continue_searching() {
            slices += 1;
        }
        assert!(slices > 1);
        assert_eq!(m.end_searching(), expected);
        assert!(!m.is_searching());
        assert_eq!(m.board(), sync.board());
    }
}

#[test]
fn test_cloned_search_leaves_board_readable() {
    let mut m = Machine::with_seed(5);
    m.set_search_depth(3).unwrap();
    let before = m.board().clone();
    m.start_searching(true);
    for _ in 0..5 {
        assert!(!m.continue_searching());
        assert_eq!(m.board(), &before);
        assert_eq!(m.field(4, 1), 1);
    }
    // Stopped early: no result.
    assert_eq!(m.end_searching(), None);
}

#[test]
fn test_abandoned_in_place_search_is_unwound() {
    let mut m = Machine::with_seed(5);
    m.set_search_depth(4).unwrap();
    let before = m.board().clone();
    m.start_searching(false);
    m.continue_searching();
    assert_eq!(m.end_searching(), None);
    assert_eq!(m.board(), &before);
    assert!(!m.is_check());
}

#[test]
fn test_mutation_ends_search() {
    let mut m = Machine::with_seed(5);
    m.set_search_depth(3).unwrap();
    m.start_searching(true);
    m.continue_searching();
    m.do_move(mv("e2e4"));
    assert!(!m.is_searching());
    assert!(!m.continue_searching());
    assert_eq!(m.end_searching(), None);
}

#[test]
fn test_save_and_load_round_trip() {
    let mut m = Machine::with_seed(1);
    m.set_search_depth(3).unwrap();
    m.set_human_white(false);
    play(&mut m, &["e2e4", "c7c5", "g1f3", "d7d6", "e1e2"]);
    let path = temp_path("round_trip");
    m.save(&path).unwrap();

    let mut loaded = Machine::with_seed(2);
    loaded.load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.board(), m.board());
    assert_eq!(loaded.search_depth(), 3);
    assert!(!loaded.is_human_white());
    assert_eq!(loaded.moves(), m.moves());
}

#[test]
fn test_saved_fen_game_round_trips() {
    let mut m = Machine::with_seed(1);
    m.set_position_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut m, &["e1g1", "a8b8"]);
    let saved = m.to_saved();
    assert!(saved.start_fen.is_some());

    let mut restored = Machine::with_seed(2);
    restored.restore(&saved).unwrap();
    assert_eq!(restored.board(), m.board());
    restored.undo_move();
    assert_eq!(restored.move_count(), 1);
    assert_eq!(restored.field(6, 0), 6);
}

#[test]
fn test_restore_rejects_illegal_moves() {
    let mut m = Machine::with_seed(1);
    play(&mut m, &["d2d4"]);
    let saved = SavedGame {
        search_depth: 2,
        human_side: Color::White,
        start_fen: None,
        moves: vec!["e2e4".into(), "e2e4".into()],
    };
    assert!(matches!(
        m.restore(&saved),
        Err(EngineError::IllegalMove { ply: 1, .. })
    ));
    // The current game is untouched.
    assert_eq!(m.moves(), &[mv("d2d4")]);

    let too_deep = SavedGame {
        search_depth: 12,
        moves: vec![],
        ..saved.clone()
    };
    assert!(matches!(
        m.restore(&too_deep),
        Err(EngineError::DepthOutOfRange { .. })
    ));

    let garbled = SavedGame {
        moves: vec!["zz".into()],
        ..saved
    };
    assert!(matches!(m.restore(&garbled), Err(EngineError::MoveText(_))));
}

#[test]
fn test_load_reports_bad_json() {
    let path = temp_path("bad_json");
    std::fs::write(&path, "{ not json").unwrap();
    let mut m = Machine::with_seed(1);
    assert!(matches!(m.load(&path), Err(EngineError::Json(_))));
    std::fs::remove_file(&path).ok();

    assert!(matches!(
        m.load(temp_path("missing")),
        Err(EngineError::Io(_))
    ));
}

#[test]
fn test_new_game_resets() {
    let mut m = Machine::with_seed(1);
    m.set_position_from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    m.start_new_game();
    assert_eq!(m.board().to_fen(), START_FEN);
    assert_eq!(m.move_count(), 0);
}
