use super::*;

fn board(fen: &str) -> Board {
    Board::from_fen(fen).unwrap()
}

#[test]
fn test_start_position_is_balanced() {
    let w = Weights::default();
    assert_eq!(evaluate(&Board::new_game(), &w), 0);
    let black_to_move = board("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
    assert_eq!(evaluate(&black_to_move, &w), 0);
}

#[test]
fn test_extra_queen_is_good_for_owner() {
    let w = Weights::default();
    let white = board("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
    let black = board("4k3/8/8/8/8/8/8/3QK3 b - - 0 1");
    assert!(evaluate(&white, &w) > 1000);
    assert!(evaluate(&black, &w) < -1000);
}

#[test]
fn test_hanging_piece_counts_for_side_to_move() {
    let w = Weights::default();
    let hanging = board("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
    let safe = board("4k3/8/8/q7/4P3/8/8/4K3 w - - 0 1");
    assert!(evaluate(&hanging, &w) > evaluate(&safe, &w) + 1000);
}

/// Every factor switched off.
fn silent() -> Weights {
    Weights {
        piece: 0,
        paying_turn: 0,
        paying_turn_oppo: 0,
        threats: 0,
        mobility: 0,
        ties: 0,
        center: 0,
        king_cover: 0,
        king_mobility: 0,
        king_not_centered: 0,
        king_check: 0,
        pawn_beside: 0,
        pawn_onward: 0,
        pawn_heaven: 0,
    }
}

#[test]
fn test_weights_scale_terms() {
    let b = board("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
    assert_eq!(evaluate(&b, &silent()), 0);

    // Only material: king against king cancels, the pawn is worth 2.
    let material = Weights {
        piece: 1,
        ..silent()
    };
    assert_eq!(evaluate(&b, &material), 2);

    // Only pawn advancement: the e2 pawn stands one rank up.
    let onward = Weights {
        pawn_onward: 10,
        ..silent()
    };
    assert_eq!(evaluate(&b, &onward), 10);
}

#[test]
fn test_pawn_on_seventh_gets_heaven_bonus() {
    let heaven = Weights {
        pawn_heaven: 100,
        ..silent()
    };
    // Free promotion square: bonus twice.
    let free = board("k7/4P3/8/8/8/8/8/4K3 w - - 0 1");
    assert_eq!(evaluate(&free, &heaven), 200);
    // Blocked promotion square: bonus once.
    let blocked = board("4k3/4P3/8/8/8/8/8/4K3 w - - 0 1");
    assert_eq!(evaluate(&blocked, &heaven), 100);
}

#[test]
fn test_weights_default_and_serde() {
    let w = Weights::default();
    assert_eq!(w.piece, 116);
    assert_eq!(w.king_check, 112);
    assert_eq!(w.pawn_heaven, 120);

    let partial: Weights = serde_json::from_str(r#"{"piece": 100, "ties": 5}"#).unwrap();
    assert_eq!(partial.piece, 100);
    assert_eq!(partial.ties, 5);
    assert_eq!(partial.mobility, w.mobility);
}
