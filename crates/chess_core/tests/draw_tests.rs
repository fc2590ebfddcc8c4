//! Tests for draw detection in chess
//!
//! Two conditions end a game as drawn:
//! - Stalemate
//! - Insufficient material

use chess_core::{Board, Machine, TakeBack, Tracked, parse_move};

fn machine(fen: &str) -> Machine {
    let mut m = Machine::with_seed(0);
    m.set_position_from_fen(fen).unwrap();
    m
}

fn insufficient(fen: &str) -> bool {
    Board::from_fen(fen).unwrap().is_insufficient_material()
}

// =============================================================================
// Stalemate Tests
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    // Black king in corner, white queen stalemates
    // Position: Black king on a8, White queen on b6, White king on c7
    let m = machine("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");

    assert!(m.legal_moves().is_empty(), "Stalemate position should have no legal moves");
    assert!(!m.is_check(), "Stalemate means king is not in check");
    assert!(m.is_draw());
    assert!(!m.is_mate());
}

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    // Classic king and pawn vs king stalemate
    // White king on g6, white pawn on g7, black king on g8
    let m = machine("6k1/6P1/6K1/8/8/8/8/8 b - - 0 1");

    assert!(m.legal_moves().is_empty(), "Stalemate position should have no legal moves");
    assert!(m.is_draw());
}

#[test]
fn test_stalemate_reached_by_a_move() {
    let mut m = machine("k7/2K5/8/1Q6/8/8/8/8 w - - 0 1");
    assert!(!m.is_draw());
    m.do_move(parse_move("b5b6").unwrap());
    assert!(m.is_draw());
    m.undo_move();
    assert!(!m.is_draw());
}

// =============================================================================
// Insufficient Material Tests
// =============================================================================

#[test]
fn test_insufficient_material_king_vs_king() {
    // Just two kings
    assert!(
        insufficient("8/8/8/4k3/8/4K3/8/8 w - - 0 1"),
        "King vs King is insufficient material"
    );
    assert!(machine("8/8/8/4k3/8/4K3/8/8 b - - 0 1").is_draw());
}

#[test]
fn test_insufficient_material_king_bishop_vs_king() {
    assert!(
        insufficient("8/8/8/4k3/8/4KB2/8/8 w - - 0 1"),
        "King + Bishop vs King is insufficient material"
    );
}

#[test]
fn test_insufficient_material_king_knight_vs_king() {
    assert!(
        insufficient("8/8/8/4k3/8/4KN2/8/8 w - - 0 1"),
        "King + Knight vs King is insufficient material"
    );
}

#[test]
fn test_insufficient_material_king_vs_king_bishop() {
    // King vs king and bishop (symmetric test)
    assert!(
        insufficient("8/8/4b3/4k3/8/4K3/8/8 w - - 0 1"),
        "King vs King + Bishop is insufficient material"
    );
}

#[test]
fn test_sufficient_material_with_pawn() {
    assert!(!insufficient("8/8/8/4k3/8/4K3/4P3/8 w - - 0 1"));
    assert!(!machine("8/8/8/4k3/8/4K3/4P3/8 w - - 0 1").is_draw());
}

#[test]
fn test_sufficient_material_with_rook() {
    assert!(!insufficient("8/8/8/4k3/8/4K3/8/R7 w - - 0 1"));
}

#[test]
fn test_sufficient_material_with_queen() {
    assert!(!insufficient("8/8/8/4k3/8/4K3/8/Q7 w - - 0 1"));
}

#[test]
fn test_capture_leaves_bare_kings() {
    // The white king takes the last black piece.
    let mut m = machine("8/8/8/8/8/8/3r4/4K2k w - - 0 1");
    assert!(!m.is_draw());
    m.do_move(parse_move("e1d2").unwrap());
    assert!(m.is_draw());
}

// =============================================================================
// Not draws
// =============================================================================

#[test]
fn test_checkmate_is_not_stalemate() {
    // Back rank mate
    let m = machine("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");

    assert!(m.legal_moves().is_empty());
    assert!(m.is_check());
    assert!(m.is_mate());
    assert!(!m.is_draw());
}

#[test]
fn test_check_is_not_checkmate() {
    let m = machine("4k3/8/8/8/8/8/8/4RK2 b - - 0 1");
    assert!(m.is_check());
    assert!(!m.is_mate());
    assert!(!m.is_draw());

    let mut b = Board::from_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").unwrap();
    let mut log = TakeBack::new();
    assert!(Tracked::new(&mut b, &mut log).has_legal_move());
}
