use serde::{Deserialize, Serialize};

use crate::board::{Board, PieceSlot};
use crate::types::*;

/// Factors of the evaluation terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub piece: i32,
    pub paying_turn: i32,
    pub paying_turn_oppo: i32,
    pub threats: i32,
    pub mobility: i32,
    pub ties: i32,
    pub center: i32,
    pub king_cover: i32,
    pub king_mobility: i32,
    pub king_not_centered: i32,
    pub king_check: i32,
    pub pawn_beside: i32,
    pub pawn_onward: i32,
    pub pawn_heaven: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            piece: 116,
            paying_turn: 90,
            paying_turn_oppo: 2,
            threats: 12,
            mobility: 6,
            ties: 2,
            center: 1,
            king_cover: 2,
            king_mobility: 6,
            king_not_centered: 2,
            king_check: 112,
            pawn_beside: 6,
            pawn_onward: 26,
            pawn_heaven: 120,
        }
    }
}

/// Score the position from the view of the side to move.
pub fn evaluate(board: &Board, w: &Weights) -> i32 {
    board.pieces().map(|(id, _)| value_piece(board, id, w)).sum()
}

fn value_piece(board: &Board, id: PieceId, w: &Weights) -> i32 {
    let s = board.slot(id);
    let Some(piece) = s.piece else { return 0 };
    let v = s.value() * w.piece
        + paying_hit(board, s, piece, w)
        + threats(board, id, piece, w)
        + mobility(board, id, piece, w)
        + ties(board, s, piece, w)
        + centrality(s.x, s.y) * w.center
        + king_terms(board, id, piece, w)
        + pawn_terms(board, id, piece, w);
    if piece.color == board.turn() { v } else { -v }
}

/// Static exchange on the piece's square: attackers of alternating sides
/// capture in order of increasing value, seeing through pieces that already
/// took part. Each side may stop when continuing would lose material.
fn paying_hit(board: &Board, s: &PieceSlot, piece: Piece, w: &Weights) -> i32 {
    let mut near = s.links;
    let mut gains = [0i32; PIECE_SLOTS + 1];
    let mut k = 0;
    gains[0] = s.value();
    let mut side = piece.color.other();

    while let Some(dir) = cheapest_attacker(board, s, &near, side) {
        let Some(a) = near[dir] else { break };
        let attacker = board.slot(a);
        k += 1;
        gains[k] = attacker.value();
        near[dir] = if is_ray(dir) { attacker.links[dir] } else { None };
        side = side.other();
    }

    let mut v = 0;
    while k > 0 {
        k -= 1;
        v = (gains[k] - v).max(0);
    }
    let factor = if piece.color == board.turn() {
        w.paying_turn_oppo
    } else {
        w.paying_turn
    };
    -v * factor
}

fn cheapest_attacker(
    board: &Board,
    target: &PieceSlot,
    near: &[Option<PieceId>; 16],
    side: Color,
) -> Option<usize> {
    for kind in PieceKind::ALL {
        for (dir, link) in near.iter().enumerate() {
            let Some(a) = *link else { continue };
            let s = board.slot(a);
            if s.piece != Some(Piece::new(side, kind)) {
                continue;
            }
            if crate::attacks::attacks_along(
                Piece::new(side, kind),
                dir,
                s.x - target.x,
                s.y - target.y,
            ) {
                return Some(dir);
            }
        }
    }
    None
}

fn is_adjacent(board: &Board, id: PieceId, dir: usize) -> bool {
    board.adjacent(id, dir).is_some()
}

/// How many pieces, of either colour, this piece attacks or covers.
fn threats(board: &Board, id: PieceId, piece: Piece, w: &Weights) -> i32 {
    let s = board.slot(id);
    let count = match piece.kind {
        PieceKind::Pawn => {
            let dirs = match piece.color {
                Color::White => [2, 6],
                Color::Black => [10, 14],
            };
            dirs.iter().filter(|&&d| is_adjacent(board, id, d)).count()
        }
        PieceKind::Knight => KNIGHT_JUMPS.iter().filter(|&&d| s.links[d].is_some()).count(),
        PieceKind::King => (0..16)
            .step_by(2)
            .filter(|&d| is_adjacent(board, id, d))
            .count(),
        _ => slider_rays(piece.kind)
            .filter(|&d| s.links[d].is_some())
            .count(),
    };
    count as i32 * w.threats
}

fn slider_rays(kind: PieceKind) -> impl Iterator<Item = usize> {
    let straight = kind.slides_straight().then_some(STRAIGHT_RAYS);
    let diagonal = kind.slides_diagonally().then_some(DIAGONAL_RAYS);
    straight.into_iter().chain(diagonal).flatten()
}

fn mobility(board: &Board, id: PieceId, piece: Piece, w: &Weights) -> i32 {
    let s = board.slot(id);
    let v = match piece.kind {
        PieceKind::Pawn => {
            let ahead = match piece.color {
                Color::White => 4,
                Color::Black => 12,
            };
            let cap = if s.y == piece.color.pawn_rank() { 2 } else { 1 };
            board.free_run(id, ahead).min(cap) as i32
        }
        PieceKind::Knight => KNIGHT_JUMPS
            .iter()
            .filter(|&&d| {
                let (dx, dy) = DIRECTIONS[d];
                on_board(s.x + dx, s.y + dy) && s.links[d].is_none()
            })
            .count() as i32,
        PieceKind::King => 0,
        _ => slider_rays(piece.kind)
            .map(|d| board.free_run(id, d) as i32)
            .sum(),
    };
    v * w.mobility
}

/// Two enemy pieces in a row on one of the slider's rays.
fn ties(board: &Board, s: &PieceSlot, piece: Piece, w: &Weights) -> i32 {
    if !piece.kind.is_slider() {
        return 0;
    }
    let enemy = piece.color.other();
    let mut v = 0;
    for dir in slider_rays(piece.kind) {
        let Some(first) = s.links[dir] else { continue };
        let first = board.slot(first);
        let Some(second) = first.links[dir] else { continue };
        let second = board.slot(second);
        if first.color() == Some(enemy) && second.color() == Some(enemy) {
            v += first.value() + second.value();
        }
    }
    v * w.ties / 2
}

fn king_terms(board: &Board, id: PieceId, piece: Piece, w: &Weights) -> i32 {
    if piece.kind != PieceKind::King {
        return 0;
    }
    let s = board.slot(id);
    let enemy = piece.color.other();
    let mut v = 0;

    // Open lines towards the king; a ray ending at an enemy counts as fully open.
    let cover: i32 = (0..16)
        .step_by(2)
        .map(|d| match s.links[d] {
            Some(q) if board.slot(q).color() == Some(enemy) => 7,
            _ => board.free_run(id, d) as i32,
        })
        .sum();
    v -= cover * w.king_cover;

    let free = (0..16)
        .step_by(2)
        .filter(|&d| {
            let (dx, dy) = DIRECTIONS[d];
            on_board(s.x + dx, s.y + dy) && board.free_run(id, d) > 0
        })
        .count() as i32;
    v += free * w.king_mobility;

    v -= centrality(s.x, s.y) * w.king_not_centered;

    if board.is_threatened(s.x, s.y, enemy) {
        v -= w.king_check;
    }
    v
}

fn pawn_terms(board: &Board, id: PieceId, piece: Piece, w: &Weights) -> i32 {
    if piece.kind != PieceKind::Pawn {
        return 0;
    }
    let s = board.slot(id);
    let mut v = 0;

    let same = |q: Option<PieceId>| q.is_some_and(|q| board.slot(q).piece == Some(piece));
    let supported = [0, 2, 14]
        .iter()
        .any(|&d| same(board.adjacent(id, d)))
        || same(s.links[3])
        || same(s.links[13]);
    if supported {
        v += w.pawn_beside;
    }

    let (advanced, ahead) = match piece.color {
        Color::White => (s.y, 4),
        Color::Black => (7 - s.y, 12),
    };
    v += advanced as i32 * w.pawn_onward;
    if advanced == 6 {
        v += w.pawn_heaven;
        if s.links[ahead].is_none() {
            v += w.pawn_heaven;
        }
    }
    v
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
