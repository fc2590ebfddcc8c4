//! Attack detection over neighbour links.
//!
//! A square is attacked when one of its 16 neighbours can strike it:
//! - knights through the odd (jump) links
//! - rooks and queens through straight ray links
//! - bishops and queens through diagonal ray links
//! - kings and pawns only when adjacent, pawns only in their capture direction

use crate::board::Board;
use crate::types::*;

impl Board {
    /// Can any piece of `by` capture on (x, y)?
    pub fn is_threatened(&self, x: i8, y: i8, by: Color) -> bool {
        let links = match self.occupant(x, y) {
            Some(id) => self.slot(id).links,
            None => self.neighbors(x, y),
        };
        links.iter().enumerate().any(|(dir, &link)| {
            let Some(id) = link else { return false };
            let s = self.slot(id);
            match s.piece {
                Some(p) if p.color == by => attacks_along(p, dir, s.x - x, s.y - y),
                _ => false,
            }
        })
    }

    /// Is the king of the side to move in check? With `invert`, asks about
    /// the side that just moved instead.
    pub fn is_check(&self, invert: bool) -> bool {
        let side = if invert { self.turn.other() } else { self.turn };
        match self.king(side) {
            Some(k) => {
                let s = self.slot(k);
                self.is_threatened(s.x, s.y, side.other())
            }
            None => false,
        }
    }

    /// Would `side` leave its king attacked? Used by castling to vet the
    /// king square and the square it passes.
    pub(crate) fn king_path_safe(&self, y: i8, xs: &[i8], side: Color) -> bool {
        xs.iter().all(|&x| !self.is_threatened(x, y, side.other()))
    }
}

/// Does `piece`, found in link direction `dir` at offset (dx, dy) from the
/// target, attack the target?
pub(crate) fn attacks_along(piece: Piece, dir: usize, dx: i8, dy: i8) -> bool {
    if !is_ray(dir) {
        return piece.kind == PieceKind::Knight;
    }
    let adjacent = dx.abs() <= 1 && dy.abs() <= 1;
    match piece.kind {
        PieceKind::Knight => false,
        PieceKind::Rook => is_straight(dir),
        PieceKind::Bishop => !is_straight(dir),
        PieceKind::Queen => true,
        PieceKind::King => adjacent,
        // A pawn attacks diagonally forward, so it stands one rank behind.
        PieceKind::Pawn => adjacent && dx != 0 && dy == -piece.color.forward(),
    }
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
