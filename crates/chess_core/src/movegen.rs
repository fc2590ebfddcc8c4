use std::ops::{Deref, DerefMut};

use crate::board::Board;
use crate::eval::{Weights, evaluate};
use crate::takeback::{TakeBack, Tracked};
use crate::types::*;

/// Upper bound on pseudo-legal moves in one position.
pub const MAX_MOVES: usize = 512;

/// Fixed-capacity move list; lives inside search frames so stepping the
/// search never allocates.
#[derive(Clone)]
pub struct MoveBuf {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl Default for MoveBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl MoveBuf {
    pub fn new() -> Self {
        Self {
            moves: [Move::default(); MAX_MOVES],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, m: Move) {
        assert!(self.len < MAX_MOVES, "move buffer overflow");
        self.moves[self.len] = m;
        self.len += 1;
    }
}

impl Deref for MoveBuf {
    type Target = [Move];

    fn deref(&self) -> &[Move] {
        &self.moves[..self.len]
    }
}

impl DerefMut for MoveBuf {
    fn deref_mut(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }
}

/// Generate all legal moves, returning a freshly allocated vector.
/// The board is cloned once so the caller's copy stays untouched.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut tmp = board.clone();
    let mut log = TakeBack::new();
    let mut out = Vec::with_capacity(64);
    Tracked::new(&mut tmp, &mut log).legal_moves_into(&mut out);
    out
}

impl Board {
    /// Fill `buf` with the pseudo-legal moves of the side to move.
    /// Moves that leave the own king attacked are included.
    pub fn enumerate_moves(&self, buf: &mut MoveBuf) -> usize {
        buf.clear();
        let side = self.turn;
        for id in side.slots() {
            let id = id as PieceId;
            let Some(kind) = self.slot(id).kind() else {
                continue;
            };
            match kind {
                PieceKind::Pawn => self.gen_pawn(id, side, buf),
                PieceKind::Knight => self.gen_knight(id, side, buf),
                PieceKind::Bishop => self.gen_slider(id, side, &DIAGONAL_RAYS, buf),
                PieceKind::Rook => self.gen_slider(id, side, &STRAIGHT_RAYS, buf),
                PieceKind::Queen => {
                    self.gen_slider(id, side, &STRAIGHT_RAYS, buf);
                    self.gen_slider(id, side, &DIAGONAL_RAYS, buf);
                }
                PieceKind::King => {
                    self.gen_king(id, side, buf);
                    self.gen_castle(id, side, buf);
                }
            }
        }
        buf.len()
    }

    fn is_enemy(&self, id: PieceId, side: Color) -> bool {
        self.slot(id).color() == Some(side.other())
    }

    fn gen_pawn(&self, id: PieceId, side: Color, buf: &mut MoveBuf) {
        let s = self.slot(id);
        let (x, y) = (s.x, s.y);
        let fwd = side.forward();
        let (ahead, captures) = match side {
            Color::White => (4, [2, 6]),
            Color::Black => (12, [14, 10]),
        };

        // Pushes
        let run = self.free_run(id, ahead);
        if run >= 1 {
            buf.push(Move::new(x, y, x, y + fwd));
            if run >= 2 && y == side.pawn_rank() {
                buf.push(Move::new(x, y, x, y + 2 * fwd));
            }
        }

        // Captures
        for dir in captures {
            if let Some(q) = self.adjacent(id, dir) {
                if self.is_enemy(q, side) {
                    let o = self.slot(q);
                    buf.push(Move::new(x, y, o.x, o.y));
                }
            }
        }

        // En passant: the enemy pawn that just advanced two stands beside us
        let Some(ep) = self.en_passant else { return };
        let enemy = side.other();
        if y != enemy.pawn_rank() + 2 * enemy.forward() || (ep - x).abs() != 1 {
            return;
        }
        let beside = if ep > x { 0 } else { 8 };
        if let Some(q) = self.adjacent(id, beside) {
            if self.slot(q).is(enemy, PieceKind::Pawn) {
                buf.push(Move::new(x, y, ep, y + fwd));
            }
        }
    }

    fn gen_knight(&self, id: PieceId, side: Color, buf: &mut MoveBuf) {
        let s = self.slot(id);
        for dir in KNIGHT_JUMPS {
            let (dx, dy) = DIRECTIONS[dir];
            let (tx, ty) = (s.x + dx, s.y + dy);
            if !on_board(tx, ty) {
                continue;
            }
            match s.links[dir] {
                Some(q) if !self.is_enemy(q, side) => {}
                _ => buf.push(Move::new(s.x, s.y, tx, ty)),
            }
        }
    }

    fn gen_slider(&self, id: PieceId, side: Color, dirs: &[usize], buf: &mut MoveBuf) {
        let s = self.slot(id);
        for &dir in dirs {
            let (dx, dy) = DIRECTIONS[dir];
            let run = self.free_run(id, dir);
            for step in 1..=run {
                buf.push(Move::new(s.x, s.y, s.x + dx * step, s.y + dy * step));
            }
            if let Some(q) = s.links[dir] {
                if self.is_enemy(q, side) {
                    let o = self.slot(q);
                    buf.push(Move::new(s.x, s.y, o.x, o.y));
                }
            }
        }
    }

    fn gen_king(&self, id: PieceId, side: Color, buf: &mut MoveBuf) {
        let s = self.slot(id);
        for dir in (0..16).step_by(2) {
            let (dx, dy) = DIRECTIONS[dir];
            let (tx, ty) = (s.x + dx, s.y + dy);
            if !on_board(tx, ty) {
                continue;
            }
            match self.adjacent(id, dir) {
                Some(q) if !self.is_enemy(q, side) => {}
                _ => buf.push(Move::new(s.x, s.y, tx, ty)),
            }
        }
    }

    fn gen_castle(&self, id: PieceId, side: Color, buf: &mut MoveBuf) {
        let s = self.slot(id);
        if !s.can_castle || s.x != 4 || s.y != side.home_rank() {
            return;
        }
        // Ray 0 points at the king-side rook, ray 8 at the queen-side one.
        for (dir, step) in [(0usize, 1i8), (8, -1)] {
            let Some(r) = s.links[dir] else { continue };
            let rook = self.slot(r);
            if !rook.is(side, PieceKind::Rook) || !rook.can_castle {
                continue;
            }
            if self.king_path_safe(s.y, &[s.x, s.x + step], side) {
                buf.push(Move::new(s.x, s.y, s.x + 2 * step, s.y));
            }
        }
    }
}

impl Tracked<'_> {
    /// Is `m` pseudo-legal here and does it keep the mover's king safe?
    pub fn is_legal(&mut self, m: Move) -> bool {
        let mut buf = MoveBuf::new();
        self.board.enumerate_moves(&mut buf);
        buf.contains(&m) && self.keeps_king_safe(m)
    }

    /// Play `m` inside its own frame and report whether the side that moved
    /// is out of check afterwards.
    pub fn keeps_king_safe(&mut self, m: Move) -> bool {
        self.start();
        self.do_move(m);
        let safe = !self.board.is_check(true);
        self.take_back();
        safe
    }

    /// Generate all legal moves into the provided buffer, reusing it across calls.
    pub fn legal_moves_into(&mut self, out: &mut Vec<Move>) {
        out.clear();
        let mut buf = MoveBuf::new();
        self.board.enumerate_moves(&mut buf);
        for &m in buf.iter() {
            if self.keeps_king_safe(m) {
                out.push(m);
            }
        }
    }

    pub fn has_legal_move(&mut self) -> bool {
        let mut buf = MoveBuf::new();
        self.board.enumerate_moves(&mut buf);
        buf.iter().any(|&m| self.keeps_king_safe(m))
    }

    /// Order moves by how good the resulting position is for the opponent,
    /// best for us first. Illegal moves sink to the end; ties keep their
    /// generation order.
    pub fn sort_moves(&mut self, moves: &mut [Move], weights: &Weights) {
        let mut scored = [(0i32, 0u16, Move::default()); MAX_MOVES];
        for (i, &m) in moves.iter().enumerate() {
            self.start();
            self.do_move(m);
            let score = if self.board.is_check(true) {
                i32::MAX
            } else {
                evaluate(self.board, weights)
            };
            self.take_back();
            scored[i] = (score, i as u16, m);
        }
        let scored = &mut scored[..moves.len()];
        scored.sort_unstable_by_key(|&(score, order, _)| (score, order));
        for (dst, &(_, _, m)) in moves.iter_mut().zip(scored.iter()) {
            *dst = m;
        }
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
