//! Reversible mutation log.
//!
//! Every write to a [`Board`] during search goes through a [`Tracked`]
//! handle, which records the previous value before writing the new one.
//! [`TakeBack::start`] opens a frame and [`TakeBack::take_back`] restores
//! everything written since the most recent open frame. Frames nest, so
//! the search can open one per ply.
//!
//! Scalar fields and link fields live in separate buffers, each with a fixed
//! capacity sized for the deepest search plus legality probes below it.

use crate::{MAX_MOVE_COUNT, MAX_SEARCH_DEPTH};
use crate::board::Board;
use crate::types::*;

/// Scalar entries one frame may need at most (mark included).
pub const SCALARS_PER_FRAME: usize = 11;
/// Link entries one frame may need at most (mark included).
pub const LINKS_PER_FRAME: usize = 118;

const FRAME_SLACK: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scalar {
    Mark,
    Piece { id: PieceId, old: Option<Piece> },
    X { id: PieceId, old: i8 },
    Y { id: PieceId, old: i8 },
    CanCastle { id: PieceId, old: bool },
    Turn(Color),
    EnPassant(Option<i8>),
    History(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Link {
    Mark,
    Square { sq: u8, old: Option<PieceId> },
    Neighbor { id: PieceId, dir: u8, old: Option<PieceId> },
}

#[derive(Clone, Debug)]
pub struct TakeBack {
    scalars: Vec<Scalar>,
    links: Vec<Link>,
}

impl Default for TakeBack {
    fn default() -> Self {
        Self::new()
    }
}

impl TakeBack {
    pub const SCALAR_CAPACITY: usize = SCALARS_PER_FRAME * (MAX_SEARCH_DEPTH as usize + FRAME_SLACK);
    pub const LINK_CAPACITY: usize = LINKS_PER_FRAME * (MAX_SEARCH_DEPTH as usize + FRAME_SLACK);

    pub fn new() -> Self {
        Self {
            scalars: Vec::with_capacity(Self::SCALAR_CAPACITY),
            links: Vec::with_capacity(Self::LINK_CAPACITY),
        }
    }

    /// Open a frame on both buffers.
    pub fn start(&mut self) {
        self.push_scalar(Scalar::Mark);
        self.push_link(Link::Mark);
    }

    /// Restore every field written since the most recent [`start`](Self::start)
    /// and close that frame. Without an open frame this only rolls back
    /// unframed writes, and on an empty log it does nothing.
    pub fn take_back(&mut self, board: &mut Board) {
        while let Some(entry) = self.scalars.pop() {
            match entry {
                Scalar::Mark => break,
                Scalar::Piece { id, old } => board.pieces[id as usize].piece = old,
                Scalar::X { id, old } => board.pieces[id as usize].x = old,
                Scalar::Y { id, old } => board.pieces[id as usize].y = old,
                Scalar::CanCastle { id, old } => board.pieces[id as usize].can_castle = old,
                Scalar::Turn(old) => board.turn = old,
                Scalar::EnPassant(old) => board.en_passant = old,
                Scalar::History(len) => board.history.truncate(len),
            }
        }
        while let Some(entry) = self.links.pop() {
            match entry {
                Link::Mark => break,
                Link::Square { sq, old } => board.grid[sq as usize] = old,
                Link::Neighbor { id, dir, old } => {
                    board.pieces[id as usize].links[dir as usize] = old
                }
            }
        }
    }

    /// Take back every open frame, leaving the log empty.
    pub fn rewind(&mut self, board: &mut Board) {
        while !self.is_empty() {
            self.take_back(board);
        }
    }

    pub fn clear(&mut self) {
        self.scalars.clear();
        self.links.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.links.is_empty()
    }

    /// Number of frames currently open.
    pub fn open_frames(&self) -> usize {
        self.scalars.iter().filter(|e| matches!(e, Scalar::Mark)).count()
    }

    fn push_scalar(&mut self, entry: Scalar) {
        assert!(
            self.scalars.len() < Self::SCALAR_CAPACITY,
            "take-back scalar buffer overflow"
        );
        self.scalars.push(entry);
    }

    fn push_link(&mut self, entry: Link) {
        assert!(
            self.links.len() < Self::LINK_CAPACITY,
            "take-back link buffer overflow"
        );
        self.links.push(entry);
    }
}

/// A board paired with the log that records its mutations.
pub struct Tracked<'a> {
    pub(crate) board: &'a mut Board,
    pub(crate) log: &'a mut TakeBack,
}

impl<'a> Tracked<'a> {
    pub fn new(board: &'a mut Board, log: &'a mut TakeBack) -> Self {
        Self { board, log }
    }

    pub fn board(&self) -> &Board {
        self.board
    }

    pub fn start(&mut self) {
        self.log.start();
    }

    pub fn take_back(&mut self) {
        self.log.take_back(self.board);
    }

    pub fn set_piece(&mut self, id: PieceId, piece: Option<Piece>) {
        let slot = &mut self.board.pieces[id as usize];
        self.log.push_scalar(Scalar::Piece { id, old: slot.piece });
        slot.piece = piece;
    }

    pub fn set_x(&mut self, id: PieceId, x: i8) {
        let slot = &mut self.board.pieces[id as usize];
        self.log.push_scalar(Scalar::X { id, old: slot.x });
        slot.x = x;
    }

    pub fn set_y(&mut self, id: PieceId, y: i8) {
        let slot = &mut self.board.pieces[id as usize];
        self.log.push_scalar(Scalar::Y { id, old: slot.y });
        slot.y = y;
    }

    pub fn set_can_castle(&mut self, id: PieceId, can_castle: bool) {
        let slot = &mut self.board.pieces[id as usize];
        self.log.push_scalar(Scalar::CanCastle {
            id,
            old: slot.can_castle,
        });
        slot.can_castle = can_castle;
    }

    pub fn set_turn(&mut self, turn: Color) {
        self.log.push_scalar(Scalar::Turn(self.board.turn));
        self.board.turn = turn;
    }

    pub fn set_en_passant(&mut self, file: Option<i8>) {
        self.log.push_scalar(Scalar::EnPassant(self.board.en_passant));
        self.board.en_passant = file;
    }

    pub fn push_history(&mut self, m: Move) {
        assert!(
            self.board.history.len() < MAX_MOVE_COUNT,
            "move history is full"
        );
        self.log.push_scalar(Scalar::History(self.board.history.len()));
        self.board.history.push(m);
    }

    pub fn set_square(&mut self, sq: usize, occupant: Option<PieceId>) {
        self.log.push_link(Link::Square {
            sq: sq as u8,
            old: self.board.grid[sq],
        });
        self.board.grid[sq] = occupant;
    }

    pub fn set_link(&mut self, id: PieceId, dir: usize, neighbor: Option<PieceId>) {
        let slot = &mut self.board.pieces[id as usize];
        self.log.push_link(Link::Neighbor {
            id,
            dir: dir as u8,
            old: slot.links[dir],
        });
        slot.links[dir] = neighbor;
    }
}

#[cfg(test)]
#[path = "takeback_tests.rs"]
mod takeback_tests;
