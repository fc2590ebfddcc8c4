//! Error types for parsing and the game facade.
//!
//! Game outcomes (check, mate, draw) are queries on the machine, not errors.
//! Broken internal invariants such as a take-back overflow panic instead.

use crate::types::Color;

/// Malformed move text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveTextError {
    #[error("move text needs at least 4 characters, got {0}")]
    WrongLength(usize),

    #[error("square out of range in {0:?}")]
    OutOfRange(String),

    #[error("unexpected characters after move in {0:?}")]
    TrailingGarbage(String),
}

/// Malformed FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("FEN needs at least 4 fields, got {0}")]
    MissingField(usize),

    #[error("invalid FEN rank: {0:?}")]
    BadRank(String),

    #[error("invalid piece character in FEN: {0:?}")]
    BadPiece(char),

    #[error("too many {0:?} pieces")]
    TooManyPieces(Color),

    #[error("invalid side to move: {0:?}")]
    BadSide(String),

    #[error("invalid castling field: {0:?}")]
    BadCastling(String),

    #[error("invalid en passant field: {0:?}")]
    BadEnPassant(String),

    #[error("no {0:?} king on the board")]
    MissingKing(Color),

    #[error("{0:?} is in check but it is not their move")]
    KingCapturable(Color),
}

/// Errors surfaced by [`Machine`](crate::Machine).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("search depth {depth} is out of range (0..={max})")]
    DepthOutOfRange { depth: u8, max: u8 },

    #[error("illegal move {mv} at ply {ply}")]
    IllegalMove { mv: String, ply: usize },

    #[error("saved game is invalid: {0}")]
    BadSave(String),

    #[error(transparent)]
    MoveText(#[from] MoveTextError),

    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("saved game is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
