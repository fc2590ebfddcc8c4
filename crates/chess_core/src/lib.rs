pub mod attacks;
pub mod board;
pub mod error;
pub mod eval;
pub mod machine;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod saved_game;
pub mod search;
pub mod takeback;
pub mod types;

// Re-export core game logic
pub use board::*;
pub use error::*;
pub use eval::{Weights, evaluate};
pub use machine::Machine;
pub use movegen::*;
pub use notation::*;
pub use perft::{divide, perft};
pub use saved_game::SavedGame;
pub use search::{INFINITY, Search, SearchOutcome, SearchSettings, search_position};
pub use takeback::{TakeBack, Tracked};
pub use types::*;

// =============================================================================
// Limits shared by the board, the take-back log and the search
// =============================================================================

/// Deepest search the stack and take-back log are sized for.
pub const MAX_SEARCH_DEPTH: u8 = 8;

pub const DEFAULT_SEARCH_DEPTH: u8 = 2;

/// Length limit of the move history.
pub const MAX_MOVE_COUNT: usize = 2048;
