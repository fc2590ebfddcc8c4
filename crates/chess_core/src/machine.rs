//! Game facade: one board, its history, the search settings and at most one
//! search in flight.

use std::cell::OnceCell;
use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace, warn};

use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::eval::{Weights, evaluate};
use crate::movegen::legal_moves;
use crate::notation::{format_move, parse_move};
use crate::saved_game::SavedGame;
use crate::search::{Search, SearchOutcome, SearchSettings};
use crate::takeback::{TakeBack, Tracked};
use crate::types::*;
use crate::{MAX_MOVE_COUNT, MAX_SEARCH_DEPTH};

/// Facts about the current position, computed on first query.
#[derive(Debug, Clone, Copy)]
struct CachedInfo {
    check: bool,
    mate: bool,
    draw: bool,
    value: i32,
}

impl CachedInfo {
    fn compute(board: &Board, weights: &Weights) -> Self {
        let check = board.is_check(false);
        let mut tmp = board.clone();
        let mut log = TakeBack::new();
        let can_move = Tracked::new(&mut tmp, &mut log).has_legal_move();
        Self {
            check,
            mate: check && !can_move,
            draw: (!check && !can_move) || board.is_insufficient_material(),
            value: evaluate(board, weights),
        }
    }
}

/// Private copy of the position a search runs on.
struct Snapshot {
    board: Board,
    log: TakeBack,
}

struct ActiveSearch {
    search: Box<Search>,
    /// `None` when the search runs on the machine's own board.
    snapshot: Option<Box<Snapshot>>,
}

pub struct Machine {
    board: Board,
    /// Position the current game started from; undo replays from here.
    origin: Board,
    log: TakeBack,
    settings: SearchSettings,
    human: Color,
    cache: OnceCell<CachedInfo>,
    active: Option<ActiveSearch>,
    rng: StdRng,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Machine {
    /// Copies the game and settings; a running search is not carried over.
    fn clone(&self) -> Self {
        Self {
            board: self.board.clone(),
            origin: self.origin.clone(),
            log: TakeBack::new(),
            settings: self.settings,
            human: self.human,
            cache: OnceCell::new(),
            active: None,
            rng: self.rng.clone(),
        }
    }
}

impl Machine {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Machine whose random choices repeat for the same seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let board = Board::new_game();
        Self {
            origin: board.clone(),
            board,
            log: TakeBack::new(),
            settings: SearchSettings::default(),
            human: Color::White,
            cache: OnceCell::new(),
            active: None,
            rng,
        }
    }

    pub fn start_new_game(&mut self) {
        self.end_searching();
        self.board = Board::new_game();
        self.origin = self.board.clone();
        self.log.clear();
        self.invalidate();
        debug!("new game");
    }

    /// Start a game from a FEN position. History begins empty.
    pub fn set_position_from_fen(&mut self, fen: &str) -> EngineResult<()> {
        let board = Board::from_fen(fen)?;
        self.end_searching();
        self.origin = board.clone();
        self.board = board;
        self.log.clear();
        self.invalidate();
        debug!(fen, "position set");
        Ok(())
    }

    fn invalidate(&mut self) {
        self.cache = OnceCell::new();
    }

    // Settings

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn search_depth(&self) -> u8 {
        self.settings.depth
    }

    pub fn set_search_depth(&mut self, depth: u8) -> EngineResult<()> {
        if depth > MAX_SEARCH_DEPTH {
            return Err(EngineError::DepthOutOfRange {
                depth,
                max: MAX_SEARCH_DEPTH,
            });
        }
        self.end_searching();
        self.settings.depth = depth;
        Ok(())
    }

    pub fn variety(&self) -> i32 {
        self.settings.variety
    }

    pub fn set_variety(&mut self, variety: i32) {
        self.end_searching();
        self.settings.variety = variety.max(0);
    }

    pub fn weights(&self) -> &Weights {
        &self.settings.weights
    }

    pub fn set_weights(&mut self, weights: Weights) {
        self.end_searching();
        self.settings.weights = weights;
        self.invalidate();
    }

    pub fn human_side(&self) -> Color {
        self.human
    }

    pub fn is_human_white(&self) -> bool {
        self.human == Color::White
    }

    pub fn set_human_white(&mut self, white: bool) {
        self.human = if white { Color::White } else { Color::Black };
    }

    pub fn is_white_on(&self) -> bool {
        self.board.turn() == Color::White
    }

    pub fn is_human_on(&self) -> bool {
        self.board.turn() == self.human
    }

    // Position

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn move_count(&self) -> usize {
        self.board.move_count()
    }

    pub fn moves(&self) -> &[Move] {
        self.board.history()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.board.history().last().copied()
    }

    /// Occupant code of a square: 0 empty, 1..=6 white, 7..=12 black.
    pub fn field(&self, x: i8, y: i8) -> u8 {
        self.board.field(x, y)
    }

    pub fn is_legal_move(&self, m: Move) -> bool {
        if !m.is_on_board() {
            return false;
        }
        let mut tmp = self.board.clone();
        let mut log = TakeBack::new();
        Tracked::new(&mut tmp, &mut log).is_legal(m)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.board)
    }

    /// Play a move. The caller is responsible for its legality.
    pub fn do_move(&mut self, m: Move) {
        self.end_searching();
        Tracked::new(&mut self.board, &mut self.log).do_move(m);
        self.log.clear();
        self.invalidate();
        debug!(mv = %m, ply = self.board.move_count(), "move played");
    }

    /// Take back the last move by replaying the game without it.
    pub fn undo_move(&mut self) {
        self.end_searching();
        let Some((_, earlier)) = self.board.history().split_last() else {
            return;
        };
        let replay = earlier.to_vec();
        self.board = self.origin.clone();
        for &m in &replay {
            Tracked::new(&mut self.board, &mut self.log).do_move(m);
            self.log.clear();
        }
        self.invalidate();
        debug!(ply = self.board.move_count(), "move undone");
    }

    // Position facts

    fn info(&self) -> &CachedInfo {
        self.cache
            .get_or_init(|| CachedInfo::compute(&self.board, &self.settings.weights))
    }

    pub fn is_check(&self) -> bool {
        self.info().check
    }

    pub fn is_mate(&self) -> bool {
        self.info().mate
    }

    pub fn is_draw(&self) -> bool {
        self.info().draw
    }

    /// The game has run into the history limit.
    pub fn is_endless(&self) -> bool {
        self.board.move_count() > MAX_MOVE_COUNT - 100
    }

    /// Evaluation of the position for the side to move.
    pub fn value(&self) -> i32 {
        self.info().value
    }

    // Search

    /// Search the current position to completion.
    pub fn search_move(&mut self) -> Option<SearchOutcome> {
        self.start_searching(false);
        while !self.continue_searching() {}
        self.end_searching()
    }

    /// Begin a search. With `clone_engine` the search works on a private
    /// copy, so the machine stays readable while the search is stepped.
    pub fn start_searching(&mut self, clone_engine: bool) {
        self.end_searching();
        let mut search = Box::new(Search::new(self.settings));
        let snapshot = if clone_engine {
            let mut snap = Box::new(Snapshot {
                board: self.board.clone(),
                log: TakeBack::new(),
            });
            search.begin(&mut Tracked::new(&mut snap.board, &mut snap.log));
            Some(snap)
        } else {
            search.begin(&mut Tracked::new(&mut self.board, &mut self.log));
            None
        };
        self.active = Some(ActiveSearch { search, snapshot });
    }

    /// Do a bounded amount of search work. Returns `true` when finished, and
    /// `false` while more work remains or no search is running.
    pub fn continue_searching(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let done = match active.snapshot.as_deref_mut() {
            Some(snap) => active
                .search
                .step(&mut Tracked::new(&mut snap.board, &mut snap.log)),
            None => active
                .search
                .step(&mut Tracked::new(&mut self.board, &mut self.log)),
        };
        trace!(done, nodes = active.search.nodes(), "search slice");
        done
    }

    /// Stop the search and return its result if it ran to completion and
    /// found a legal move.
    pub fn end_searching(&mut self) -> Option<SearchOutcome> {
        let active = self.active.take()?;
        let outcome = active.search.outcome(&mut self.rng);
        if active.snapshot.is_none() {
            // An in-place search stopped midway still has moves applied.
            self.log.rewind(&mut self.board);
            self.invalidate();
        }
        if outcome.is_none() {
            debug!("search ended without a result");
        }
        outcome
    }

    pub fn is_searching(&self) -> bool {
        self.active.is_some()
    }

    // Persistence

    pub fn to_saved(&self) -> SavedGame {
        let start_fen = (self.origin != Board::new_game()).then(|| self.origin.to_fen());
        SavedGame {
            search_depth: self.settings.depth,
            human_side: self.human,
            start_fen,
            moves: self.board.history().iter().map(|&m| format_move(m)).collect(),
        }
    }

    /// Replace the game with a saved one. Every move is checked for legality;
    /// on any error the current game is left untouched.
    pub fn restore(&mut self, saved: &SavedGame) -> EngineResult<()> {
        if saved.search_depth > MAX_SEARCH_DEPTH {
            return Err(EngineError::DepthOutOfRange {
                depth: saved.search_depth,
                max: MAX_SEARCH_DEPTH,
            });
        }
        if saved.moves.len() > MAX_MOVE_COUNT {
            return Err(EngineError::BadSave(format!(
                "{} moves exceed the limit of {MAX_MOVE_COUNT}",
                saved.moves.len()
            )));
        }
        let origin = match &saved.start_fen {
            Some(fen) => Board::from_fen(fen)?,
            None => Board::new_game(),
        };
        let mut board = origin.clone();
        let mut log = TakeBack::new();
        for (ply, text) in saved.moves.iter().enumerate() {
            let m = parse_move(text)?;
            let mut t = Tracked::new(&mut board, &mut log);
            if !t.is_legal(m) {
                warn!(mv = %m, ply, "saved game contains an illegal move");
                return Err(EngineError::IllegalMove {
                    mv: text.clone(),
                    ply,
                });
            }
            t.do_move(m);
            log.clear();
        }

        self.end_searching();
        self.board = board;
        self.origin = origin;
        self.log.clear();
        self.settings.depth = saved.search_depth;
        self.human = saved.human_side;
        self.invalidate();
        debug!(moves = saved.moves.len(), "game restored");
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let json = self.to_saved().to_json()?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> EngineResult<()> {
        let text = fs::read_to_string(path)?;
        let saved = SavedGame::from_json(&text)?;
        self.restore(&saved)
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod machine_tests;
