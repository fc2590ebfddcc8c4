//! Resumable negamax with alpha-beta pruning.
//!
//! The recursion lives in an explicit stack of [`Frame`]s so a caller can
//! run the search in slices: [`Search::step`] returns after finishing a move
//! in any frame of depth 3 or more, and picks up exactly where it stopped on
//! the next call. The frame stack and move buffers are allocated once when
//! the search is created.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::eval::{Weights, evaluate};
use crate::movegen::{MAX_MOVES, MoveBuf};
use crate::takeback::{TakeBack, Tracked};
use crate::types::Move;
use crate::{DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH};

pub const INFINITY: i32 = i32::MAX;

/// Frames with at least this depth hand control back after each move.
const YIELD_DEPTH: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Move,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Plies to look ahead; 0 picks a random legal move.
    pub depth: u8,
    /// Moves scoring within this distance of the best are equally eligible.
    pub variety: i32,
    pub weights: Weights,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            variety: 0,
            weights: Weights::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct Frame {
    depth: u8,
    alpha: i32,
    beta: i32,
    index: usize,
    found: u32,
    moves: MoveBuf,
}

impl Frame {
    fn new() -> Self {
        Self {
            depth: 0,
            alpha: -INFINITY,
            beta: INFINITY,
            index: 0,
            found: 0,
            moves: MoveBuf::new(),
        }
    }

    fn exhausted(&self) -> bool {
        self.index >= self.moves.len()
    }
}

#[derive(Debug, Clone)]
pub struct Search {
    settings: SearchSettings,
    frames: Vec<Frame>,
    top: usize,
    /// Score of every root move, `-INFINITY` for illegal ones.
    root_values: Vec<i32>,
    nodes: u64,
}

impl Search {
    pub fn new(mut settings: SearchSettings) -> Self {
        assert!(
            settings.depth <= MAX_SEARCH_DEPTH,
            "search depth {} exceeds {MAX_SEARCH_DEPTH}",
            settings.depth
        );
        settings.variety = settings.variety.max(0);
        Self {
            settings,
            frames: (0..=MAX_SEARCH_DEPTH).map(|_| Frame::new()).collect(),
            top: 0,
            root_values: Vec::with_capacity(MAX_MOVES),
            nodes: 0,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Set up the root frame for the position on `t`.
    pub fn begin(&mut self, t: &mut Tracked<'_>) {
        let depth = self.settings.depth;
        let root = &mut self.frames[0];
        root.depth = depth;
        root.alpha = -INFINITY;
        root.beta = INFINITY;
        root.index = 0;
        root.found = 0;
        t.board().enumerate_moves(&mut root.moves);
        if depth > 1 {
            t.sort_moves(&mut root.moves, &self.settings.weights);
        }
        self.root_values.clear();
        self.root_values.resize(root.moves.len(), -INFINITY);
        self.top = 0;
        self.nodes = 0;
        debug!(depth, root_moves = self.root_values.len(), "search started");
    }

    pub fn is_done(&self) -> bool {
        self.top == 0 && self.frames[0].exhausted()
    }

    /// Advance the search. Returns `true` once every root move is scored.
    /// The board on `t` is back in its starting state whenever this returns.
    pub fn step(&mut self, t: &mut Tracked<'_>) -> bool {
        loop {
            let frame = &self.frames[self.top];
            let value = if frame.exhausted() {
                if self.top == 0 {
                    return true;
                }
                Some(self.pop(t))
            } else {
                let m = frame.moves[frame.index];
                let depth = frame.depth;
                t.start();
                t.do_move(m);
                self.nodes += 1;
                if t.board().is_check(true) {
                    None
                } else if depth > 1 {
                    self.push(t);
                    continue;
                } else if depth == 1 {
                    Some(-evaluate(t.board(), &self.settings.weights))
                } else {
                    Some(0)
                }
            };

            if let Some(v) = value {
                self.settle(t, v);
            }

            t.take_back();
            let frame = &mut self.frames[self.top];
            frame.index += 1;
            if frame.depth >= YIELD_DEPTH {
                return false;
            }
        }
    }

    fn push(&mut self, t: &mut Tracked<'_>) {
        let parent = &self.frames[self.top];
        let (depth, alpha, beta) = (parent.depth, parent.alpha, parent.beta);
        self.top += 1;
        assert!(self.top < self.frames.len(), "search stack overflow");
        let child = &mut self.frames[self.top];
        child.depth = depth - 1;
        child.alpha = -beta;
        child.beta = -alpha;
        child.index = 0;
        child.found = 0;
        t.board().enumerate_moves(&mut child.moves);
        if child.depth > 1 {
            t.sort_moves(&mut child.moves, &self.settings.weights);
        }
    }

    /// Close the top frame and return its value seen from the parent.
    fn pop(&mut self, t: &mut Tracked<'_>) -> i32 {
        let frame = &self.frames[self.top];
        let v = if frame.found > 0 {
            -frame.alpha
        } else if t.board().is_check(false) {
            // mated
            INFINITY
        } else {
            0
        };
        self.top -= 1;
        v
    }

    /// Feed the value of the current move into its frame. A beta cut-off
    /// abandons the frame and feeds its value into the parent instead.
    fn settle(&mut self, t: &mut Tracked<'_>, mut v: i32) {
        while self.top > 0 {
            let frame = &mut self.frames[self.top];
            frame.found += 1;
            if v <= frame.alpha {
                return;
            }
            frame.alpha = v;
            if v < frame.beta {
                return;
            }
            t.take_back();
            v = self.pop(t);
        }

        let root = &mut self.frames[0];
        if v == -INFINITY {
            v = -INFINITY + 1;
        }
        self.root_values[root.index] = v;
        let variety = self.settings.variety;
        let floor = if v <= -INFINITY + 2 + variety {
            -INFINITY + 1
        } else {
            v - 1 - variety
        };
        if floor > root.alpha {
            root.alpha = floor;
        }
    }

    /// Pick the result of a finished search. `None` while still running or
    /// when no root move is legal.
    pub fn outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SearchOutcome> {
        if !self.is_done() {
            return None;
        }
        let best = self.root_values.iter().copied().max()?;
        if best == -INFINITY {
            return None;
        }
        let variety = self.settings.variety;
        let chosen = if self.settings.depth == 0 || variety > 0 {
            let threshold = if best <= -INFINITY + 1 + variety {
                -INFINITY + 1
            } else {
                best - variety
            };
            let candidates: Vec<usize> = (0..self.root_values.len())
                .filter(|&i| self.root_values[i] >= threshold)
                .collect();
            *candidates.choose(rng)?
        } else {
            self.root_values.iter().position(|&v| v == best)?
        };
        let outcome = SearchOutcome {
            best_move: self.frames[0].moves[chosen],
            score: self.root_values[chosen],
        };
        debug!(
            best_move = %outcome.best_move,
            score = outcome.score,
            nodes = self.nodes,
            "search finished"
        );
        Some(outcome)
    }

    /// Per-move scores of the root, in the order the moves were searched.
    pub fn root_scores(&self) -> impl Iterator<Item = (Move, i32)> + '_ {
        self.frames[0]
            .moves
            .iter()
            .copied()
            .zip(self.root_values.iter().copied())
    }
}

/// Run a complete search on a private copy of `board`.
pub fn search_position<R: Rng + ?Sized>(
    board: &Board,
    settings: &SearchSettings,
    rng: &mut R,
) -> Option<SearchOutcome> {
    let mut tmp = board.clone();
    let mut log = TakeBack::new();
    let mut t = Tracked::new(&mut tmp, &mut log);
    let mut search = Search::new(*settings);
    search.begin(&mut t);
    while !search.step(&mut t) {}
    search.outcome(rng)
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
