use crate::MAX_MOVE_COUNT;
use crate::error::FenError;
use crate::takeback::{TakeBack, Tracked};
use crate::types::*;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// One identity in the piece arena. A slot keeps its index for the whole
/// game; capture clears `piece`, promotion rewrites it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceSlot {
    pub piece: Option<Piece>,
    pub x: i8,
    pub y: i8,
    /// King or rook that has not moved yet.
    pub can_castle: bool,
    /// Nearest occupant along each ray (even) or on each knight jump (odd).
    pub links: [Option<PieceId>; 16],
}

impl PieceSlot {
    pub const EMPTY: PieceSlot = PieceSlot {
        piece: None,
        x: 0,
        y: 0,
        can_castle: false,
        links: [None; 16],
    };

    pub fn value(&self) -> i32 {
        self.piece.map_or(0, |p| p.kind.value())
    }

    pub fn is(&self, color: Color, kind: PieceKind) -> bool {
        self.piece == Some(Piece::new(color, kind))
    }

    pub fn color(&self) -> Option<Color> {
        self.piece.map(|p| p.color)
    }

    pub fn kind(&self) -> Option<PieceKind> {
        self.piece.map(|p| p.kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub(crate) pieces: [PieceSlot; PIECE_SLOTS],
    pub(crate) grid: [Option<PieceId>; 64],
    pub(crate) turn: Color,
    /// File of a pawn that just advanced two squares.
    pub(crate) en_passant: Option<i8>,
    pub(crate) history: Vec<Move>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new_game()
    }
}

impl Board {
    fn empty() -> Self {
        Board {
            pieces: [PieceSlot::EMPTY; PIECE_SLOTS],
            grid: [None; 64],
            turn: Color::White,
            en_passant: None,
            history: Vec::with_capacity(MAX_MOVE_COUNT),
        }
    }

    pub fn new_game() -> Self {
        let mut b = Board::empty();
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for color in [Color::White, Color::Black] {
            let base = color.slots().start;
            for x in 0..8i8 {
                let pawn = Piece::new(color, PieceKind::Pawn);
                b.place(base + x as usize, pawn, x, color.pawn_rank(), false);
                let kind = back[x as usize];
                let castles = matches!(kind, PieceKind::Rook | PieceKind::King);
                b.place(
                    base + 8 + x as usize,
                    Piece::new(color, kind),
                    x,
                    color.home_rank(),
                    castles,
                );
            }
        }
        b.link_all();
        b
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingField(parts.len()));
        }
        let (board_part, stm_part, castle_part, ep_part) = (parts[0], parts[1], parts[2], parts[3]);

        let mut b = Board::empty();
        let mut next_slot = [Color::White.slots().start, Color::Black.slots().start];

        let ranks: Vec<&str> = board_part.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadRank(board_part.to_string()));
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let y = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            let mut x: i8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    if d == 0 {
                        return Err(FenError::BadRank(rank_str.to_string()));
                    }
                    x += d as i8;
                } else {
                    let piece = Piece::from_fen_char(ch).ok_or(FenError::BadPiece(ch))?;
                    if x > 7 {
                        return Err(FenError::BadRank(rank_str.to_string()));
                    }
                    let slot = next_slot[piece.color.idx()];
                    if slot >= piece.color.slots().end {
                        return Err(FenError::TooManyPieces(piece.color));
                    }
                    next_slot[piece.color.idx()] += 1;
                    b.place(slot, piece, x, y, false);
                    x += 1;
                }
                if x > 8 {
                    return Err(FenError::BadRank(rank_str.to_string()));
                }
            }
            if x != 8 {
                return Err(FenError::BadRank(rank_str.to_string()));
            }
        }

        b.turn = match stm_part {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::BadSide(stm_part.to_string())),
        };

        for color in [Color::White, Color::Black] {
            if b.king(color).is_none() {
                return Err(FenError::MissingKing(color));
            }
        }

        if castle_part != "-" {
            for c in castle_part.chars() {
                let (color, rook_x) = match c {
                    'K' => (Color::White, 7),
                    'Q' => (Color::White, 0),
                    'k' => (Color::Black, 7),
                    'q' => (Color::Black, 0),
                    _ => return Err(FenError::BadCastling(castle_part.to_string())),
                };
                let y = color.home_rank();
                let king = b.placed_at(4, y, Piece::new(color, PieceKind::King));
                let rook = b.placed_at(rook_x, y, Piece::new(color, PieceKind::Rook));
                if let (Some(king), Some(rook)) = (king, rook) {
                    b.pieces[king].can_castle = true;
                    b.pieces[rook].can_castle = true;
                }
            }
        }

        if ep_part != "-" {
            let (x, y) = string_to_coord(ep_part)
                .ok_or_else(|| FenError::BadEnPassant(ep_part.to_string()))?;
            // The target square sits behind the pawn that just advanced.
            let expected = match b.turn {
                Color::White => 5,
                Color::Black => 2,
            };
            if y != expected {
                return Err(FenError::BadEnPassant(ep_part.to_string()));
            }
            b.en_passant = Some(x);
        }

        b.link_all();
        if b.is_check(true) {
            return Err(FenError::KingCapturable(b.turn.other()));
        }
        Ok(b)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::new();
        for y in (0..8i8).rev() {
            let mut empty = 0;
            for x in 0..8i8 {
                match self.piece_at(x, y) {
                    Some(p) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(p.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if y > 0 {
                out.push('/');
            }
        }
        out.push(' ');
        out.push(match self.turn {
            Color::White => 'w',
            Color::Black => 'b',
        });
        out.push(' ');

        let mut castling = String::new();
        for (color, rook_x, ch) in [
            (Color::White, 7, 'K'),
            (Color::White, 0, 'Q'),
            (Color::Black, 7, 'k'),
            (Color::Black, 0, 'q'),
        ] {
            let y = color.home_rank();
            let ready = |x: i8, kind: PieceKind| {
                self.occupant(x, y)
                    .map(|id| self.slot(id))
                    .is_some_and(|s| s.is(color, kind) && s.can_castle)
            };
            if ready(4, PieceKind::King) && ready(rook_x, PieceKind::Rook) {
                castling.push(ch);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        out.push_str(&castling);
        out.push(' ');

        match self.en_passant {
            Some(x) => {
                let y = match self.turn {
                    Color::White => 5,
                    Color::Black => 2,
                };
                out.push_str(&coord_to_string(x, y));
            }
            None => out.push('-'),
        }
        out.push_str(&format!(" 0 {}", self.history.len() / 2 + 1));
        out
    }

    fn place(&mut self, id: usize, piece: Piece, x: i8, y: i8, can_castle: bool) {
        self.pieces[id] = PieceSlot {
            piece: Some(piece),
            x,
            y,
            can_castle,
            links: [None; 16],
        };
    }

    // The grid is only filled by `link_all`, so setup code scans the arena.
    fn placed_at(&self, x: i8, y: i8, piece: Piece) -> Option<usize> {
        self.pieces
            .iter()
            .position(|s| s.piece == Some(piece) && s.x == x && s.y == y)
    }

    /// Insert every present piece into the grid and build its links.
    fn link_all(&mut self) {
        let mut log = TakeBack::new();
        for id in 0..PIECE_SLOTS {
            if self.pieces[id].piece.is_some() {
                let mut t = Tracked::new(self, &mut log);
                t.link_piece(id as PieceId);
                log.clear();
            }
        }
    }

    // Accessors

    pub fn slot(&self, id: PieceId) -> &PieceSlot {
        &self.pieces[id as usize]
    }

    /// Present pieces with their arena index.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &PieceSlot)> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, s)| s.piece.is_some())
            .map(|(i, s)| (i as PieceId, s))
    }

    pub fn occupant(&self, x: i8, y: i8) -> Option<PieceId> {
        sq(x, y).and_then(|s| self.grid[s])
    }

    pub fn piece_at(&self, x: i8, y: i8) -> Option<Piece> {
        self.occupant(x, y).and_then(|id| self.slot(id).piece)
    }

    /// Occupant code: 0 empty, 1..=6 white pawn..king, 7..=12 black.
    pub fn field(&self, x: i8, y: i8) -> u8 {
        self.piece_at(x, y).map_or(0, Piece::code)
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn en_passant(&self) -> Option<i8> {
        self.en_passant
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn king(&self, color: Color) -> Option<PieceId> {
        color
            .slots()
            .find(|&id| self.pieces[id].is(color, PieceKind::King))
            .map(|id| id as PieceId)
    }

    /// Nearest occupant along each ray and on each knight jump from (x, y),
    /// computed from the grid.
    pub fn neighbors(&self, x: i8, y: i8) -> [Option<PieceId>; 16] {
        let mut out = [None; 16];
        for (dir, &(dx, dy)) in DIRECTIONS.iter().enumerate() {
            let (mut cx, mut cy) = (x + dx, y + dy);
            while on_board(cx, cy) {
                if let Some(id) = self.grid[index(cx, cy)] {
                    out[dir] = Some(id);
                    break;
                }
                if !is_ray(dir) {
                    break;
                }
                cx += dx;
                cy += dy;
            }
        }
        out
    }

    /// Empty squares between a piece and its link in `dir` (or the edge).
    pub fn free_run(&self, id: PieceId, dir: usize) -> i8 {
        let s = self.slot(id);
        match s.links[dir] {
            Some(q) => {
                let o = self.slot(q);
                (o.x - s.x).abs().max((o.y - s.y).abs()) - 1
            }
            None => edge_distance(s.x, s.y, dir),
        }
    }

    /// The piece linked in ray direction `dir`, if it stands right next to `id`.
    pub fn adjacent(&self, id: PieceId, dir: usize) -> Option<PieceId> {
        let q = self.slot(id).links[dir]?;
        (self.free_run(id, dir) == 0).then_some(q)
    }

    /// True when neither side can possibly deliver mate: bare kings, a single
    /// minor piece, or only bishops that all stand on one square colour.
    pub fn is_insufficient_material(&self) -> bool {
        let mut knights = 0;
        let mut bishop_squares = [0u32; 2];
        for (_, s) in self.pieces() {
            match s.kind() {
                Some(PieceKind::King) => {}
                Some(PieceKind::Knight) => knights += 1,
                Some(PieceKind::Bishop) => bishop_squares[((s.x + s.y) & 1) as usize] += 1,
                _ => return false,
            }
        }
        let bishops = bishop_squares[0] + bishop_squares[1];
        if knights + bishops <= 1 {
            return true;
        }
        knights == 0 && (bishop_squares[0] == 0 || bishop_squares[1] == 0)
    }
}

impl Tracked<'_> {
    /// Put a piece into the grid at its coordinates and connect it with its
    /// neighbours in all 16 directions.
    pub fn link_piece(&mut self, id: PieceId) {
        let s = *self.board.slot(id);
        let near = self.board.neighbors(s.x, s.y);
        self.set_square(index(s.x, s.y), Some(id));
        for (dir, &n) in near.iter().enumerate() {
            if let Some(q) = n {
                self.set_link(q, opposite(dir), Some(id));
            }
            if s.links[dir] != n {
                self.set_link(id, dir, n);
            }
        }
    }

    /// Take a piece out of the grid. Ray neighbours on both sides get linked
    /// to each other; knight neighbours lose their back link.
    pub fn unlink_piece(&mut self, id: PieceId) {
        let s = *self.board.slot(id);
        self.set_square(index(s.x, s.y), None);
        for dir in 0..16 {
            if let Some(q) = s.links[dir] {
                let bridged = if is_ray(dir) {
                    s.links[opposite(dir)]
                } else {
                    None
                };
                self.set_link(q, opposite(dir), bridged);
            }
        }
    }

    /// Apply a move. Legality is the caller's business; a move from an
    /// empty square is a programming error.
    pub fn do_move(&mut self, m: Move) {
        let Some(mover) = self.board.occupant(m.x1, m.y1) else {
            panic!("do_move from empty square: {m}");
        };
        let s = *self.board.slot(mover);
        let Some(piece) = s.piece else {
            panic!("grid references absent piece {mover}");
        };
        let target = self.board.occupant(m.x2, m.y2);

        let turn = self.board.turn;
        self.push_history(m);
        self.set_turn(turn.other());
        self.unlink_piece(mover);
        self.set_x(mover, m.x2);
        self.set_y(mover, m.y2);
        if s.can_castle {
            self.set_can_castle(mover, false);
        }

        let mut captured = target;
        match piece.kind {
            PieceKind::Pawn => {
                if m.y2 == piece.color.other().home_rank() {
                    self.set_piece(mover, Some(Piece::new(piece.color, PieceKind::Queen)));
                } else if m.x1 != m.x2 && target.is_none() {
                    captured = self.board.occupant(m.x2, m.y1);
                }
            }
            PieceKind::King if (m.x2 - m.x1).abs() > 1 => {
                let rook_x = if m.x2 > m.x1 { 7 } else { 0 };
                if let Some(rook) = self.board.occupant(rook_x, m.y1) {
                    self.unlink_piece(rook);
                    self.set_x(rook, (m.x1 + m.x2) / 2);
                    self.set_can_castle(rook, false);
                    self.link_piece(rook);
                }
            }
            _ => {}
        }

        if let Some(t) = captured {
            self.unlink_piece(t);
            self.set_piece(t, None);
        }
        self.link_piece(mover);

        let ep = (piece.kind == PieceKind::Pawn && (m.y2 - m.y1).abs() == 2).then_some(m.x2);
        if self.board.en_passant != ep {
            self.set_en_passant(ep);
        }
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
