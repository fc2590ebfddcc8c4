use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
    /// Rank step of this side's pawns.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
    pub fn home_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
    pub fn pawn_rank(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }
    /// Arena slots owned by this side: white 0..16, black 16..32.
    pub fn slots(self) -> std::ops::Range<usize> {
        let base = self.idx() * SLOTS_PER_SIDE;
        base..base + SLOTS_PER_SIDE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn idx(self) -> usize {
        self as usize
    }

    /// Fixed material value, also used as capture value in exchanges.
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 2,
            PieceKind::Knight => 5,
            PieceKind::Bishop => 5,
            PieceKind::Rook => 10,
            PieceKind::Queen => 20,
            PieceKind::King => 40,
        }
    }

    pub fn slides_straight(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen)
    }

    pub fn slides_diagonally(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen)
    }

    pub fn is_slider(self) -> bool {
        self.slides_straight() || self.slides_diagonally()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Occupant code for renderers: 1..=6 white pawn..king, 7..=12 black.
    pub fn code(self) -> u8 {
        let base = self.kind.idx() as u8 + 1;
        match self.color {
            Color::White => base,
            Color::Black => base + 6,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Piece> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match ch.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(Piece { color, kind })
    }

    pub fn fen_char(self) -> char {
        let ch = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }
}

/// Stable index of a piece in the board's arena.
pub type PieceId = u8;

pub const PIECE_SLOTS: usize = 32;
pub const SLOTS_PER_SIDE: usize = 16;

/// A move as source and destination coordinates. Castling, en passant and
/// promotion (always to a queen) are implied by the pieces involved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Move {
    pub x1: i8,
    pub y1: i8,
    pub x2: i8,
    pub y2: i8,
}

impl Move {
    pub const fn new(x1: i8, y1: i8, x2: i8, y2: i8) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn is_on_board(self) -> bool {
        on_board(self.x1, self.y1) && on_board(self.x2, self.y2)
    }
}

/// Link directions. Even entries are rays (0 = +x, then counter-clockwise in
/// 45 degree steps), odd entries are the knight jumps lying between them.
pub const DIRECTIONS: [(i8, i8); 16] = [
    (1, 0),
    (2, 1),
    (1, 1),
    (1, 2),
    (0, 1),
    (-1, 2),
    (-1, 1),
    (-2, 1),
    (-1, 0),
    (-2, -1),
    (-1, -1),
    (-1, -2),
    (0, -1),
    (1, -2),
    (1, -1),
    (2, -1),
];

pub const STRAIGHT_RAYS: [usize; 4] = [0, 4, 8, 12];
pub const DIAGONAL_RAYS: [usize; 4] = [2, 6, 10, 14];
pub const KNIGHT_JUMPS: [usize; 8] = [1, 3, 5, 7, 9, 11, 13, 15];

pub const fn opposite(dir: usize) -> usize {
    (dir + 8) & 15
}

pub const fn is_ray(dir: usize) -> bool {
    dir & 1 == 0
}

pub const fn is_straight(dir: usize) -> bool {
    dir & 3 == 0
}

// Helpers
pub fn on_board(x: i8, y: i8) -> bool {
    (0..8).contains(&x) && (0..8).contains(&y)
}

pub fn sq(x: i8, y: i8) -> Option<usize> {
    if on_board(x, y) {
        Some(index(x, y))
    } else {
        None
    }
}

/// Grid index of an on-board square.
pub fn index(x: i8, y: i8) -> usize {
    (y as usize) * 8 + (x as usize)
}

/// Distance from the nearest edge, 0 on the rim and 3 in the centre.
pub fn centrality(x: i8, y: i8) -> i32 {
    let cx = x.min(7 - x);
    let cy = y.min(7 - y);
    cx.min(cy) as i32
}

/// Number of squares from (x, y) to the board edge along a direction.
pub fn edge_distance(x: i8, y: i8, dir: usize) -> i8 {
    let (dx, dy) = DIRECTIONS[dir];
    let fx = match dx.signum() {
        1 => 7 - x,
        -1 => x,
        _ => 7,
    };
    let fy = match dy.signum() {
        1 => 7 - y,
        -1 => y,
        _ => 7,
    };
    fx.min(fy)
}

pub fn coord_to_string(x: i8, y: i8) -> String {
    let f = (b'a' + x as u8) as char;
    let r = (b'1' + y as u8) as char;
    format!("{f}{r}")
}

pub fn string_to_coord(c: &str) -> Option<(i8, i8)> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0].to_ascii_lowercase();
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    Some(((f - b'a') as i8, (r - b'1') as i8))
}
