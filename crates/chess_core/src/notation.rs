//! Coordinate move text: "e2e4". Castling is written as the king's two-file
//! step ("e1g1"); promotion needs no suffix since it is always to a queen.

use std::fmt;
use std::str::FromStr;

use crate::error::MoveTextError;
use crate::types::*;

pub fn format_move(m: Move) -> String {
    let mut s = coord_to_string(m.x1, m.y1);
    s.push_str(&coord_to_string(m.x2, m.y2));
    s
}

/// Parse move text. Files may be upper case; trailing whitespace is allowed.
/// The first square must start the text.
pub fn parse_move(text: &str) -> Result<Move, MoveTextError> {
    let out_of_range = || MoveTextError::OutOfRange(text.to_string());
    if text.starts_with(char::is_whitespace) {
        return Err(out_of_range());
    }
    let head = text.trim_end();
    let len = head.chars().count();
    if len < 4 {
        return Err(MoveTextError::WrongLength(len));
    }
    if len > 4 {
        return Err(MoveTextError::TrailingGarbage(text.to_string()));
    }
    if !head.is_ascii() {
        return Err(out_of_range());
    }
    let (x1, y1) = string_to_coord(&head[0..2]).ok_or_else(out_of_range)?;
    let (x2, y2) = string_to_coord(&head[2..4]).ok_or_else(out_of_range)?;
    Ok(Move::new(x1, y1, x2, y2))
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            f.write_str(&format_move(*self))
        } else {
            write!(f, "({},{})-({},{})", self.x1, self.y1, self.x2, self.y2)
        }
    }
}

impl FromStr for Move {
    type Err = MoveTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_move(s)
    }
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
