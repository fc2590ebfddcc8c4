use std::fmt::Write;

use chess_core::Machine;

/// Plain ASCII board, white at the bottom. Upper case is white.
pub fn render(machine: &Machine) -> String {
    let board = machine.board();
    let mut out = String::new();
    for y in (0..8i8).rev() {
        let _ = write!(out, "{} ", y + 1);
        for x in 0..8i8 {
            let ch = match board.piece_at(x, y) {
                Some(p) => p.fen_char(),
                None if (x + y) % 2 == 0 => '.',
                None => ' ',
            };
            out.push(' ');
            out.push(ch);
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h\n");

    let side = if machine.is_white_on() { "White" } else { "Black" };
    let _ = write!(out, "{side} to move");
    if let Some(m) = machine.last_move() {
        let _ = write!(out, ", last move {m}");
    }
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
