use crate::board::Board;
use crate::takeback::{TakeBack, Tracked};
use crate::types::Move;

/// Deepest perft the take-back log has room for (one frame per ply plus
/// the legality probe below the last one).
pub const MAX_PERFT_DEPTH: u8 = 16;

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
/// The board is restored before returning.
pub fn perft(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    assert!(depth <= MAX_PERFT_DEPTH, "perft depth {depth} too deep");

    fn inner(t: &mut Tracked<'_>, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
        let (buf, rest) = layers
            .split_first_mut()
            .expect("perft requires one buffer per remaining ply");

        t.legal_moves_into(buf);
        if depth == 1 {
            return buf.len() as u64;
        }

        let mut nodes = 0u64;
        for mv in buf.iter().copied() {
            t.start();
            t.do_move(mv);
            nodes += inner(t, depth - 1, rest);
            t.take_back();
        }
        nodes
    }

    let mut log = TakeBack::new();
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(&mut Tracked::new(board, &mut log), depth, &mut layers[..])
}

/// Per-move leaf counts at the root, for locating move generation bugs.
pub fn divide(board: &mut Board, depth: u8) -> Vec<(Move, u64)> {
    let mut log = TakeBack::new();
    let mut moves = Vec::new();
    Tracked::new(board, &mut log).legal_moves_into(&mut moves);
    let mut out = Vec::with_capacity(moves.len());
    for mv in moves {
        let mut t = Tracked::new(board, &mut log);
        t.start();
        t.do_move(mv);
        let n = perft(t.board, depth.saturating_sub(1));
        t.take_back();
        out.push((mv, n));
    }
    out
}
