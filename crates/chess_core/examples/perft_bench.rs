//! Time move generation and the take-back log with perft.
//!
//! Usage:
//!   cargo run --release --example perft_bench -p chess_core -- [depth] [fen] [--divide]
//!
//! Without a FEN every built-in position is counted. `--divide` prints the
//! leaf count below each root move, which is what you compare against
//! another engine when a total disagrees.

use std::env;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use chess_core::{Board, divide, perft};

/// Positions whose lines stay free of under-promotions at bench depths.
const POSITIONS: &[(&str, &str)] = &[
    ("start", chess_core::START_FEN),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
    ),
    ("rook endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -"),
    (
        "italian",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - -",
    ),
];

fn rate(nodes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { nodes as f64 / secs } else { 0.0 }
}

fn count(label: &str, board: &mut Board, depth: u8, split: bool) -> (u64, Duration) {
    let start = Instant::now();
    let nodes = if split {
        let mut total = 0;
        for (mv, n) in divide(board, depth) {
            println!("  {mv}: {n}");
            total += n;
        }
        total
    } else {
        perft(board, depth)
    };
    let elapsed = start.elapsed();
    println!(
        "{label:<16} depth {depth}: {nodes:>10} nodes in {elapsed:>9.3?} ({:.0} nps)",
        rate(nodes, elapsed)
    );
    (nodes, elapsed)
}

fn main() -> ExitCode {
    let mut split = false;
    let mut rest = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--divide" {
            split = true;
        } else {
            rest.push(arg);
        }
    }
    let depth: u8 = rest.first().and_then(|s| s.parse().ok()).unwrap_or(4);

    if let Some(fen) = rest.get(1) {
        let mut board = match Board::from_fen(fen) {
            Ok(board) => board,
            Err(e) => {
                eprintln!("bad FEN: {e}");
                return ExitCode::FAILURE;
            }
        };
        count("position", &mut board, depth, split);
        return ExitCode::SUCCESS;
    }

    let mut nodes = 0;
    let mut time = Duration::ZERO;
    for (label, fen) in POSITIONS {
        let Ok(mut board) = Board::from_fen(fen) else {
            eprintln!("skipping {label}: bad FEN");
            continue;
        };
        let (n, t) = count(label, &mut board, depth, split);
        nodes += n;
        time += t;
    }
    println!("total: {nodes} nodes in {time:.3?} ({:.0} nps)", rate(nodes, time));
    ExitCode::SUCCESS
}
