use std::path::PathBuf;

use anyhow::{Context, bail};
use chess_core::{Move, parse_move};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(Move),
    NewGame,
    Undo,
    Hint,
    Depth(u8),
    Flip,
    Fen(String),
    Save(PathBuf),
    Load(PathBuf),
    Print,
    Quit,
    Help,
}

pub const HELP: &str = "\
Commands:
  e2e4        play a move (from square, to square)
  n           new game
  u           take back until it is your turn again
  h           hint: show the engine's choice for you
  d N         set search depth (0..8)
  f           swap sides with the engine
  fen FEN     set up a position
  s PATH      save the game
  l PATH      load a game
  p           print the board
  q           quit
  ?           this help";

pub fn parse_command(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    let Some((word, rest)) = split_word(line) else {
        return Ok(None);
    };
    let cmd = match word {
        "n" => Command::NewGame,
        "u" => Command::Undo,
        "h" => Command::Hint,
        "f" => Command::Flip,
        "p" => Command::Print,
        "q" | "quit" => Command::Quit,
        "?" | "help" => Command::Help,
        "d" => {
            let depth = rest
                .parse()
                .with_context(|| format!("depth must be a number, got '{rest}'"))?;
            Command::Depth(depth)
        }
        "fen" => {
            if rest.is_empty() {
                bail!("fen needs a position");
            }
            Command::Fen(rest.to_string())
        }
        "s" | "l" => {
            if rest.is_empty() {
                bail!("'{word}' needs a file name");
            }
            let path = PathBuf::from(rest);
            if word == "s" {
                Command::Save(path)
            } else {
                Command::Load(path)
            }
        }
        _ => Command::Play(parse_move(line).with_context(|| format!("unknown command '{line}'"))?),
    };
    Ok(Some(cmd))
}

fn split_word(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() {
        return None;
    }
    Some(match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    })
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
