//! Play chess against the engine on the terminal.
//!
//! Usage:
//!   chess_cli [--config settings.toml] [--depth N]
//!
//! Set `RUST_LOG=chess_core=debug` to see search diagnostics on stderr.

mod commands;
mod config;
mod render;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use chess_core::{Machine, MAX_SEARCH_DEPTH};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, HELP, parse_command};
use crate::config::CliConfig;
use crate::render::render;

struct Args {
    config: Option<PathBuf>,
    depth: Option<u8>,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut out = Args {
        config: None,
        depth: None,
    };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let path = args.get(i + 1).context("--config needs a path")?;
                out.config = Some(PathBuf::from(path));
                i += 1;
            }
            "--depth" | "-d" => {
                let depth = args.get(i + 1).context("--depth needs a number")?;
                out.depth = Some(depth.parse().context("--depth needs a number")?);
                i += 1;
            }
            other => bail!("unknown argument '{other}'"),
        }
        i += 1;
    }
    Ok(out)
}

struct Session {
    machine: Machine,
}

enum Flow {
    Continue,
    Quit,
}

impl Session {
    fn new(config: &CliConfig) -> anyhow::Result<Self> {
        let mut machine = Machine::new();
        machine.set_search_depth(config.search_depth)?;
        machine.set_variety(config.variety);
        machine.set_weights(config.weights);
        machine.set_human_white(config.human_white);
        Ok(Self { machine })
    }

    fn handle(&mut self, cmd: Command, out: &mut impl Write) -> anyhow::Result<Flow> {
        match cmd {
            Command::Play(mv) => {
                if self.game_over() {
                    bail!("the game is over, start a new one with 'n'");
                }
                if !self.machine.is_legal_move(mv) {
                    bail!("illegal move {mv}");
                }
                self.machine.do_move(mv);
                self.reply(out)?;
            }
            Command::NewGame => {
                self.machine.start_new_game();
                self.reply(out)?;
            }
            Command::Undo => {
                self.machine.undo_move();
                if !self.machine.is_human_on() {
                    self.machine.undo_move();
                }
                writeln!(out, "{}", render(&self.machine))?;
            }
            Command::Hint => match self.machine.search_move() {
                Some(found) => writeln!(out, "hint: {} ({})", found.best_move, found.score)?,
                None => writeln!(out, "no legal moves")?,
            },
            Command::Depth(depth) => {
                self.machine.set_search_depth(depth)?;
                writeln!(out, "search depth {depth} (max {MAX_SEARCH_DEPTH})")?;
            }
            Command::Flip => {
                let white = !self.machine.is_human_white();
                self.machine.set_human_white(white);
                writeln!(out, "you play {}", if white { "white" } else { "black" })?;
                self.reply(out)?;
            }
            Command::Fen(fen) => {
                self.machine.set_position_from_fen(&fen)?;
                self.reply(out)?;
            }
            Command::Save(path) => {
                self.machine.save(&path)?;
                writeln!(out, "saved to {}", path.display())?;
            }
            Command::Load(path) => {
                self.machine.load(&path)?;
                writeln!(out, "loaded {}", path.display())?;
                self.reply(out)?;
            }
            Command::Print => writeln!(out, "{}", render(&self.machine))?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(out, "{HELP}")?,
        }
        Ok(Flow::Continue)
    }

    fn game_over(&self) -> bool {
        self.machine.is_mate() || self.machine.is_draw() || self.machine.is_endless()
    }

    /// Let the engine move while it is its turn, then show the position.
    fn reply(&mut self, out: &mut impl Write) -> anyhow::Result<()> {
        if !self.machine.is_human_on() && !self.game_over() {
            self.machine.start_searching(true);
            let mut slices = 1u32;
            while !self.machine.continue_searching() {
                slices += 1;
            }
            let found = self.machine.end_searching();
            debug!(slices, "engine search finished");
            if let Some(found) = found {
                self.machine.do_move(found.best_move);
                writeln!(out, "engine plays {}", found.best_move)?;
            }
        }
        writeln!(out, "{}", render(&self.machine))?;
        self.report(out)
    }

    fn report(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let m = &self.machine;
        if m.is_mate() {
            let winner = if m.is_white_on() { "Black" } else { "White" };
            writeln!(out, "Checkmate, {winner} wins.")?;
        } else if m.is_draw() {
            writeln!(out, "Draw.")?;
        } else if m.is_endless() {
            writeln!(out, "The game has gone on too long, call it a draw.")?;
        } else if m.is_check() {
            writeln!(out, "Check.")?;
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&args)?;
    let mut config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if let Some(depth) = args.depth {
        config.search_depth = depth;
    }
    info!(?config, "starting");

    let mut session = Session::new(&config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "Type '?' for help.")?;
    session.reply(&mut stdout)?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let flow = match parse_command(&line) {
            Ok(Some(cmd)) => session.handle(cmd, &mut stdout),
            Ok(None) => Ok(Flow::Continue),
            Err(e) => Err(e),
        };
        match flow {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => writeln!(stdout, "error: {e:#}")?,
        }
        stdout.flush()?;
    }
    Ok(())
}
