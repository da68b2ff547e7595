//! Gambit: play chess in the terminal by typing moves.

mod config;
mod render;
mod session;

use anyhow::Context;
use chess_rules::Game;
use clap::Parser;
use config::TermConfig;
use render::RenderOptions;
use session::{Reply, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gambit")]
#[command(about = "Play chess in the terminal")]
struct Args {
    /// Start from this FEN instead of the standard position
    #[arg(long)]
    fen: Option<String>,
    /// Settings file [default: gambit.toml]
    #[arg(long)]
    config: Option<PathBuf>,
    /// Draw Black at the bottom
    #[arg(long)]
    flip: bool,
    /// Plain letters instead of chess glyphs
    #[arg(long)]
    ascii: bool,
    /// List the legal moves after every move
    #[arg(long)]
    show_moves: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(TermConfig::default_path);
    let config = TermConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let game = match args.fen.as_deref().or(config.start_fen.as_deref()) {
        Some(fen) => Game::from_fen(fen).with_context(|| format!("invalid FEN: {fen}"))?,
        None => Game::new(),
    };
    let render = RenderOptions {
        unicode: config.unicode && !args.ascii,
        flipped: config.flip_board || args.flip,
    };
    tracing::info!(fen = %game.to_fen(), "starting session");

    let mut session = Session::new(game, render, config.show_moves || args.show_moves);
    run(&mut session, io::stdin().lock(), io::stdout().lock())?;

    let game = session.game();
    tracing::info!(plies = game.ply_count(), outcome = %game.outcome(), "session ended");
    Ok(())
}

fn run(session: &mut Session, input: impl BufRead, mut out: impl Write) -> anyhow::Result<()> {
    writeln!(out, "{}", session.screen())?;
    write!(out, "Enter a move (help for commands): ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("reading input")?;
        match session.handle(&line) {
            Reply::Exit => break,
            Reply::Continue(text) => {
                if !text.is_empty() {
                    writeln!(out, "{text}")?;
                }
            }
            Reply::Redraw(text) => {
                if !text.is_empty() {
                    writeln!(out, "{text}")?;
                }
                writeln!(out, "{}", session.screen())?;
            }
        }
        write!(out, "Enter a move (help for commands): ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}
