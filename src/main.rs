//! # Hive - Terminal Front End
//!
//! Interactive two-player Hive at the terminal, or seeded random self-play for
//! exercising the rules engine.
//!
//! ## Usage
//! ```text
//! play --white Ada --black Bob
//! play --autoplay 100 --seed 7 --threads 8
//! RUST_LOG=hive=debug play
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use hive::{
    random_playout, Action, Bug, Cell, Color, Engine, EngineConfig, Game, GameStatus,
    MimicryPolicy, PieceSet, Playout,
};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Side length of the square board window
    #[clap(long, default_value_t = 10)]
    board_size: i32,

    /// Play without the Ladybug, Mosquito and Pillbug
    #[clap(long, action = clap::ArgAction::SetTrue)]
    base_only: bool,

    /// Count off-board neighbours as occupied when checking a queen
    #[clap(long, action = clap::ArgAction::SetTrue)]
    edge_occupied: bool,

    /// Forbid placing a Beetle directly on top of the hive
    #[clap(long, action = clap::ArgAction::SetTrue)]
    no_beetle_drop: bool,

    /// A Mosquito permanently becomes the kind it mimics
    #[clap(long, action = clap::ArgAction::SetTrue)]
    persistent_mimicry: bool,

    /// Placement by which the queen must be down (0 disables)
    #[clap(long, default_value_t = 4)]
    queen_deadline: u8,

    /// Worker threads for move generation and self-play (default: all cores)
    #[clap(short = 'n', long)]
    threads: Option<usize>,

    /// Play this many random games instead of an interactive one
    #[clap(long)]
    autoplay: Option<usize>,

    /// Seed for self-play; game `i` uses `seed + i`
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Turn limit for each self-play game
    #[clap(long, default_value_t = 300)]
    max_turns: usize,

    #[clap(long, default_value = "White")]
    white: String,

    #[clap(long, default_value = "Black")]
    black: String,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            board_size: self.board_size,
            piece_set: if self.base_only { PieceSet::Base } else { PieceSet::Expansion },
            edge_counts_as_occupied: self.edge_occupied,
            beetle_drop: !self.no_beetle_drop,
            mimicry: if self.persistent_mimicry {
                MimicryPolicy::Persistent
            } else {
                MimicryPolicy::Transient
            },
            queen_deadline: self.queen_deadline,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let threads = args.threads.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("failed to start the worker pool")?;

    let config = args.config();
    config.validate().context("invalid board configuration")?;
    info!(?config, threads, "starting");

    match args.autoplay {
        Some(games) => autoplay(&args, config, games),
        None => interactive(&args, config),
    }
}

/// Runs `games` seeded random games in parallel and prints a summary.
fn autoplay(args: &Args, config: EngineConfig, games: usize) -> Result<()> {
    let results: Vec<Playout<Game>> = (0..games)
        .into_par_iter()
        .map(|i| -> Result<Playout<Game>> {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(args.seed.wrapping_add(i as u64));
            let game = new_game(args, &config)?;
            let playout = random_playout(game, &mut rng, args.max_turns)
                .with_context(|| format!("self-play game {} refused its own move", i))?;
            Ok(playout)
        })
        .collect::<Result<_>>()?;

    let (mut white, mut black, mut draws, mut unfinished) = (0, 0, 0, 0);
    for (i, playout) in results.iter().enumerate() {
        let turns = playout.moves.len();
        let outcome = match playout.state.status() {
            GameStatus::Win(Color::White) => {
                white += 1;
                format!("{} wins", args.white).bold().to_string()
            }
            GameStatus::Win(Color::Black) => {
                black += 1;
                format!("{} wins", args.black).bold().to_string()
            }
            GameStatus::Draw => {
                draws += 1;
                "draw".yellow().to_string()
            }
            GameStatus::InProgress => {
                unfinished += 1;
                "unfinished".dimmed().to_string()
            }
        };
        println!("game {:>4} (seed {}): {} after {} turns", i, args.seed.wrapping_add(i as u64), outcome, turns);
    }

    println!("------------------------------------");
    println!("{}: {}", args.white, white);
    println!("{}: {}", args.black, black);
    println!("Draws: {}", draws);
    println!("Unfinished: {}", unfinished);
    Ok(())
}

/// A fresh game with the configured names; also what `restart` plays next.
fn new_game(args: &Args, config: &EngineConfig) -> Result<Game> {
    Ok(Game::new(config.clone(), args.white.as_str(), args.black.as_str())?)
}

fn interactive(args: &Args, config: EngineConfig) -> Result<()> {
    let mut game = new_game(args, &config)?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{}", render_board(game.engine())?);
    print_help();

    loop {
        let player = game.engine().player(game.current_player());
        print!("[{}] {} ({})> ", game.turn(), player.name(), paint_color(player.color()));
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let line = line.trim();
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["help"] => print_help(),
            ["restart"] => {
                game = new_game(args, &config)?;
                info!("game restarted");
                println!("{}", render_board(game.engine())?);
            }
            ["board"] => println!("{}", render_board(game.engine())?),
            ["hand"] => print_hand(&game),
            ["actions"] => {
                for action in game.legal_actions() {
                    println!("  {}", action);
                }
            }
            ["moves", x, y] => match (x.parse::<i32>(), y.parse::<i32>()) {
                (Ok(x), Ok(y)) => match game.engine().query_legal_destinations(Cell::new(x, y)) {
                    Ok(cells) if cells.is_empty() => println!("  no moves"),
                    Ok(cells) => {
                        let list: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                        println!("  {}", list.join(" "));
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                },
                _ => println!("{}", "usage: moves <x> <y>".red()),
            },
            _ => match line.parse::<Action>() {
                Ok(action) => match game.apply(action) {
                    Ok(()) => {
                        println!("{}", render_board(game.engine())?);
                        if game.status().is_game_over() {
                            announce(&game);
                            println!("Type 'restart' for a new game or 'quit' to leave.");
                        }
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                },
                Err(e) => println!("{}", e.to_string().red()),
            },
        }
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  place <bug> <x> <y>               put a piece from your hand on the board");
    println!("  move <bug> <x> <y> <x2> <y2>      move your visible piece");
    println!("  throw <x> <y> <tx> <ty> <dx> <dy> use the Pillbug at (x,y) to carry (tx,ty) to (dx,dy)");
    println!("  pass                              only when nothing else is possible");
    println!("  moves <x> <y>                     where the piece at (x,y) can go");
    println!("  restart                           start a new game with the same settings");
    println!("  actions | board | hand | help | quit");
    println!("Bugs: queen beetle grasshopper spider ant ladybug mosquito pillbug (or first letter)");
}

fn print_hand(game: &Game) {
    let player = game.engine().player(game.current_player());
    let hand: Vec<String> = Bug::ALL
        .iter()
        .filter(|bug| player.inventory().contains_key(*bug))
        .map(|bug| format!("{} x{}", bug, player.remaining(*bug)))
        .collect();
    println!("  {}", hand.join(", "));
}

fn announce(game: &Game) {
    let message = match game.status() {
        GameStatus::Win(color) => {
            format!("{} wins!", game.engine().player(color).name()).green().bold()
        }
        GameStatus::Draw => "Both queens are surrounded: draw.".yellow().bold(),
        GameStatus::InProgress => return,
    };
    println!("{}", message);
}

fn paint_color(color: Color) -> colored::ColoredString {
    match color {
        Color::White => color.to_string().bright_white().bold(),
        Color::Black => color.to_string().cyan().bold(),
    }
}

/// The board's text layout with pieces coloured by owner.
fn render_board(engine: &Engine) -> Result<String> {
    let mut out = String::new();
    engine.board().render_with(&mut out, |piece| {
        let code = piece.code();
        match piece.owner {
            Color::White => code.bright_white().bold().to_string(),
            Color::Black => code.cyan().bold().to_string(),
        }
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_build_config() {
        let args = Args::parse_from(["play", "--base-only", "--queen-deadline", "0", "--board-size", "8"]);
        let config = args.config();
        assert_eq!(config.piece_set, PieceSet::Base);
        assert_eq!(config.queen_deadline, 0);
        assert_eq!(config.board_size, 8);
        assert!(config.beetle_drop);
    }

    #[test]
    fn test_restart_starts_over() {
        let args = Args::parse_from(["play", "--white", "Ada"]);
        let config = args.config();
        let mut game = new_game(&args, &config).unwrap();
        let fresh = game.clone();
        game.apply("place queen 4 4".parse().unwrap()).unwrap();
        assert_ne!(game, fresh);

        game = new_game(&args, &config).unwrap();
        assert_eq!(game, fresh);
        assert_eq!(game.engine().player(Color::White).name(), "Ada");
    }

    #[test]
    fn test_render_board_matches_plain_layout() {
        colored::control::set_override(false);
        let mut engine = Engine::default();
        engine.request_placement(Color::White, Bug::Queen, Cell::new(1, 1)).unwrap();
        engine.request_placement(Color::Black, Bug::Beetle, Cell::new(1, 1)).unwrap();
        let text = render_board(&engine).unwrap();
        assert_eq!(text, engine.board().to_string());
        assert!(text.contains("Bb^"));
    }
}
