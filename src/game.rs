//! # Game Layer
//!
//! Turn order, win detection and a text form for actions, on top of the
//! [`Engine`]. The engine only knows whether a request is legal; `Game`
//! knows whose turn it is and when the game is over.
//!
//! ## Action Text
//! ```text
//! place <bug> <x> <y>
//! move <bug> <x> <y> <x2> <y2>
//! throw <x> <y> <tx> <ty> <dx> <dy>
//! pass
//! ```
//! Bugs are accepted by full name (`QueenBee`), short name (`queen`) or letter
//! (`Q`), case-insensitively.

use crate::board::Cell;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{ConfigError, RuleError};
use crate::piece::{Bug, Color};
use crate::GameState;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// One player's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Place { kind: Bug, to: Cell },
    Move { kind: Bug, from: Cell, to: Cell },
    /// Pillbug relocation: `actor` carries `target` to `to`
    Throw { actor: Cell, target: Cell, to: Cell },
    /// Only legal when nothing else is
    Pass,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Place { kind, to } => write!(f, "place {} {} {}", kind, to.x, to.y),
            Action::Move { kind, from, to } => {
                write!(f, "move {} {} {} {} {}", kind, from.x, from.y, to.x, to.y)
            }
            Action::Throw { actor, target, to } => write!(
                f,
                "throw {} {} {} {} {} {}",
                actor.x, actor.y, target.x, target.y, to.x, to.y
            ),
            Action::Pass => f.write_str("pass"),
        }
    }
}

/// Malformed action text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseActionError {
    #[error("empty input")]
    Empty,
    #[error("unknown action '{0}'")]
    UnknownVerb(String),
    #[error("'{verb}' expects {expected} arguments, got {got}")]
    WrongArity { verb: &'static str, expected: usize, got: usize },
    #[error("'{0}' is not a coordinate")]
    BadCoordinate(String),
    #[error("{0}")]
    BadBug(String),
}

fn parse_coords(args: &[&str]) -> Result<Vec<Cell>, ParseActionError> {
    let numbers = args
        .iter()
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| ParseActionError::BadCoordinate(s.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(numbers.chunks(2).map(|p| Cell::new(p[0], p[1])).collect())
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let (verb, args) = words.split_first().ok_or(ParseActionError::Empty)?;

        let arity = |name: &'static str, expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(ParseActionError::WrongArity { verb: name, expected, got: args.len() })
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "place" => {
                arity("place", 3)?;
                let kind = args[0].parse::<Bug>().map_err(ParseActionError::BadBug)?;
                let cells = parse_coords(&args[1..])?;
                Ok(Action::Place { kind, to: cells[0] })
            }
            "move" => {
                arity("move", 5)?;
                let kind = args[0].parse::<Bug>().map_err(ParseActionError::BadBug)?;
                let cells = parse_coords(&args[1..])?;
                Ok(Action::Move { kind, from: cells[0], to: cells[1] })
            }
            "throw" => {
                arity("throw", 6)?;
                let cells = parse_coords(args)?;
                Ok(Action::Throw { actor: cells[0], target: cells[1], to: cells[2] })
            }
            "pass" => {
                arity("pass", 0)?;
                Ok(Action::Pass)
            }
            other => Err(ParseActionError::UnknownVerb(other.to_string())),
        }
    }
}

/// Why an action was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("the game is already over")]
    GameOver,
    #[error("passing is only allowed when no other action is possible")]
    PassNotAllowed,
}

/// Current game status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// The other side's queen is surrounded
    Win(Color),
    /// Both queens surrounded by the same action
    Draw,
}

impl GameStatus {
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// A single entry in the action history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub player: Color,
    pub action: Action,
    /// 1-indexed
    pub turn: u32,
}

/// A game between two named players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    engine: Engine,
    current: Color,
    status: GameStatus,
    history: Vec<HistoryEntry>,
}

impl Game {
    pub fn new(
        config: EngineConfig,
        white: impl Into<String>,
        black: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: Engine::with_names(config, white, black)?,
            current: Color::White,
            status: GameStatus::InProgress,
            history: Vec::new(),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn current_player(&self) -> Color {
        self.current
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Number of the turn about to be played, starting at 1
    pub fn turn(&self) -> u32 {
        self.history.len() as u32 + 1
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Every action the current player may take. A lone `Pass` when nothing
    /// else is possible; empty once the game is over.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.status.is_game_over() {
            return Vec::new();
        }
        let actions = self.actions_without_pass();
        if actions.is_empty() {
            vec![Action::Pass]
        } else {
            actions
        }
    }

    fn actions_without_pass(&self) -> Vec<Action> {
        let color = self.current;
        let placements = self
            .engine
            .legal_placements(color)
            .into_iter()
            .map(|(kind, to)| Action::Place { kind, to });
        let moves = self
            .engine
            .legal_moves(color)
            .into_iter()
            .map(|(kind, from, to)| Action::Move { kind, from, to });
        let throws = self
            .engine
            .legal_throws(color)
            .into_iter()
            .map(|(actor, target, to)| Action::Throw { actor, target, to });
        placements.chain(moves).chain(throws).collect()
    }

    /// Plays `action` for the current player and hands the turn over.
    pub fn apply(&mut self, action: Action) -> Result<(), GameError> {
        if self.status.is_game_over() {
            return Err(GameError::GameOver);
        }
        let color = self.current;

        match action {
            Action::Place { kind, to } => {
                self.engine.request_placement(color, kind, to)?;
            }
            Action::Move { kind, from, to } => {
                self.engine.request_move(color, kind, from, to)?;
            }
            Action::Throw { actor, target, to } => {
                self.engine.request_pillbug_special(color, actor, target, to)?;
            }
            Action::Pass => {
                if !self.actions_without_pass().is_empty() {
                    return Err(GameError::PassNotAllowed);
                }
                self.engine.record_pass();
            }
        }

        let turn = self.turn();
        debug!(turn, player = %color, %action, "applied");
        self.history.push(HistoryEntry { player: color, action, turn });
        self.status = self.evaluate();
        if self.status.is_game_over() {
            info!(turn, status = ?self.status, "game over");
        }
        self.current = color.opponent();
        Ok(())
    }

    fn evaluate(&self) -> GameStatus {
        let white = self.engine.queen_surrounded(Color::White);
        let black = self.engine.queen_surrounded(Color::Black);
        match (white, black) {
            (true, true) => GameStatus::Draw,
            (true, false) => GameStatus::Win(Color::Black),
            (false, true) => GameStatus::Win(Color::White),
            (false, false) => GameStatus::InProgress,
        }
    }

    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Win(color) => Some(color),
            _ => None,
        }
    }
}

impl GameState for Game {
    type Move = Action;
    type Error = GameError;

    fn get_possible_moves(&self) -> Vec<Action> {
        self.legal_actions()
    }

    fn make_move(&mut self, mv: &Action) -> Result<(), GameError> {
        self.apply(*mv)
    }

    fn is_terminal(&self) -> bool {
        self.status.is_game_over()
    }

    fn get_winner(&self) -> Option<Color> {
        self.winner()
    }

    fn get_current_player(&self) -> Color {
        self.current
    }
}
