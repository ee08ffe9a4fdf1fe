//! Klondike Solitaire: card and pile model, move rules, and a game state
//! with undo, plus the pieces of a small terminal front end.

pub mod card;
pub mod command;
pub mod config;
pub mod game;
pub mod pile;
pub mod renderer;
pub mod rules;
pub mod state;

pub use card::{Card, Color, Rank, Suit};
pub use config::{Config, DrawMode};
pub use pile::{InsufficientCards, Pile, PileId, PileKind};
pub use rules::IllegalReason;
pub use state::{GameState, GameStatus, HistoryEntry, Move, MoveError, MoveReport, StockAction};
