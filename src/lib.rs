//! Time-bounded minimax / alpha-beta agent for Isolation-style games.

pub mod board;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod search;
pub mod state;

pub use board::{Board, Move, Player};
pub use clock::{Deadline, TimeRemaining};
pub use config::AgentConfig;
pub use engine::Engine;
pub use error::{BoardError, ConfigError, SearchError};
pub use eval::{Evaluator, HeuristicConfig, MobilityScore};
pub use search::{Search, SearchMethod};
pub use state::GameState;
