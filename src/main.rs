use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use serde_json::json;

use isolation_engine::{
    AgentConfig, Board, BoardError, ConfigError, Deadline, Engine, Evaluator, GameState, Move,
    Player,
};

/// Plays one game of Isolation between two search agents and prints the result as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value_t = 7)]
    width: usize,
    #[arg(long, default_value_t = 7)]
    height: usize,
    /// Time each agent gets per move, in milliseconds
    #[arg(long, default_value_t = 150)]
    move_time_ms: u64,
    /// JSON agent config for player one
    #[arg(long)]
    config_one: Option<PathBuf>,
    /// JSON agent config for player two
    #[arg(long)]
    config_two: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: log::Level,
}

struct Game {
    board: Board,
    engines: [Engine<Box<dyn Evaluator<Board>>>; 2],
    history: Vec<Move>,
}

impl Game {
    fn new(board: Board, configs: [AgentConfig; 2]) -> Result<Self, ConfigError> {
        let [one, two] = configs;
        Ok(Self {
            engines: [Engine::for_board(&one, &board)?, Engine::for_board(&two, &board)?],
            board,
            history: Vec::new(),
        })
    }
}

fn load_config(path: Option<&Path>) -> Result<AgentConfig, ConfigError> {
    match path {
        Some(path) => AgentConfig::load(path),
        None => Ok(AgentConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    simple_logger::init_with_level(args.log_level)?;

    let configs = [
        load_config(args.config_one.as_deref())?,
        load_config(args.config_two.as_deref())?,
    ];
    let mut game = Game::new(Board::new(args.width, args.height), configs)?;
    let budget = Duration::from_millis(args.move_time_ms);
    info!("Starting {}x{} game, {:?} per move", args.width, args.height, budget);

    let loser = loop {
        if let Some(loser) = make_engine_move(&mut game, budget)? {
            break loser;
        }
    };
    let winner = loser.other();
    info!("{} wins after {} moves", winner, game.history.len());

    let result = json!({
        "winner": winner,
        "loser": loser,
        "moves": game.history,
        "board": game.board,
    });
    println!("{}", result);
    Ok(())
}

/// Plays one move for the side to move. Returns the losing player once the game is over.
fn make_engine_move(game: &mut Game, budget: Duration) -> Result<Option<Player>, BoardError> {
    let player = game.board.active_player();
    let legal_moves = game.board.legal_moves();
    let deadline = Deadline::after(budget);
    let selected = game.engines[player.index()].select_move(&game.board, &legal_moves, &deadline);

    if deadline.is_expired() {
        warn!("{} ran out of time", player);
        return Ok(Some(player));
    }
    match selected {
        None => {
            info!("{} has no legal moves", player);
            Ok(Some(player))
        }
        Some(move_) => {
            game.board = game.board.make_move(move_)?;
            game.history.push(move_);
            info!("{} moves to {}", player, move_);
            Ok(None)
        }
    }
}
