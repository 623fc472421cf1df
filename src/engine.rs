use std::time::Duration;

use log::debug;

use crate::board::Board;
use crate::clock::TimeRemaining;
use crate::config::AgentConfig;
use crate::error::{ConfigError, SearchError};
use crate::eval::Evaluator;
use crate::search::{Search, SearchMethod};
use crate::state::GameState;

/// Picks moves under a deadline, either with one fixed-depth search or by
/// iterative deepening.
pub struct Engine<E> {
    method: SearchMethod,
    iterative: bool,
    search_depth: u32,
    max_depth: Option<u32>,
    threshold: Duration,
    evaluator: E,
}

impl Engine<Box<dyn Evaluator<Board>>> {
    /// Builds an engine scoring positions with the configured heuristic for `board`.
    pub fn for_board(config: &AgentConfig, board: &Board) -> Result<Self, ConfigError> {
        Self::new(config, config.heuristic.build(board))
    }
}

impl<E> Engine<E> {
    pub fn new(config: &AgentConfig, evaluator: E) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            method: config.method,
            iterative: config.iterative,
            search_depth: config.search_depth,
            max_depth: config.max_depth,
            threshold: config.timer_threshold(),
            evaluator,
        })
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Chooses one of `legal_moves` for the player to move in `state`, returning
    /// before `time_left` runs out. `None` only when there is nothing to play.
    ///
    /// When a search is cut short the move from the last fully searched depth is
    /// kept; if not even depth one finished, the first legal move is played.
    pub fn select_move<S, T>(
        &self,
        state: &S,
        legal_moves: &[S::Move],
        time_left: &T,
    ) -> Option<S::Move>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeRemaining + ?Sized,
    {
        let &first = legal_moves.first()?;
        if time_left.time_left() < self.threshold {
            debug!("no time to search, playing {:?}", first);
            return Some(first);
        }

        let mut search =
            Search::new(&self.evaluator, time_left, self.threshold, state.active_player());
        let mut best = first;
        let outcome = if self.iterative {
            self.deepen(&mut search, state, &mut best)
        } else {
            search.run(self.method, state, self.search_depth).map(|(score, mv)| {
                if let Some(mv) = mv {
                    best = mv;
                }
                debug!("depth {} search scored {} for {:?}", self.search_depth, score, best);
            })
        };

        match outcome {
            Ok(()) => {}
            Err(SearchError::Timeout) => {
                debug!("search timed out after {} nodes, keeping {:?}", search.nodes(), best);
            }
            Err(SearchError::InvalidDepth) => {
                unreachable!("search depths are validated when the engine is built")
            }
        }
        Some(best)
    }

    fn deepen<S, T>(
        &self,
        search: &mut Search<'_, S, E, T>,
        state: &S,
        best: &mut S::Move,
    ) -> Result<(), SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeRemaining + ?Sized,
    {
        let cap = self.max_depth.unwrap_or_else(|| depth_cap(state));
        for depth in 1..=cap {
            let (score, mv) = search.run(self.method, state, depth)?;
            if let Some(mv) = mv {
                *best = mv;
            }
            debug!(
                "depth {} complete: score {} for {:?}, {} nodes",
                depth,
                score,
                best,
                search.nodes()
            );
            if !search.horizon_reached() {
                debug!("game tree exhausted at depth {}", depth);
                break;
            }
        }
        Ok(())
    }
}

// No game lasts longer than there are cells to occupy.
fn depth_cap<S: GameState>(state: &S) -> u32 {
    u32::try_from(state.width() * state.height()).unwrap_or(u32::MAX).max(1)
}
