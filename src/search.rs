use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::TimeRemaining;
use crate::error::SearchError;
use crate::eval::Evaluator;
use crate::state::GameState;

/// A branch value together with the move that leads to it. `None` means the
/// player to move had no legal moves.
pub type Scored<M> = (f64, Option<M>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    #[default]
    Minimax,
    AlphaBeta,
}

fn improves(maximizing: bool, score: f64, best: f64) -> bool {
    if maximizing { score > best } else { score < best }
}

/// One depth-limited search from the point of view of `player`.
///
/// Every node visit first consults the time oracle; once the remaining time drops
/// below `threshold` the whole search unwinds with [`SearchError::Timeout`].
pub struct Search<'a, S: GameState, E: ?Sized, T: ?Sized> {
    evaluator: &'a E,
    time_left: &'a T,
    threshold: Duration,
    player: S::Player,
    nodes: u64,
    horizon_reached: bool,
}

impl<'a, S, E, T> Search<'a, S, E, T>
where
    S: GameState,
    E: Evaluator<S> + ?Sized,
    T: TimeRemaining + ?Sized,
{
    pub fn new(evaluator: &'a E, time_left: &'a T, threshold: Duration, player: S::Player) -> Self {
        Self {
            evaluator,
            time_left,
            threshold,
            player,
            nodes: 0,
            horizon_reached: false,
        }
    }

    /// Nodes visited since this search was created, across all runs.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Whether the last run scored any position at its depth limit. When it did
    /// not, every line ended in a terminal position and searching deeper cannot
    /// change the result.
    pub fn horizon_reached(&self) -> bool {
        self.horizon_reached
    }

    /// Searches `state` to `depth` plies with a fresh alpha-beta window.
    pub fn run(
        &mut self,
        method: SearchMethod,
        state: &S,
        depth: u32,
    ) -> Result<Scored<S::Move>, SearchError> {
        self.horizon_reached = false;
        match method {
            SearchMethod::Minimax => self.minimax(state, depth, true),
            SearchMethod::AlphaBeta => {
                self.alphabeta(state, depth, f64::NEG_INFINITY, f64::INFINITY, true)
            }
        }
    }

    fn visit(&mut self, depth: u32) -> Result<(), SearchError> {
        self.nodes += 1;
        if self.time_left.time_left() < self.threshold {
            return Err(SearchError::Timeout);
        }
        if depth == 0 {
            return Err(SearchError::InvalidDepth);
        }
        Ok(())
    }

    fn leaf(&mut self, state: &S) -> f64 {
        self.horizon_reached = true;
        self.evaluator.evaluate(state, self.player)
    }

    /// Plain minimax. Ties keep the earliest move in legal-move order.
    pub fn minimax(
        &mut self,
        state: &S,
        depth: u32,
        maximizing: bool,
    ) -> Result<Scored<S::Move>, SearchError> {
        self.visit(depth)?;

        let moves = state.legal_moves();
        let Some(&first) = moves.first() else {
            return Ok((self.evaluator.evaluate(state, self.player), None));
        };

        let mut best = (if maximizing { f64::NEG_INFINITY } else { f64::INFINITY }, first);
        for mv in moves {
            let child = state.forecast(mv);
            let score = if depth == 1 {
                self.leaf(&child)
            } else {
                self.minimax(&child, depth - 1, !maximizing)?.0
            };
            if improves(maximizing, score, best.0) {
                best = (score, mv);
            }
        }
        Ok((best.0, Some(best.1)))
    }

    /// Minimax with alpha-beta pruning. `alpha` is the value the maximizer is
    /// already guaranteed, `beta` the value the minimizer is.
    pub fn alphabeta(
        &mut self,
        state: &S,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> Result<Scored<S::Move>, SearchError> {
        self.visit(depth)?;

        let moves = state.legal_moves();
        let Some(&first) = moves.first() else {
            return Ok((self.evaluator.evaluate(state, self.player), None));
        };

        let mut best = (if maximizing { f64::NEG_INFINITY } else { f64::INFINITY }, first);
        for mv in moves {
            let child = state.forecast(mv);
            let score = if depth == 1 {
                self.leaf(&child)
            } else {
                self.alphabeta(&child, depth - 1, alpha, beta, !maximizing)?.0
            };
            if improves(maximizing, score, best.0) {
                best = (score, mv);
            }

            if maximizing {
                if best.0 >= beta {
                    return Ok((best.0, Some(best.1)));
                }
                alpha = alpha.max(best.0);
            } else {
                if best.0 <= alpha {
                    return Ok((best.0, Some(best.1)));
                }
                beta = beta.min(best.0);
            }
        }
        Ok((best.0, Some(best.1)))
    }
}
