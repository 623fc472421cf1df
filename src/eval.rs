use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, Player};
use crate::state::GameState;

/// Scores a position from one player's point of view.
///
/// Won positions must score `f64::INFINITY` and lost positions
/// `f64::NEG_INFINITY`; anything else is a finite estimate with no fixed range.
pub trait Evaluator<S: GameState> {
    fn evaluate(&self, state: &S, player: S::Player) -> f64;
}

impl<S: GameState, E: Evaluator<S> + ?Sized> Evaluator<S> for Box<E> {
    fn evaluate(&self, state: &S, player: S::Player) -> f64 {
        (**self).evaluate(state, player)
    }
}

impl<S: GameState, E: Evaluator<S> + ?Sized> Evaluator<S> for &E {
    fn evaluate(&self, state: &S, player: S::Player) -> f64 {
        (**self).evaluate(state, player)
    }
}

fn terminal_score<S: GameState>(state: &S, player: S::Player) -> Option<f64> {
    if state.is_loser(player) {
        Some(f64::NEG_INFINITY)
    } else if state.is_winner(player) {
        Some(f64::INFINITY)
    } else {
        None
    }
}

/// Weighted mobility difference: `weight * own_moves - opponent_moves`.
///
/// `early_weight` applies while the move counter is at most `turn_threshold`,
/// `late_weight` afterwards, so late in the game shutting down the opponent
/// counts for relatively more than keeping our own options open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MobilityScore {
    pub early_weight: f64,
    pub late_weight: f64,
    pub turn_threshold: u32,
}

impl Default for MobilityScore {
    fn default() -> Self {
        Self {
            early_weight: 1.5,
            late_weight: 0.5,
            turn_threshold: 10,
        }
    }
}

impl MobilityScore {
    pub fn weight_at(&self, move_count: u32) -> f64 {
        if move_count <= self.turn_threshold {
            self.early_weight
        } else {
            self.late_weight
        }
    }
}

impl<S: GameState> Evaluator<S> for MobilityScore {
    fn evaluate(&self, state: &S, player: S::Player) -> f64 {
        if let Some(score) = terminal_score(state, player) {
            return score;
        }
        let own_moves = state.legal_moves_for(player).len() as f64;
        let opp_moves = state.legal_moves_for(state.opponent(player)).len() as f64;
        self.weight_at(state.move_count()) * own_moves - opp_moves
    }
}

/// Only distinguishes won and lost positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScore;

impl<S: GameState> Evaluator<S> for NullScore {
    fn evaluate(&self, state: &S, player: S::Player) -> f64 {
        terminal_score(state, player).unwrap_or(0.0)
    }
}

/// `own_moves² - opponent_moves²`, punishing positions close to being trapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredMobility;

impl<S: GameState> Evaluator<S> for SquaredMobility {
    fn evaluate(&self, state: &S, player: S::Player) -> f64 {
        if let Some(score) = terminal_score(state, player) {
            return score;
        }
        let own_moves = state.legal_moves_for(player).len() as f64;
        let opp_moves = state.legal_moves_for(state.opponent(player)).len() as f64;
        own_moves.powi(2) - opp_moves.powi(2)
    }
}

/// Counts moves, docking one point for every board edge a move lands on.
/// Corner cells therefore lose two points.
#[derive(Debug, Clone, Copy)]
pub struct EdgePenalty {
    last_row: usize,
    last_col: usize,
}

impl EdgePenalty {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            last_row: height.saturating_sub(1),
            last_col: width.saturating_sub(1),
        }
    }

    fn penalized(&self, moves: &[Move]) -> f64 {
        moves
            .iter()
            .map(|mv| {
                let edges =
                    [mv.row == 0, mv.col == 0, mv.row == self.last_row, mv.col == self.last_col];
                1.0 - edges.iter().filter(|&&on_edge| on_edge).count() as f64
            })
            .sum()
    }
}

impl Evaluator<Board> for EdgePenalty {
    fn evaluate(&self, state: &Board, player: Player) -> f64 {
        if let Some(score) = terminal_score(state, player) {
            return score;
        }
        self.penalized(&state.legal_moves_for(player))
    }
}

/// [`EdgePenalty`] for the player minus the same measure for the opponent.
#[derive(Debug, Clone, Copy)]
pub struct EdgePenaltyDifference(EdgePenalty);

impl EdgePenaltyDifference {
    pub fn new(width: usize, height: usize) -> Self {
        Self(EdgePenalty::new(width, height))
    }
}

impl Evaluator<Board> for EdgePenaltyDifference {
    fn evaluate(&self, state: &Board, player: Player) -> f64 {
        if let Some(score) = terminal_score(state, player) {
            return score;
        }
        let own = self.0.penalized(&state.legal_moves_for(player));
        let opp = self.0.penalized(&state.legal_moves_for(player.other()));
        own - opp
    }
}

/// Negated sum of squared distances from each available move to the board centre.
#[derive(Debug, Clone, Copy)]
pub struct CenterProximity {
    center_row: f64,
    center_col: f64,
}

impl CenterProximity {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            center_row: height as f64 / 2.0,
            center_col: width as f64 / 2.0,
        }
    }
}

impl Evaluator<Board> for CenterProximity {
    fn evaluate(&self, state: &Board, player: Player) -> f64 {
        if let Some(score) = terminal_score(state, player) {
            return score;
        }
        state
            .legal_moves_for(player)
            .iter()
            .map(|mv| {
                let dr = mv.row as f64 - self.center_row;
                let dc = mv.col as f64 - self.center_col;
                -(dr * dr + dc * dc)
            })
            .sum()
    }
}

/// Serializable choice of scoring function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeuristicConfig {
    Mobility(MobilityScore),
    Null,
    SquaredMobility,
    EdgePenalty,
    EdgePenaltyDifference,
    CenterProximity,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        HeuristicConfig::Mobility(MobilityScore::default())
    }
}

impl HeuristicConfig {
    /// Builds the evaluator, fixing any board-dependent constants up front.
    pub fn build(&self, board: &Board) -> Box<dyn Evaluator<Board>> {
        let (width, height) = (board.width(), board.height());
        match *self {
            HeuristicConfig::Mobility(score) => Box::new(score),
            HeuristicConfig::Null => Box::new(NullScore),
            HeuristicConfig::SquaredMobility => Box::new(SquaredMobility),
            HeuristicConfig::EdgePenalty => Box::new(EdgePenalty::new(width, height)),
            HeuristicConfig::EdgePenaltyDifference => {
                Box::new(EdgePenaltyDifference::new(width, height))
            }
            HeuristicConfig::CenterProximity => Box::new(CenterProximity::new(width, height)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Player one on (0, 0), player two on (4, 4) of an otherwise empty 5x5 board:
    // each has exactly two knight moves.
    fn corners() -> Board {
        Board::new(5, 5)
            .place(Player::One, Move::new(0, 0))
            .unwrap()
            .place(Player::Two, Move::new(4, 4))
            .unwrap()
    }

    #[test]
    fn stuck_player_scores_negative_infinity() {
        let board = Board::new(3, 3)
            .place(Player::One, Move::new(1, 1))
            .unwrap()
            .place(Player::Two, Move::new(0, 1))
            .unwrap();
        let score = MobilityScore::default();
        assert_eq!(score.evaluate(&board, Player::One), f64::NEG_INFINITY);
        assert_eq!(score.evaluate(&board, Player::Two), f64::INFINITY);
    }

    #[test]
    fn mover_facing_stuck_opponent_scores_infinity() {
        let board = Board::new(3, 3)
            .place(Player::Two, Move::new(1, 1))
            .unwrap()
            .place(Player::One, Move::new(0, 1))
            .unwrap();
        assert_eq!(board.legal_moves().len(), 2);
        assert!(board.is_loser(Player::Two));
        assert_eq!(MobilityScore::default().evaluate(&board, Player::One), f64::INFINITY);
        assert_eq!(NullScore.evaluate(&board, Player::One), f64::INFINITY);
    }

    #[test]
    fn mobility_weight_switches_after_threshold() {
        let score = MobilityScore { early_weight: 2.0, late_weight: 0.5, turn_threshold: 4 };
        let early = corners().with_move_count(4);
        let late = corners().with_move_count(5);
        assert_eq!(score.evaluate(&early, Player::One), 2.0 * 2.0 - 2.0);
        assert_eq!(score.evaluate(&late, Player::One), 0.5 * 2.0 - 2.0);
    }

    #[test]
    fn each_own_move_adds_the_active_weight() {
        let score = MobilityScore { early_weight: 2.0, late_weight: 0.25, turn_threshold: 4 };
        // Player one on the centre has eight moves, on a corner two; player two keeps two.
        let open = Board::new(5, 5)
            .place(Player::One, Move::new(2, 2))
            .unwrap()
            .place(Player::Two, Move::new(4, 4))
            .unwrap();
        assert_eq!(open.legal_moves_for(Player::One).len(), 8);
        // (2, 2) is not a knight jump from (4, 4) so player two still has (2, 3) and (3, 2)
        assert_eq!(open.legal_moves_for(Player::Two).len(), 2);

        for (move_count, weight) in [(4, 2.0), (5, 0.25)] {
            let cramped = corners().with_move_count(move_count);
            let roomy = open.clone().with_move_count(move_count);
            let gained =
                score.evaluate(&roomy, Player::One) - score.evaluate(&cramped, Player::One);
            assert_eq!(gained, weight * 6.0);
        }
    }

    #[test]
    fn squared_mobility_is_symmetric_on_mirrored_position() {
        assert_eq!(SquaredMobility.evaluate(&corners(), Player::One), 0.0);
    }

    #[test]
    fn edge_penalty_docks_edge_moves() {
        // from (0, 0) the moves are (1, 2) on no edge and (2, 1) on no edge
        assert_eq!(EdgePenalty::new(5, 5).evaluate(&corners(), Player::One), 2.0);

        let board = Board::new(5, 5).place(Player::One, Move::new(2, 2)).unwrap();
        // every knight move from the centre of a 5x5 board touches exactly one edge
        assert_eq!(EdgePenalty::new(5, 5).evaluate(&board, Player::One), 0.0);
        assert_eq!(EdgePenaltyDifference::new(5, 5).evaluate(&corners(), Player::One), 0.0);
    }

    #[test]
    fn center_proximity_uses_board_centre() {
        let board = Board::new(4, 4).place(Player::One, Move::new(0, 0)).unwrap();
        // moves (1, 2) and (2, 1), centre (2.0, 2.0)
        assert_eq!(CenterProximity::new(4, 4).evaluate(&board, Player::One), -2.0);
    }

    #[test]
    fn heuristic_config_parses_tagged_json() {
        let config: HeuristicConfig = serde_json::from_str(
            r#"{
                "kind": "mobility",
                "early_weight": 3.0,
                "late_weight": 1.0,
                "turn_threshold": 8
            }"#,
        )
        .unwrap();
        assert_eq!(
            config,
            HeuristicConfig::Mobility(MobilityScore {
                early_weight: 3.0,
                late_weight: 1.0,
                turn_threshold: 8,
            })
        );
        let config: HeuristicConfig =
            serde_json::from_str(r#"{ "kind": "center_proximity" }"#).unwrap();
        assert_eq!(config, HeuristicConfig::CenterProximity);
    }
}
