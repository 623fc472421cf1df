use std::fmt::Debug;

/// Read-only view of a game position, as seen by the search.
///
/// Implementations must be cheap to forecast: the search never mutates a state
/// in place, every explored move produces a fresh value.
pub trait GameState: Sized {
    type Move: Copy + PartialEq + Debug;
    type Player: Copy + PartialEq + Debug;

    fn active_player(&self) -> Self::Player;

    fn opponent(&self, player: Self::Player) -> Self::Player;

    /// Moves available to `player`, in a stable order. Empty means `player` is stuck.
    fn legal_moves_for(&self, player: Self::Player) -> Vec<Self::Move>;

    fn legal_moves(&self) -> Vec<Self::Move> {
        self.legal_moves_for(self.active_player())
    }

    /// The position after the active player makes `mv`. `mv` must be legal.
    fn forecast(&self, mv: Self::Move) -> Self;

    fn is_winner(&self, player: Self::Player) -> bool;

    fn is_loser(&self, player: Self::Player) -> bool;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn move_count(&self) -> u32;
}
