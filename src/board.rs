use std::fmt;

use bitvec::prelude::*;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

use crate::error::BoardError;
use crate::state::GameState;

pub type CellSet = BitVec<u8, Lsb0>;

// (row, col) deltas of the L-shaped jumps a placed player may make
const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => f.write_str("player one"),
            Player::Two => f.write_str("player two"),
        }
    }
}

/// The next cell to occupy.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An Isolation board: every visited cell is blocked for the rest of the game.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    blocked: CellSet,
    locations: [Option<Move>; 2],
    active: Player,
    move_count: u32,
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        let blocked: Vec<Move> = self.blocked.iter_ones().map(|idx| self.cell_at(idx)).collect();

        let mut s = serializer.serialize_struct("Board", 7)?;
        s.serialize_field("width", &self.width)?;
        s.serialize_field("height", &self.height)?;
        s.serialize_field("blocked", &blocked)?;
        s.serialize_field("player_one", &self.locations[0])?;
        s.serialize_field("player_two", &self.locations[1])?;
        s.serialize_field("active", &self.active)?;
        s.serialize_field("move_count", &self.move_count)?;
        s.end()
    }
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            blocked: bitvec![u8, Lsb0; 0; width * height],
            locations: [None, None],
            active: Player::One,
            move_count: 0,
        }
    }

    fn index_of(&self, cell: Move) -> Result<usize, BoardError> {
        if cell.row < self.height && cell.col < self.width {
            Ok(cell.row * self.width + cell.col)
        } else {
            Err(BoardError::OutOfBounds { cell, width: self.width, height: self.height })
        }
    }

    fn cell_at(&self, idx: usize) -> Move {
        Move::new(idx / self.width, idx % self.width)
    }

    fn offset(&self, from: Move, (dr, dc): (isize, isize)) -> Option<Move> {
        let row = from.row.checked_add_signed(dr)?;
        let col = from.col.checked_add_signed(dc)?;
        (row < self.height && col < self.width).then_some(Move::new(row, col))
    }

    pub fn is_blank(&self, cell: Move) -> bool {
        match self.index_of(cell) {
            Ok(idx) => !self.blocked[idx],
            Err(_) => false,
        }
    }

    /// Blank cells in row-major order.
    pub fn blank_cells(&self) -> Vec<Move> {
        self.blocked.iter_zeros().map(|idx| self.cell_at(idx)).collect()
    }

    pub fn location(&self, player: Player) -> Option<Move> {
        self.locations[player.index()]
    }

    /// Blocks `cell` without moving anyone or passing the turn.
    pub fn block(&self, cell: Move) -> Result<Self, BoardError> {
        let idx = self.index_of(cell)?;
        let mut board = self.clone();
        board.blocked.set(idx, true);
        Ok(board)
    }

    /// Puts `player` on `cell` without passing the turn, as when setting up a position.
    pub fn place(&self, player: Player, cell: Move) -> Result<Self, BoardError> {
        let mut board = self.block(cell)?;
        board.locations[player.index()] = Some(cell);
        Ok(board)
    }

    pub fn with_active(mut self, player: Player) -> Self {
        self.active = player;
        self
    }

    pub fn with_move_count(mut self, move_count: u32) -> Self {
        self.move_count = move_count;
        self
    }

    fn is_stuck(&self, player: Player) -> bool {
        self.legal_moves_for(player).is_empty()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_loser(self.active)
    }

    /// Applies `move_` for the active player, rejecting anything not in the legal move list.
    pub fn make_move(&self, move_: Move) -> Result<Self, BoardError> {
        self.index_of(move_)?;
        if !self.legal_moves().contains(&move_) {
            return Err(BoardError::IllegalMove(move_));
        }
        Ok(self.forecast(move_))
    }
}

impl GameState for Board {
    type Move = Move;
    type Player = Player;

    fn active_player(&self) -> Player {
        self.active
    }

    fn opponent(&self, player: Player) -> Player {
        player.other()
    }

    fn legal_moves_for(&self, player: Player) -> Vec<Move> {
        match self.location(player) {
            None => self.blank_cells(),
            Some(from) => KNIGHT_OFFSETS
                .iter()
                .filter_map(|&delta| self.offset(from, delta))
                .filter(|&cell| self.is_blank(cell))
                .collect(),
        }
    }

    fn forecast(&self, mv: Move) -> Self {
        let mut board = self.clone();
        let idx = mv.row * self.width + mv.col;
        board.blocked.set(idx, true);
        board.locations[self.active.index()] = Some(mv);
        board.active = self.active.other();
        board.move_count += 1;
        board
    }

    fn is_winner(&self, player: Player) -> bool {
        self.is_loser(player.other())
    }

    // A stuck player only loses once it has to move, or when the other player can
    // still move; if both are stuck the side to move loses first.
    fn is_loser(&self, player: Player) -> bool {
        self.is_stuck(player) && (player == self.active || !self.is_stuck(player.other()))
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn move_count(&self) -> u32 {
        self.move_count
    }
}
