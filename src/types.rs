use std::fmt;

use serde::{Deserialize, Serialize};

/// A 1-based board coordinate. `(1, 1)` is the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: u8,
    pub col: u8,
}

impl Coordinate {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Returns `self + (d_row, d_col)`, or `None` if that leaves the `u8` range.
    /// Board bounds are not checked here.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Whether `other` lies on the same row, column, or diagonal.
    /// A coordinate is never aligned with itself.
    pub fn is_aligned_with(self, other: Self) -> bool {
        if self == other {
            return false;
        }
        let (dr, dc) = self.delta(other);
        dr == 0 || dc == 0 || dr.abs() == dc.abs()
    }

    /// Queen-move distance to `other`, i.e. the larger of the row and column deltas.
    pub fn distance(self, other: Self) -> u8 {
        let (dr, dc) = self.delta(other);
        dr.unsigned_abs().max(dc.unsigned_abs()) as u8
    }

    pub(crate) fn delta(self, other: Self) -> (i16, i16) {
        (
            other.row as i16 - self.row as i16,
            other.col as i16 - self.col as i16,
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the two sides. `A` always opens the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub const fn other(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => f.write_str("A"),
            Team::B => f.write_str("B"),
        }
    }
}

/// A complete turn as proposed by a caller: which piece, where it goes,
/// and where the block lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposedMove {
    pub piece: Coordinate,
    pub destination: Coordinate,
    pub block: Coordinate,
}

/// Public game state handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub width: u8,
    pub height: u8,
    /// Row-major cells. 0=empty, 1=team A piece, 2=team B piece, 3=block.
    pub cells: Vec<u8>,
    pub team_to_move: Team,
    pub move_count: usize,
    pub selected: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    /// Contract:
    /// - `Some(team)` once the side to move has no legal move left.
    /// - `None` while the game is still running.
    pub winner: Option<Team>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_covers_rows_columns_and_diagonals() {
        let c = Coordinate::new(4, 4);

        assert!(c.is_aligned_with(Coordinate::new(4, 8)));
        assert!(c.is_aligned_with(Coordinate::new(1, 4)));
        assert!(c.is_aligned_with(Coordinate::new(7, 1)));
        assert!(c.is_aligned_with(Coordinate::new(2, 2)));
        assert!(!c.is_aligned_with(Coordinate::new(5, 6)));
        assert!(!c.is_aligned_with(c));
    }

    #[test]
    fn offset_refuses_to_underflow() {
        let c = Coordinate::new(1, 3);

        assert_eq!(c.offset(1, -1), Some(Coordinate::new(2, 2)));
        assert_eq!(c.offset(-2, 0), None);
        assert_eq!(Coordinate::new(254, 1).offset(1, 0), Some(Coordinate::new(255, 1)));
        assert_eq!(Coordinate::new(255, 1).offset(1, 0), None);
    }

    #[test]
    fn distance_is_chebyshev() {
        assert_eq!(Coordinate::new(1, 1).distance(Coordinate::new(4, 2)), 3);
        assert_eq!(Coordinate::new(5, 5).distance(Coordinate::new(5, 5)), 0);
    }

    #[test]
    fn other_team_alternates() {
        assert_eq!(Team::A.other(), Team::B);
        assert_eq!(Team::B.other().other(), Team::B);
    }
}
