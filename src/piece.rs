use serde::Serialize;

use crate::types::{Coordinate, Team};

/// Stable handle for a piece, assigned at setup in layout order.
/// The board stores this handle; the piece itself lives in the game's piece list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PieceId(pub u16);

impl PieceId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A playable token. Pieces are never captured, only hemmed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Piece {
    id: PieceId,
    team: Team,
    coordinate: Coordinate,
}

impl Piece {
    pub(crate) fn new(id: PieceId, team: Team, coordinate: Coordinate) -> Self {
        Self {
            id,
            team,
            coordinate,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Only a committed move or an undo relocates a piece; the board entry
    /// must be updated in the same step.
    pub(crate) fn relocate(&mut self, to: Coordinate) {
        self.coordinate = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relocate_replaces_coordinate_and_keeps_identity() {
        let mut piece = Piece::new(PieceId(2), Team::B, Coordinate::new(6, 3));
        let before = piece.coordinate();

        piece.relocate(Coordinate::new(4, 3));

        assert_eq!(piece.id(), PieceId(2));
        assert_eq!(piece.team(), Team::B);
        assert_eq!(piece.coordinate(), Coordinate::new(4, 3));
        assert_eq!(before, Coordinate::new(6, 3));
    }
}
