//! Legal full-move enumeration.

use crate::board::{Board, DIRECTIONS};
use crate::piece::Piece;
use crate::types::{Coordinate, ProposedMove, Team};

/// Every legal turn for `team`, generated lazily: each destination a piece can
/// slide to, then each cell a block can be shot to from there. The piece's
/// origin counts as empty for the shot.
pub fn legal_moves<'a>(
    board: &'a Board,
    pieces: &'a [Piece],
    team: Team,
) -> impl Iterator<Item = ProposedMove> + 'a {
    pieces
        .iter()
        .filter(move |p| p.team() == team)
        .flat_map(move |p| {
            let origin = p.coordinate();
            queen_reach(board, origin, None).flat_map(move |destination| {
                queen_reach(board, destination, Some(origin)).map(move |block| ProposedMove {
                    piece: origin,
                    destination,
                    block,
                })
            })
        })
}

/// Whether `team` can still make a move. A piece that can step anywhere can
/// always shoot back at the cell it left, so this only checks the first step.
pub fn has_legal_move(board: &Board, pieces: &[Piece], team: Team) -> bool {
    pieces
        .iter()
        .filter(|p| p.team() == team)
        .any(|p| queen_reach(board, p.coordinate(), None).next().is_some())
}

fn queen_reach(
    board: &Board,
    from: Coordinate,
    vacated: Option<Coordinate>,
) -> impl Iterator<Item = Coordinate> + '_ {
    DIRECTIONS
        .iter()
        .flat_map(move |&dir| board.ray(from, dir, vacated))
}
