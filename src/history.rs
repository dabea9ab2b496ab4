//! Turn order and the undo stack.

use serde::Serialize;
use tracing::info;

use crate::board::{Board, Occupant};
use crate::error::EngineError;
use crate::piece::{Piece, PieceId};
use crate::types::{Coordinate, Team};

/// Snapshot of one committed turn. Holds values, not references, so it stays
/// meaningful after later moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub piece: PieceId,
    pub team: Team,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub block: Coordinate,
    /// Set when an automated player made this move. Undoing such a record
    /// also undoes the record before it.
    pub automated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    team_to_move: Team,
    history: Vec<MoveRecord>,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            team_to_move: Team::A,
            history: Vec::new(),
        }
    }

    pub fn team_to_move(&self) -> Team {
        self.team_to_move
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Pushes a committed move and hands the turn to the other team.
    pub fn record(&mut self, mv: MoveRecord) {
        self.history.push(mv);
        self.team_to_move = self.team_to_move.other();
    }

    /// Rolls back the most recent move on `board` and `pieces`. If that move
    /// was automated, the move before it is rolled back too (never more than
    /// one extra). Returns how many moves were undone; 0 on an empty history.
    pub fn undo(&mut self, board: &mut Board, pieces: &mut [Piece]) -> Result<usize, EngineError> {
        let Some(last) = self.pop_one(board, pieces)? else {
            return Ok(0);
        };
        if !last.automated {
            return Ok(1);
        }
        match self.pop_one(board, pieces)? {
            Some(_) => Ok(2),
            None => Ok(1),
        }
    }

    fn pop_one(
        &mut self,
        board: &mut Board,
        pieces: &mut [Piece],
    ) -> Result<Option<MoveRecord>, EngineError> {
        let Some(mv) = self.history.last().copied() else {
            return Ok(None);
        };

        // Nothing is popped unless every cell is on the board.
        for coord in [mv.origin, mv.destination, mv.block] {
            board.occupant_at(coord)?;
        }

        let id = match board.occupant_at(mv.destination)? {
            Occupant::Piece(id) => id,
            _ => mv.piece,
        };
        debug_assert_eq!(id, mv.piece, "piece at destination does not match the record");

        board.place(mv.block, Occupant::Empty)?;
        board.place(mv.destination, Occupant::Empty)?;
        board.place(mv.origin, Occupant::Piece(id))?;
        if let Some(piece) = pieces.get_mut(id.index()) {
            piece.relocate(mv.origin);
        }

        self.history.pop();
        self.team_to_move = mv.team;
        info!(
            team = %mv.team,
            from = %mv.destination,
            to = %mv.origin,
            block = %mv.block,
            automated = mv.automated,
            "move undone"
        );
        Ok(Some(mv))
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: u8, col: u8) -> Coordinate {
        Coordinate::new(row, col)
    }

    /// One A piece at (1,1), one B piece at (4,4) on a 4x4 board.
    fn setup() -> (Board, Vec<Piece>) {
        let mut board = Board::new(4, 4);
        let pieces = vec![
            Piece::new(PieceId(0), Team::A, c(1, 1)),
            Piece::new(PieceId(1), Team::B, c(4, 4)),
        ];
        for p in &pieces {
            board.place(p.coordinate(), Occupant::Piece(p.id())).unwrap();
        }
        (board, pieces)
    }

    /// Applies a move the way the protocol commits one.
    fn commit(
        turn: &mut TurnState,
        board: &mut Board,
        pieces: &mut [Piece],
        piece: PieceId,
        to: Coordinate,
        block: Coordinate,
        automated: bool,
    ) {
        let origin = pieces[piece.index()].coordinate();
        let team = pieces[piece.index()].team();
        board.place(origin, Occupant::Empty).unwrap();
        board.place(to, Occupant::Piece(piece)).unwrap();
        board.place(block, Occupant::Block).unwrap();
        pieces[piece.index()].relocate(to);
        turn.record(MoveRecord {
            piece,
            team,
            origin,
            destination: to,
            block,
            automated,
        });
    }

    #[test]
    fn record_alternates_turns() {
        let (mut board, mut pieces) = setup();
        let mut turn = TurnState::new();

        commit(&mut turn, &mut board, &mut pieces, PieceId(0), c(2, 2), c(3, 3), false);
        assert_eq!(turn.team_to_move(), Team::B);
        assert_eq!(turn.len(), 1);

        commit(&mut turn, &mut board, &mut pieces, PieceId(1), c(4, 1), c(4, 2), false);
        assert_eq!(turn.team_to_move(), Team::A);
        assert_eq!(turn.len(), 2);
    }

    #[test]
    fn undo_on_empty_history_is_a_noop() {
        let (mut board, mut pieces) = setup();
        let before = board.clone();
        let mut turn = TurnState::new();

        assert_eq!(turn.undo(&mut board, &mut pieces), Ok(0));
        assert_eq!(board, before);
        assert_eq!(turn.team_to_move(), Team::A);
    }

    #[test]
    fn undo_restores_block_on_vacated_origin() {
        let (mut board, mut pieces) = setup();
        let before = board.clone();
        let mut turn = TurnState::new();

        // Shoot straight back at the cell the piece left.
        commit(&mut turn, &mut board, &mut pieces, PieceId(0), c(1, 3), c(1, 1), false);
        assert_eq!(board.occupant_at(c(1, 1)), Ok(Occupant::Block));

        assert_eq!(turn.undo(&mut board, &mut pieces), Ok(1));
        assert_eq!(board, before);
        assert_eq!(pieces[0].coordinate(), c(1, 1));
        assert_eq!(turn.team_to_move(), Team::A);
        assert!(turn.is_empty());
    }

    #[test]
    fn automated_record_takes_its_trigger_with_it() {
        let (mut board, mut pieces) = setup();
        let before = board.clone();
        let mut turn = TurnState::new();

        commit(&mut turn, &mut board, &mut pieces, PieceId(0), c(2, 2), c(2, 3), false);
        commit(&mut turn, &mut board, &mut pieces, PieceId(1), c(4, 1), c(3, 1), true);

        assert_eq!(turn.undo(&mut board, &mut pieces), Ok(2));
        assert_eq!(board, before);
        assert_eq!(turn.team_to_move(), Team::A);
        assert!(turn.is_empty());
    }

    #[test]
    fn automated_rollback_is_bounded_to_one_extra_move() {
        let (mut board, mut pieces) = setup();
        let mut turn = TurnState::new();

        commit(&mut turn, &mut board, &mut pieces, PieceId(0), c(2, 2), c(2, 3), true);
        commit(&mut turn, &mut board, &mut pieces, PieceId(1), c(4, 1), c(3, 1), true);
        commit(&mut turn, &mut board, &mut pieces, PieceId(0), c(1, 2), c(1, 1), true);

        assert_eq!(turn.undo(&mut board, &mut pieces), Ok(2));
        assert_eq!(turn.len(), 1);
        assert_eq!(turn.team_to_move(), Team::B);
        assert_eq!(pieces[0].coordinate(), c(2, 2));
        assert_eq!(pieces[1].coordinate(), c(4, 4));
    }

    #[test]
    fn automated_first_move_undoes_alone() {
        let (mut board, mut pieces) = setup();
        let mut turn = TurnState::new();

        commit(&mut turn, &mut board, &mut pieces, PieceId(0), c(2, 2), c(2, 3), true);

        assert_eq!(turn.undo(&mut board, &mut pieces), Ok(1));
        assert!(turn.is_empty());
    }
}
