use std::fmt;

use tracing::{debug, info, warn};

use crate::board::{Board, Occupant};
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::history::{MoveRecord, TurnState};
use crate::movegen;
use crate::piece::{Piece, PieceId};
use crate::types::{Coordinate, GameState, ProposedMove, Team};

/// Source of automated moves. Its proposals go through the same protocol as a
/// human's clicks and may be rejected.
pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board, pieces: &[Piece], team: Team) -> Option<ProposedMove>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move(&self, board: &Board, pieces: &[Piece], team: Team) -> Option<ProposedMove> {
        movegen::legal_moves(board, pieces, team).next()
    }
}

/// Where the current turn stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    PieceSelected {
        piece: PieceId,
    },
    /// The destination is only pending; the board still has the piece at its origin.
    DestinationChosen {
        piece: PieceId,
        destination: Coordinate,
    },
}

/// Why an action was refused. Every rejection drops the turn back to `Idle`
/// and leaves the board and history untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing selectable at that cell (empty or block).
    InvalidSelection,
    /// The cell holds a piece of the team that is not on move.
    NotYourTurn,
    /// A destination or block was given with no piece selected.
    NoSelection,
    /// A block was given before a destination, or a destination after one.
    OutOfPhase,
    /// Same cell, or not on a row, column or diagonal.
    NotAligned,
    /// Something stands between the two cells.
    BlockedPath,
    /// The target cell itself is not empty.
    Occupied,
    /// The automated player had nothing to propose.
    NoMoveAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Selected,
    Deselected,
    DestinationChosen,
    Committed,
    Cancelled,
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_rejected(self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }
}

/// One game session: board, pieces, turn order and the in-progress turn.
///
/// Every method runs to completion; callers sharing a session across threads
/// must serialize access themselves.
pub struct Game {
    config: GameConfig,
    board: Board,
    pieces: Vec<Piece>,
    turn: TurnState,
    phase: Phase,
    selector: Box<dyn MoveSelector>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        Self::with_selector(config, Box::new(FirstLegalMoveSelector))
    }

    pub fn with_selector(
        config: GameConfig,
        selector: Box<dyn MoveSelector>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let (board, pieces) = setup(&config)?;
        Ok(Self {
            config,
            board,
            pieces,
            turn: TurnState::new(),
            phase: Phase::Idle,
            selector,
        })
    }

    /// Throws away the current game and rebuilds the starting layout.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        let (board, pieces) = setup(&self.config)?;
        self.board = board;
        self.pieces = pieces;
        self.turn = TurnState::new();
        self.phase = Phase::Idle;
        info!(
            width = self.config.width,
            height = self.config.height,
            pieces = self.pieces.len(),
            "new game"
        );
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn team_to_move(&self) -> Team {
        self.turn.team_to_move()
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (u8, u8) {
        self.board.size()
    }

    pub fn occupant_at(&self, coord: Coordinate) -> Result<Occupant, EngineError> {
        self.board.occupant_at(coord)
    }

    pub fn history(&self) -> &[MoveRecord] {
        self.turn.history()
    }

    pub fn move_count(&self) -> usize {
        self.turn.len()
    }

    /// The tentatively selected piece, if any.
    pub fn selected_piece(&self) -> Option<&Piece> {
        match self.phase {
            Phase::Idle => None,
            Phase::PieceSelected { piece } | Phase::DestinationChosen { piece, .. } => {
                self.piece(piece)
            }
        }
    }

    pub fn pending_destination(&self) -> Option<Coordinate> {
        match self.phase {
            Phase::DestinationChosen { destination, .. } => Some(destination),
            _ => None,
        }
    }

    /// Picks the piece at `coord` for the team on move. Picking the already
    /// selected piece again deselects it; picking another own piece switches to it.
    pub fn select(&mut self, coord: Coordinate) -> Result<Outcome, EngineError> {
        let occupant = self.board.occupant_at(coord)?;
        let current = self.selected_piece().map(Piece::id);

        let Occupant::Piece(id) = occupant else {
            return Ok(self.reject(Rejection::InvalidSelection));
        };
        if current == Some(id) {
            self.phase = Phase::Idle;
            debug!(at = %coord, "piece deselected");
            return Ok(Outcome::Deselected);
        }
        if self.pieces[id.index()].team() != self.team_to_move() {
            return Ok(self.reject(Rejection::NotYourTurn));
        }

        self.phase = Phase::PieceSelected { piece: id };
        debug!(team = %self.team_to_move(), at = %coord, "piece selected");
        Ok(Outcome::Selected)
    }

    /// Picks where the selected piece will go. The board is not touched until
    /// the block is placed.
    pub fn choose_destination(&mut self, coord: Coordinate) -> Result<Outcome, EngineError> {
        let occupant = self.board.occupant_at(coord)?;
        let piece = match self.phase {
            Phase::Idle => return Ok(self.reject(Rejection::NoSelection)),
            Phase::DestinationChosen { .. } => return Ok(self.reject(Rejection::OutOfPhase)),
            Phase::PieceSelected { piece } => piece,
        };
        let origin = self.pieces[piece.index()].coordinate();

        if let Err(rejection) = self.check_line(origin, coord, occupant) {
            return Ok(self.reject(rejection));
        }

        self.phase = Phase::DestinationChosen {
            piece,
            destination: coord,
        };
        debug!(from = %origin, to = %coord, "destination chosen");
        Ok(Outcome::DestinationChosen)
    }

    /// Shoots the block to `coord` and commits the whole turn.
    pub fn choose_block(&mut self, coord: Coordinate) -> Result<Outcome, EngineError> {
        self.commit(coord, false)
    }

    /// Drops any pending selection. Never touches the board or history.
    pub fn cancel(&mut self) -> Outcome {
        self.phase = Phase::Idle;
        debug!("selection cancelled");
        Outcome::Cancelled
    }

    /// Single-pointer input: routes a click on `coord` to `select`,
    /// `choose_destination` or `choose_block` depending on the turn phase and
    /// what sits on the cell. With a destination pending, clicking the moving
    /// piece targets its vacated origin with the block.
    pub fn click(&mut self, coord: Coordinate) -> Result<Outcome, EngineError> {
        let occupant = self.board.occupant_at(coord)?;
        match (self.phase, occupant) {
            (Phase::Idle, _) | (Phase::PieceSelected { .. }, Occupant::Piece(_)) => {
                self.select(coord)
            }
            (Phase::PieceSelected { .. }, Occupant::Empty) => self.choose_destination(coord),
            (Phase::DestinationChosen { piece, .. }, Occupant::Piece(id)) if id == piece => {
                self.choose_block(coord)
            }
            (Phase::DestinationChosen { .. }, Occupant::Piece(_)) => self.select(coord),
            (Phase::DestinationChosen { .. }, Occupant::Empty) => self.choose_block(coord),
            (_, Occupant::Block) => Ok(self.reject(Rejection::InvalidSelection)),
        }
    }

    /// Plays a full turn for a human caller.
    pub fn play(&mut self, mv: ProposedMove) -> Result<Outcome, EngineError> {
        self.play_as(mv, false)
    }

    /// Plays a full turn on behalf of an automated player. The record is
    /// flagged so that one `undo` also takes back the move it answered.
    pub fn play_automated(&mut self, mv: ProposedMove) -> Result<Outcome, EngineError> {
        self.play_as(mv, true)
    }

    /// Asks the configured selector for a move for the team on move and plays it.
    pub fn do_ai_move(&mut self) -> Result<Outcome, EngineError> {
        let team = self.team_to_move();
        let Some(mv) = self.selector.select_move(&self.board, &self.pieces, team) else {
            return Ok(self.reject(Rejection::NoMoveAvailable));
        };

        let outcome = self.play_automated(mv)?;
        if outcome.is_rejected() {
            warn!(team = %team, proposal = ?mv, ?outcome, "automated move refused");
        }
        Ok(outcome)
    }

    /// Takes back the last move (and the one before it if the last was
    /// automated). Any pending selection is dropped. Returns how many moves
    /// were undone.
    pub fn undo(&mut self) -> Result<usize, EngineError> {
        self.phase = Phase::Idle;
        self.turn.undo(&mut self.board, &mut self.pieces)
    }

    /// Legal turns for the team on move.
    pub fn legal_moves(&self) -> impl Iterator<Item = ProposedMove> + '_ {
        movegen::legal_moves(&self.board, &self.pieces, self.team_to_move())
    }

    /// The team on move loses once none of its pieces can move.
    pub fn winner(&self) -> Option<Team> {
        let team = self.team_to_move();
        if movegen::has_legal_move(&self.board, &self.pieces, team) {
            None
        } else {
            Some(team.other())
        }
    }

    pub fn to_game_state(&self) -> GameState {
        let (width, height) = self.board.size();
        let mut cells = vec![0u8; width as usize * height as usize];
        for (coord, occupant) in self.board.occupied() {
            let idx = (coord.row as usize - 1) * width as usize + (coord.col as usize - 1);
            cells[idx] = match occupant {
                Occupant::Empty => 0,
                Occupant::Piece(id) => match self.pieces[id.index()].team() {
                    Team::A => 1,
                    Team::B => 2,
                },
                Occupant::Block => 3,
            };
        }

        GameState {
            width,
            height,
            cells,
            team_to_move: self.team_to_move(),
            move_count: self.move_count(),
            selected: self.selected_piece().map(Piece::coordinate),
            destination: self.pending_destination(),
            winner: self.winner(),
        }
    }

    fn play_as(&mut self, mv: ProposedMove, automated: bool) -> Result<Outcome, EngineError> {
        for coord in [mv.piece, mv.destination, mv.block] {
            self.board.occupant_at(coord)?;
        }

        self.phase = Phase::Idle;
        let step = self.select(mv.piece)?;
        if step != Outcome::Selected {
            return Ok(step);
        }
        let step = self.choose_destination(mv.destination)?;
        if step != Outcome::DestinationChosen {
            return Ok(step);
        }
        self.commit(mv.block, automated)
    }

    fn commit(&mut self, block: Coordinate, automated: bool) -> Result<Outcome, EngineError> {
        self.board.occupant_at(block)?;
        let (piece, destination) = match self.phase {
            Phase::Idle => return Ok(self.reject(Rejection::NoSelection)),
            Phase::PieceSelected { .. } => return Ok(self.reject(Rejection::OutOfPhase)),
            Phase::DestinationChosen { piece, destination } => (piece, destination),
        };
        let origin = self.pieces[piece.index()].coordinate();
        let team = self.pieces[piece.index()].team();

        // The piece is in flight: its origin must not block its own shot.
        self.board.place(origin, Occupant::Empty)?;
        let target = self.board.occupant_at(block)?;
        if let Err(rejection) = self.check_line(destination, block, target) {
            self.board.place(origin, Occupant::Piece(piece))?;
            return Ok(self.reject(rejection));
        }

        self.board.place(destination, Occupant::Piece(piece))?;
        self.board.place(block, Occupant::Block)?;
        self.pieces[piece.index()].relocate(destination);
        self.turn.record(MoveRecord {
            piece,
            team,
            origin,
            destination,
            block,
            automated,
        });
        self.phase = Phase::Idle;

        info!(
            team = %team,
            from = %origin,
            to = %destination,
            block = %block,
            automated,
            moves = self.turn.len(),
            "move committed"
        );
        Ok(Outcome::Committed)
    }

    fn check_line(&self, from: Coordinate, to: Coordinate, target: Occupant) -> Result<(), Rejection> {
        if !from.is_aligned_with(to) {
            return Err(Rejection::NotAligned);
        }
        if !self.board.clear_line(from, to) {
            return Err(Rejection::BlockedPath);
        }
        if !target.is_empty() {
            return Err(Rejection::Occupied);
        }
        Ok(())
    }

    fn reject(&mut self, rejection: Rejection) -> Outcome {
        self.phase = Phase::Idle;
        debug!(?rejection, team = %self.team_to_move(), "action rejected");
        Outcome::Rejected(rejection)
    }
}

impl fmt::Display for Game {
    /// `.` empty, `#` block, `A`/`B` pieces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.board.size();
        for row in 1..=height {
            for col in 1..=width {
                let c = match self.board.occupant_at(Coordinate::new(row, col)) {
                    Ok(Occupant::Piece(id)) => match self.pieces[id.index()].team() {
                        Team::A => 'A',
                        Team::B => 'B',
                    },
                    Ok(Occupant::Block) => '#',
                    _ => '.',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn setup(config: &GameConfig) -> Result<(Board, Vec<Piece>), EngineError> {
    let mut board = Board::new(config.width, config.height);
    let mut pieces = Vec::with_capacity(config.layout.len());
    for (i, &(team, coord)) in config.layout.iter().enumerate() {
        let id = PieceId(i as u16);
        board.place(coord, Occupant::Piece(id))?;
        pieces.push(Piece::new(id, team, coord));
    }
    Ok((board, pieces))
}
