//! Rules engine for Game of the Amazons.
//!
//! Two teams of queen-moving pieces take turns; after each move the mover
//! shoots a permanent block to a cell its piece can see. `Game` holds one
//! session: the board, the pieces, turn order with undo, and the
//! select / destination / block protocol that every move goes through.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod movegen;
pub mod piece;
pub mod types;
pub mod wasm;

pub use board::{Board, Occupant};
pub use config::GameConfig;
pub use error::EngineError;
pub use game::{FirstLegalMoveSelector, Game, MoveSelector, Outcome, Phase, Rejection};
pub use history::{MoveRecord, TurnState};
pub use piece::{Piece, PieceId};
pub use types::{Coordinate, GameState, ProposedMove, Team};
