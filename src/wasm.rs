//! WASM bindings for a browser front end.
//!
//! The page does the pixel-to-cell math and the drawing; everything here takes
//! 1-based `(row, col)` cell coordinates.

use wasm_bindgen::prelude::*;

use crate::board::Occupant;
use crate::config::GameConfig;
use crate::game::{Game, Outcome, Rejection};
use crate::types::{Coordinate, Team};

#[wasm_bindgen]
pub struct AmazonsGame {
    inner: Game,
}

#[wasm_bindgen]
impl AmazonsGame {
    /// New game on the default 8x8 layout.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<AmazonsGame, JsError> {
        Ok(AmazonsGame {
            inner: Game::new(GameConfig::default())?,
        })
    }

    /// New game from a `{ width, height, layout: [[team, {row, col}], ...] }` object.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config: JsValue) -> Result<AmazonsGame, JsError> {
        let config: GameConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(AmazonsGame {
            inner: Game::new(config)?,
        })
    }

    pub fn width(&self) -> u8 {
        self.inner.size().0
    }

    pub fn height(&self) -> u8 {
        self.inner.size().1
    }

    /// Team on move (1 = A, 2 = B)
    #[wasm_bindgen(js_name = teamToMove)]
    pub fn team_to_move(&self) -> u8 {
        team_code(self.inner.team_to_move())
    }

    /// Cell contents: 0 empty, 1 team A, 2 team B, 3 block
    pub fn token(&self, row: u8, col: u8) -> Result<u8, JsError> {
        let code = match self.inner.occupant_at(Coordinate::new(row, col))? {
            Occupant::Empty => 0,
            Occupant::Piece(id) => self.inner.piece(id).map(|p| team_code(p.team())).unwrap_or(0),
            Occupant::Block => 3,
        };
        Ok(code)
    }

    pub fn click(&mut self, row: u8, col: u8) -> Result<String, JsError> {
        let outcome = self.inner.click(Coordinate::new(row, col))?;
        Ok(outcome_name(outcome).to_string())
    }

    pub fn select(&mut self, row: u8, col: u8) -> Result<String, JsError> {
        let outcome = self.inner.select(Coordinate::new(row, col))?;
        Ok(outcome_name(outcome).to_string())
    }

    #[wasm_bindgen(js_name = chooseDestination)]
    pub fn choose_destination(&mut self, row: u8, col: u8) -> Result<String, JsError> {
        let outcome = self.inner.choose_destination(Coordinate::new(row, col))?;
        Ok(outcome_name(outcome).to_string())
    }

    #[wasm_bindgen(js_name = chooseBlock)]
    pub fn choose_block(&mut self, row: u8, col: u8) -> Result<String, JsError> {
        let outcome = self.inner.choose_block(Coordinate::new(row, col))?;
        Ok(outcome_name(outcome).to_string())
    }

    /// Pointer left the board: drop any half-made move.
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    /// Returns the number of moves taken back.
    pub fn undo(&mut self) -> Result<usize, JsError> {
        Ok(self.inner.undo()?)
    }

    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self) -> Result<(), JsError> {
        Ok(self.inner.new_game()?)
    }

    #[wasm_bindgen(js_name = aiMove)]
    pub fn ai_move(&mut self) -> Result<String, JsError> {
        let outcome = self.inner.do_ai_move()?;
        Ok(outcome_name(outcome).to_string())
    }

    #[wasm_bindgen(js_name = moveCount)]
    pub fn move_count(&self) -> usize {
        self.inner.move_count()
    }

    /// Winner (1 = A, 2 = B) or 0 while the game is running
    pub fn winner(&self) -> u8 {
        self.inner.winner().map(team_code).unwrap_or(0)
    }

    /// Full snapshot for drawing; see `GameState`.
    pub fn state(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.to_game_state())?)
    }

    /// Move list, oldest first.
    pub fn history(&self) -> Result<JsValue, JsError> {
        let history = self.inner.history().to_vec();
        Ok(serde_wasm_bindgen::to_value(&history)?)
    }
}

fn team_code(team: Team) -> u8 {
    match team {
        Team::A => 1,
        Team::B => 2,
    }
}

fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Selected => "selected",
        Outcome::Deselected => "deselected",
        Outcome::DestinationChosen => "destination_chosen",
        Outcome::Committed => "committed",
        Outcome::Cancelled => "cancelled",
        Outcome::Rejected(rejection) => match rejection {
            Rejection::InvalidSelection => "invalid_selection",
            Rejection::NotYourTurn => "not_your_turn",
            Rejection::NoSelection => "no_selection",
            Rejection::OutOfPhase => "out_of_phase",
            Rejection::NotAligned => "not_aligned",
            Rejection::BlockedPath => "blocked_path",
            Rejection::Occupied => "occupied",
            Rejection::NoMoveAvailable => "no_move_available",
        },
    }
}
