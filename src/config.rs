//! Board size and starting layout for a game session.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{Coordinate, Team};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: u8,
    pub height: u8,
    /// Starting pieces. Piece ids are assigned in this order.
    pub layout: Vec<(Team, Coordinate)>,
}

impl GameConfig {
    /// The 10x10 tournament layout. Row 1 is the top edge, where team B starts.
    pub fn standard() -> Self {
        Self {
            width: 10,
            height: 10,
            layout: vec![
                (Team::A, Coordinate::new(7, 1)),
                (Team::A, Coordinate::new(10, 4)),
                (Team::A, Coordinate::new(10, 7)),
                (Team::A, Coordinate::new(7, 10)),
                (Team::B, Coordinate::new(4, 1)),
                (Team::B, Coordinate::new(1, 4)),
                (Team::B, Coordinate::new(1, 7)),
                (Team::B, Coordinate::new(4, 10)),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "board must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }

        let mut seen = HashSet::with_capacity(self.layout.len());
        for &(team, coord) in &self.layout {
            if !(1..=self.height).contains(&coord.row) || !(1..=self.width).contains(&coord.col) {
                return Err(EngineError::InvalidConfig(format!(
                    "team {team} piece at {coord} is off the {}x{} board",
                    self.width, self.height
                )));
            }
            if !seen.insert(coord) {
                return Err(EngineError::InvalidConfig(format!(
                    "more than one piece starts at {coord}"
                )));
            }
        }

        for team in [Team::A, Team::B] {
            if !self.layout.iter().any(|(t, _)| *t == team) {
                return Err(EngineError::InvalidConfig(format!(
                    "team {team} has no pieces"
                )));
            }
        }

        if self.layout.len() > u16::MAX as usize {
            return Err(EngineError::InvalidConfig("too many pieces".to_string()));
        }

        Ok(())
    }
}

impl Default for GameConfig {
    /// Compact 8x8 layout with two pieces per team.
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            layout: vec![
                (Team::A, Coordinate::new(3, 3)),
                (Team::A, Coordinate::new(3, 6)),
                (Team::B, Coordinate::new(6, 3)),
                (Team::B, Coordinate::new(6, 6)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
        assert_eq!(GameConfig::standard().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_sized_board() {
        let config = GameConfig {
            width: 0,
            ..GameConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least 1x1"));
    }

    #[test]
    fn rejects_piece_off_board() {
        let mut config = GameConfig::default();
        config.layout.push((Team::B, Coordinate::new(9, 1)));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("off the 8x8 board"));
    }

    #[test]
    fn rejects_stacked_pieces() {
        let mut config = GameConfig::default();
        config.layout.push((Team::B, Coordinate::new(3, 3)));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than one piece"));
    }

    #[test]
    fn rejects_team_without_pieces() {
        let config = GameConfig {
            width: 4,
            height: 4,
            layout: vec![(Team::A, Coordinate::new(1, 1))],
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("team B has no pieces"));
    }
}
