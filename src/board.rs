use std::fmt;

use crate::error::EngineError;
use crate::piece::PieceId;
use crate::types::Coordinate;

/// The eight queen directions as `(d_row, d_col)`.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// What sits on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Occupant {
    #[default]
    Empty,
    Piece(PieceId),
    Block,
}

impl Occupant {
    pub fn is_empty(self) -> bool {
        self == Occupant::Empty
    }
}

/// Cell occupancy for a `width x height` board, stored densely in row-major order.
///
/// The board only knows piece handles. Keeping each `Occupant::Piece` entry in
/// step with that piece's own coordinate is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<Occupant>,
}

impl Board {
    /// Creates an empty board. Both dimensions must be at least 1; `GameConfig`
    /// validation guarantees that before a board is built.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![Occupant::Empty; width as usize * height as usize],
        }
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (u8, u8) {
        (self.width, self.height)
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        (1..=self.height).contains(&coord.row) && (1..=self.width).contains(&coord.col)
    }

    pub fn occupant_at(&self, coord: Coordinate) -> Result<Occupant, EngineError> {
        let idx = self.index(coord)?;
        Ok(self.cells[idx])
    }

    /// Unconditional write. No rule checks happen here.
    pub fn place(&mut self, coord: Coordinate, occupant: Occupant) -> Result<(), EngineError> {
        let idx = self.index(coord)?;
        self.cells[idx] = occupant;
        Ok(())
    }

    /// Whether a queen could travel from `a` to `b`: the two cells must be
    /// distinct, share a row, column or diagonal, and every cell strictly
    /// between them must be empty. The occupancy of `a` and `b` themselves
    /// is not looked at. Off-board endpoints never have a clear line.
    pub fn clear_line(&self, a: Coordinate, b: Coordinate) -> bool {
        if !self.contains(a) || !self.contains(b) || !a.is_aligned_with(b) {
            return false;
        }

        let (dr, dc) = a.delta(b);
        let step = (dr.signum() as i8, dc.signum() as i8);
        let distance = a.distance(b);

        let mut walk = a;
        for _ in 1..distance {
            walk = match walk.offset(step.0, step.1) {
                Some(next) => next,
                None => return false,
            };
            if !self.cells[self.offset_of(walk)].is_empty() {
                return false;
            }
        }

        true
    }

    /// Empty cells reachable from `from` along `direction`, nearest first.
    /// The walk stops at the board edge or before the first occupied cell;
    /// `vacated` counts as empty even if the board still holds something there.
    pub fn ray(
        &self,
        from: Coordinate,
        direction: (i8, i8),
        vacated: Option<Coordinate>,
    ) -> impl Iterator<Item = Coordinate> + '_ {
        let mut walk = Some(from);
        std::iter::from_fn(move || {
            let next = walk?.offset(direction.0, direction.1)?;
            if !self.contains(next) {
                walk = None;
                return None;
            }
            if !self.cells[self.offset_of(next)].is_empty() && Some(next) != vacated {
                walk = None;
                return None;
            }
            walk = Some(next);
            Some(next)
        })
    }

    /// Number of cells holding a block.
    pub fn block_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Occupant::Block).count()
    }

    /// All non-empty cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Coordinate, Occupant)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupant)| !occupant.is_empty())
            .map(|(idx, occupant)| (self.coordinate_of(idx), *occupant))
    }

    fn index(&self, coord: Coordinate) -> Result<usize, EngineError> {
        if !self.contains(coord) {
            return Err(EngineError::OutOfBounds {
                coord,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.offset_of(coord))
    }

    // Callers must have checked `contains` first.
    fn offset_of(&self, coord: Coordinate) -> usize {
        (coord.row as usize - 1) * self.width as usize + (coord.col as usize - 1)
    }

    fn coordinate_of(&self, idx: usize) -> Coordinate {
        let width = self.width as usize;
        Coordinate::new((idx / width + 1) as u8, (idx % width + 1) as u8)
    }
}

impl fmt::Display for Board {
    /// `.` empty, `#` block, `P` piece. Team letters need the piece list; see
    /// `Game`'s `Display` for that.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            for cell in row {
                let c = match cell {
                    Occupant::Empty => '.',
                    Occupant::Block => '#',
                    Occupant::Piece(_) => 'P',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: u8, col: u8) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn empty_board_reports_empty_everywhere() {
        let board = Board::new(8, 8);

        assert_eq!(board.size(), (8, 8));
        assert_eq!(board.occupant_at(c(1, 1)), Ok(Occupant::Empty));
        assert_eq!(board.occupant_at(c(8, 8)), Ok(Occupant::Empty));
        assert_eq!(board.occupied().count(), 0);
    }

    #[test]
    fn out_of_bounds_is_a_contract_error() {
        let mut board = Board::new(8, 6);

        assert!(matches!(
            board.occupant_at(c(0, 1)),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert!(board.occupant_at(c(7, 1)).is_err());
        assert!(board.occupant_at(c(6, 8)).is_ok());
        assert!(board.place(c(1, 9), Occupant::Block).is_err());
        assert_eq!(board.block_count(), 0);
    }

    #[test]
    fn clear_line_rejects_same_cell_and_knight_jumps() {
        let board = Board::new(8, 8);

        assert!(!board.clear_line(c(3, 3), c(3, 3)));
        assert!(!board.clear_line(c(3, 3), c(5, 4)));
        assert!(board.clear_line(c(3, 3), c(3, 8)));
        assert!(board.clear_line(c(3, 3), c(8, 8)));
        assert!(board.clear_line(c(3, 3), c(1, 5)));
    }

    #[test]
    fn clear_line_only_checks_cells_in_between() {
        let mut board = Board::new(8, 8);
        board.place(c(3, 3), Occupant::Block).unwrap();
        board.place(c(3, 6), Occupant::Block).unwrap();

        // Endpoints occupied, interior empty.
        assert!(board.clear_line(c(3, 3), c(3, 6)));

        board.place(c(3, 5), Occupant::Piece(PieceId(0))).unwrap();
        assert!(!board.clear_line(c(3, 3), c(3, 6)));
        assert!(!board.clear_line(c(3, 6), c(3, 3)));
        assert!(board.clear_line(c(3, 3), c(3, 4)));
    }

    #[test]
    fn clear_line_blocked_on_diagonal() {
        let mut board = Board::new(8, 8);
        board.place(c(5, 5), Occupant::Block).unwrap();

        assert!(!board.clear_line(c(7, 7), c(2, 2)));
        assert!(board.clear_line(c(7, 7), c(6, 6)));
        assert!(board.clear_line(c(7, 3), c(3, 7)));
    }

    #[test]
    fn ray_stops_before_first_occupant_unless_vacated() {
        let mut board = Board::new(8, 8);
        board.place(c(4, 1), Occupant::Piece(PieceId(0))).unwrap();
        board.place(c(4, 6), Occupant::Block).unwrap();

        let east: Vec<_> = board.ray(c(4, 1), (0, 1), None).collect();
        assert_eq!(east, vec![c(4, 2), c(4, 3), c(4, 4), c(4, 5)]);

        let west: Vec<_> = board.ray(c(4, 3), (0, -1), None).collect();
        assert_eq!(west, vec![c(4, 2)]);

        let west_vacated: Vec<_> = board.ray(c(4, 3), (0, -1), Some(c(4, 1))).collect();
        assert_eq!(west_vacated, vec![c(4, 2), c(4, 1)]);

        assert_eq!(board.ray(c(1, 1), (-1, -1), None).count(), 0);
    }

    #[test]
    fn display_draws_rows_top_down() {
        let mut board = Board::new(3, 2);
        board.place(c(1, 2), Occupant::Block).unwrap();
        board.place(c(2, 3), Occupant::Piece(PieceId(0))).unwrap();

        assert_eq!(board.to_string(), ".#.\n..P\n");
        let occupied: Vec<_> = board.occupied().collect();
        assert_eq!(
            occupied,
            vec![(c(1, 2), Occupant::Block), (c(2, 3), Occupant::Piece(PieceId(0)))]
        );
    }
}
