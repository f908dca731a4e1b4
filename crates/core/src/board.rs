//! Board module - manages the game grid
//!
//! The board is an 8x22 grid where each cell is empty or carries a tag
//! (piece kind or garbage). Rows 0..4 are the hidden spawn buffer.
//! Uses a flat array for cache locality and zero-allocation row moves.
//! Coordinates: (x, y) where x ranges 0..7 (left to right), y ranges 0..21 (top to bottom).
//!
//! Collision treats cells above the board (`y < 0`) as free so a piece may
//! poke out of the top while it is being lifted or spawned.

use arrayvec::ArrayVec;

use crate::types::{Cell, CellTag, BOARD_HEIGHT, BOARD_WIDTH, HIDDEN_ROWS};

const WIDTH: usize = BOARD_WIDTH as usize;

/// Number of rows, including the hidden buffer.
pub const ROWS: usize = BOARD_HEIGHT as usize;

/// Total number of cells on the board
const BOARD_SIZE: usize = WIDTH * ROWS;

/// Row indices flagged for removal, sorted top to bottom.
pub type RowSet = ArrayVec<usize, ROWS>;

/// The game board - 8 columns x 22 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Collision query for piece cells.
    ///
    /// Side walls and the floor block; rows above the board do not.
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return true;
        }
        y >= 0 && self.is_occupied(x, y)
    }

    /// Corner query used by special-placement detection: walls, floor,
    /// rows above the board and occupied cells all count as filled.
    pub fn is_solid(&self, x: i8, y: i8) -> bool {
        y < 0 || self.is_blocked(x, y)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= ROWS {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Every full row on the board, top to bottom.
    pub fn full_rows(&self) -> RowSet {
        (0..ROWS).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove the given rows and drop everything above them.
    ///
    /// Uses a two-pointer pass from the bottom, so the row count is unchanged:
    /// exactly `rows.len()` empty rows appear at the top. Returns how many
    /// distinct in-range rows were removed.
    pub fn remove_rows(&mut self, rows: &[usize]) -> usize {
        let mut removed = 0;
        let mut write_y = ROWS;

        for read_y in (0..ROWS).rev() {
            if rows.contains(&read_y) {
                removed += 1;
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * WIDTH;
                self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
            }
        }

        self.cells[..write_y * WIDTH].fill(None);
        removed
    }

    /// Push one garbage row in from the bottom.
    ///
    /// The top row falls off, every other row moves up one, and the new
    /// bottom row is full except for column `hole`.
    pub fn push_garbage_row(&mut self, hole: u8) {
        self.cells.copy_within(WIDTH.., 0);
        let bottom = (ROWS - 1) * WIDTH;
        for (x, cell) in self.cells[bottom..].iter_mut().enumerate() {
            *cell = if x == hole as usize {
                None
            } else {
                Some(CellTag::Garbage)
            };
        }
    }

    /// Write piece cells into the grid.
    ///
    /// Cells above the board are dropped. Returns true if any cell was clipped.
    pub fn place(&mut self, cells: &[(i8, i8)], tag: CellTag) -> bool {
        let mut clipped = false;
        for &(x, y) in cells {
            if y < 0 {
                clipped = true;
                continue;
            }
            self.set(x, y, Some(tag));
        }
        clipped
    }

    /// True when any cell of the hidden spawn buffer is occupied.
    pub fn hidden_buffer_occupied(&self) -> bool {
        self.cells[..HIDDEN_ROWS as usize * WIDTH]
            .iter()
            .any(|cell| cell.is_some())
    }

    /// Number of rows from the highest occupied cell down to the floor.
    pub fn stack_height(&self) -> usize {
        (0..ROWS)
            .find(|&y| {
                let start = y * WIDTH;
                self.cells[start..start + WIDTH].iter().any(|c| c.is_some())
            })
            .map(|top| ROWS - top)
            .unwrap_or(0)
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write occupancy into a `u8` grid (0 = empty, 1..=7 piece kinds, 8 = garbage).
    pub fn write_u8_grid(&self, out: &mut [[u8; WIDTH]; ROWS]) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, slot) in row.iter_mut().enumerate() {
                *slot = cell_code(self.cells[y * WIDTH + x]);
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable numeric code for a cell, shared with the renderer.
pub fn cell_code(cell: Cell) -> u8 {
    use crate::types::PieceKind;
    match cell {
        None => 0,
        Some(CellTag::Piece(PieceKind::I)) => 1,
        Some(CellTag::Piece(PieceKind::O)) => 2,
        Some(CellTag::Piece(PieceKind::T)) => 3,
        Some(CellTag::Piece(PieceKind::S)) => 4,
        Some(CellTag::Piece(PieceKind::Z)) => 5,
        Some(CellTag::Piece(PieceKind::J)) => 6,
        Some(CellTag::Piece(PieceKind::L)) => 7,
        Some(CellTag::Garbage) => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn fill_row(board: &mut Board, y: i8, hole: Option<i8>) {
        for x in 0..BOARD_WIDTH as i8 {
            if Some(x) != hole {
                board.set(x, y, Some(CellTag::Piece(PieceKind::I)));
            }
        }
    }

    #[test]
    fn test_blocked_walls_and_floor() {
        let board = Board::new();
        assert!(board.is_blocked(-1, 10));
        assert!(board.is_blocked(BOARD_WIDTH as i8, 10));
        assert!(board.is_blocked(0, BOARD_HEIGHT as i8));
        assert!(!board.is_blocked(3, 10));
    }

    #[test]
    fn test_above_board_is_free_but_solid_for_corners() {
        let board = Board::new();
        assert!(!board.is_blocked(3, -1));
        assert!(board.is_solid(3, -1));
        assert!(!board.is_solid(3, 0));
    }

    #[test]
    fn test_full_rows_and_remove_keep_height() {
        let mut board = Board::new();
        fill_row(&mut board, 21, None);
        fill_row(&mut board, 20, Some(2));
        fill_row(&mut board, 19, None);
        board.set(5, 18, Some(CellTag::Garbage));

        let rows = board.full_rows();
        assert_eq!(rows.as_slice(), &[19, 21]);

        assert_eq!(board.remove_rows(&rows), 2);
        assert_eq!(board.cells().len(), WIDTH * ROWS);
        assert!(!board.is_row_full(21));
        // The partial row moved to the floor, the lone cell sits on it.
        assert!(!board.is_occupied(2, 21));
        assert!(board.is_occupied(0, 21));
        assert!(board.is_occupied(5, 20));
        assert_eq!(board.stack_height(), 2);
    }

    #[test]
    fn test_garbage_row_has_single_hole() {
        let mut board = Board::new();
        board.set(1, 21, Some(CellTag::Piece(PieceKind::T)));
        board.push_garbage_row(6);

        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.is_occupied(x, 21), x != 6);
        }
        assert_eq!(board.get(1, 20), Some(Some(CellTag::Piece(PieceKind::T))));
        assert_eq!(board.occupied_count(), 8);
    }

    #[test]
    fn test_garbage_drops_top_row() {
        let mut board = Board::new();
        board.set(0, 0, Some(CellTag::Garbage));
        board.push_garbage_row(0);
        assert!(!board.is_occupied(0, 0));
        assert!(!board.hidden_buffer_occupied());
    }

    #[test]
    fn test_place_clips_above_board() {
        let mut board = Board::new();
        let clipped = board.place(&[(0, -1), (0, 0)], CellTag::Piece(PieceKind::I));
        assert!(clipped);
        assert!(board.is_occupied(0, 0));
        assert!(board.hidden_buffer_occupied());
    }

    #[test]
    fn test_u8_grid_codes() {
        let mut board = Board::new();
        board.set(0, 21, Some(CellTag::Garbage));
        board.set(1, 21, Some(CellTag::Piece(PieceKind::L)));
        let mut grid = [[0u8; WIDTH]; ROWS];
        board.write_u8_grid(&mut grid);
        assert_eq!(grid[21][0], 8);
        assert_eq!(grid[21][1], 7);
        assert_eq!(grid[0][0], 0);
    }
}
