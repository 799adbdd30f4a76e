//! Playfield grid of locked cells: collision probes, locking and row clearing.

use crate::piece::{Piece, Shape};
use ratatui::style::Color;
use std::collections::VecDeque;

/// Single cell: empty or locked material of a given colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Filled(Color),
}

impl Cell {
    #[inline]
    pub fn is_filled(self) -> bool {
        matches!(self, Self::Filled(_))
    }
}

/// Fixed-size grid. y=0 is top; `rows[y][x]`.
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    rows: VecDeque<Vec<Cell>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..height).map(|_| vec![Cell::Empty; width]).collect();
        Self {
            width,
            height,
            rows,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Fails closed: anything outside the grid counts as occupied.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return true;
        }
        self.get(x as usize, y as usize).is_none_or(Cell::is_filled)
    }

    /// True if `shape` anchored at `(x, y)` overlaps a wall, the floor or locked material.
    /// Cells above the top row only collide with the side walls.
    pub fn collides(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.occupied().any(|(r, c)| {
            let bx = x + c as i32;
            let by = y + r as i32;
            if by < 0 {
                return bx < 0 || bx >= self.width as i32;
            }
            self.is_occupied(bx, by)
        })
    }

    /// Writes the piece's colour into every cell it covers. Cells above the top row are dropped.
    pub fn lock(&mut self, piece: &Piece) {
        let color = piece.color();
        for (x, y) in piece.cells() {
            if x >= 0 && y >= 0 {
                self.set(x as usize, y as usize, Cell::Filled(color));
            }
        }
    }

    /// Removes every full row and pushes the same number of empty rows in at the top.
    /// Remaining rows keep their relative order. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let before = self.rows.len();
        self.rows.retain(|row| !row.iter().all(|c| c.is_filled()));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.push_front(vec![Cell::Empty; self.width]);
        }
        cleared as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::ShapeKind;

    const RED: Cell = Cell::Filled(Color::Rgb(255, 0, 0));

    fn fill_row(board: &mut Board, y: usize, except: Option<usize>) {
        for x in 0..board.width() {
            if Some(x) != except {
                board.set(x, y, RED);
            }
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 17);
        assert_eq!(board.rows().count(), 17);
        assert!(board.rows().all(|row| row.len() == 10 && row.iter().all(|c| *c == Cell::Empty)));
    }

    #[test]
    fn test_out_of_bounds_is_occupied() {
        let board = Board::new(10, 17);
        assert!(board.is_occupied(-1, 0));
        assert!(board.is_occupied(10, 0));
        assert!(board.is_occupied(0, 17));
        assert!(board.is_occupied(0, -1));
        assert!(!board.is_occupied(0, 0));
        assert!(!board.is_occupied(9, 16));
    }

    #[test]
    fn test_collides_above_top_only_with_walls() {
        let board = Board::new(10, 17);
        let i = ShapeKind::I.shape();
        assert!(!board.collides(&i, 4, -3));
        assert!(board.collides(&i, -1, -3));
        assert!(board.collides(&i, 10, -3));
    }

    #[test]
    fn test_collides_with_floor_and_material() {
        let mut board = Board::new(10, 17);
        let o = ShapeKind::O.shape();
        assert!(!board.collides(&o, 0, 15));
        assert!(board.collides(&o, 0, 16));
        board.set(1, 10, RED);
        assert!(board.collides(&o, 0, 9));
        assert!(!board.collides(&o, 2, 9));
    }

    #[test]
    fn test_collides_is_read_only() {
        let mut board = Board::new(10, 17);
        board.set(3, 3, RED);
        let snapshot: Vec<Vec<Cell>> = board.rows().map(<[Cell]>::to_vec).collect();
        let t = ShapeKind::T.shape();
        let first = board.collides(&t, 2, 2);
        let second = board.collides(&t, 2, 2);
        assert_eq!(first, second);
        let after: Vec<Vec<Cell>> = board.rows().map(<[Cell]>::to_vec).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn test_lock_writes_every_cell() {
        let mut board = Board::new(10, 17);
        let mut piece = Piece::new(ShapeKind::T, 10);
        piece.y = 5;
        board.lock(&piece);
        for (x, y) in piece.cells() {
            assert_eq!(board.get(x as usize, y as usize), Some(Cell::Filled(ShapeKind::T.color())));
        }
        let filled = board.rows().flatten().filter(|c| c.is_filled()).count();
        assert_eq!(filled, 4);
    }

    #[test]
    fn test_lock_drops_cells_above_top() {
        let mut board = Board::new(10, 17);
        let mut piece = Piece::new(ShapeKind::I, 10);
        piece.y = -2;
        board.lock(&piece);
        let filled = board.rows().flatten().filter(|c| c.is_filled()).count();
        assert_eq!(filled, 2);
        assert!(board.get(5, 0).is_some_and(Cell::is_filled));
        assert!(board.get(5, 1).is_some_and(Cell::is_filled));
    }

    #[test]
    fn test_clear_nothing() {
        let mut board = Board::new(10, 17);
        fill_row(&mut board, 16, Some(0));
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board.get(0, 16), Some(Cell::Empty));
        assert_eq!(board.get(1, 16), Some(RED));
    }

    #[test]
    fn test_clear_preserves_order_and_height() {
        let mut board = Board::new(4, 6);
        let blue = Cell::Filled(Color::Rgb(0, 0, 255));
        let green = Cell::Filled(Color::Rgb(0, 255, 0));
        // Row 1 marker, row 2 full, row 3 marker, row 4 full, row 5 marker.
        board.set(0, 1, blue);
        fill_row(&mut board, 2, None);
        board.set(1, 3, green);
        fill_row(&mut board, 4, None);
        board.set(2, 5, blue);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.rows().count(), 6);
        assert!(board.rows().take(2).all(|row| row.iter().all(|c| *c == Cell::Empty)));
        assert_eq!(board.get(0, 3), Some(blue));
        assert_eq!(board.get(1, 4), Some(green));
        assert_eq!(board.get(2, 5), Some(blue));
        assert!(board.rows().all(|row| row.len() == 4));
    }

    #[test]
    fn test_clear_entire_board() {
        let mut board = Board::new(3, 3);
        for y in 0..3 {
            fill_row(&mut board, y, None);
        }
        assert_eq!(board.clear_full_rows(), 3);
        assert!(board.rows().flatten().all(|c| *c == Cell::Empty));
    }
}
