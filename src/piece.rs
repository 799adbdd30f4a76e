//! Tetromino shapes, colours, clockwise rotation and the falling piece.

use ratatui::style::Color;

/// Largest matrix side any shape (or its rotation) can occupy.
pub const MAX_SHAPE_SIDE: usize = 4;

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    O,
    I,
    S,
    Z,
    L,
    J,
    T,
}

impl ShapeKind {
    pub const ALL: [Self; 7] = [Self::O, Self::I, Self::S, Self::Z, Self::L, Self::J, Self::T];

    /// Canonical (spawn) orientation, rows top to bottom.
    pub fn shape(self) -> Shape {
        match self {
            Self::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            Self::I => Shape::from_rows(&[&[1], &[1], &[1], &[1]]),
            Self::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            Self::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
            Self::L => Shape::from_rows(&[&[1, 0], &[1, 0], &[1, 1]]),
            Self::J => Shape::from_rows(&[&[0, 1], &[0, 1], &[1, 1]]),
            Self::T => Shape::from_rows(&[&[1, 1, 1], &[0, 1, 0]]),
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::O => Color::Rgb(255, 0, 0),     // red
            Self::I => Color::Rgb(255, 165, 0),   // orange
            Self::S => Color::Rgb(255, 255, 0),   // yellow
            Self::Z => Color::Rgb(0, 255, 0),     // green
            Self::L => Color::Rgb(0, 0, 255),     // blue
            Self::J => Color::Rgb(75, 0, 130),    // indigo
            Self::T => Color::Rgb(238, 130, 238), // violet
        }
    }
}

/// Occupancy matrix of at most 4x4 cells. Cells outside `rows x cols` are always empty,
/// so two shapes compare equal exactly when their matrices do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    rows: usize,
    cols: usize,
    cells: [[bool; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl Shape {
    fn from_rows(rows: &[&[u8]]) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[r][c] = v != 0;
            }
        }
        Self {
            rows: rows.len(),
            cols: rows.first().map_or(0, |row| row.len()),
            cells,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row][col]
    }

    /// `(row, col)` of every occupied cell, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols).filter_map(move |c| self.cells[r][c].then_some((r, c)))
        })
    }

    /// 90° clockwise: `out[c][rows - 1 - r] = self[r][c]`. Returns a new matrix.
    pub fn rotated_cw(&self) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (r, c) in self.occupied() {
            cells[c][self.rows - 1 - r] = true;
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

/// A falling piece: kind, current (possibly rotated) shape and the top-left anchor of the
/// shape matrix in board coordinates. `y` may be negative while spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: ShapeKind,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// New piece in canonical orientation at the spawn position for a board `board_width` wide.
    pub fn new(kind: ShapeKind, board_width: usize) -> Self {
        let mut piece = Self {
            kind,
            shape: kind.shape(),
            x: 0,
            y: 0,
        };
        piece.reset_position(board_width);
        piece
    }

    /// Horizontally centred on the top row.
    pub fn reset_position(&mut self, board_width: usize) {
        self.x = (board_width / 2) as i32 - (self.shape.cols() / 2) as i32;
        self.y = 0;
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.kind.color()
    }

    /// Board coordinates `(x, y)` of every occupied cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied()
            .map(|(r, c)| (self.x + c as i32, self.y + r as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_four_cells() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.shape().occupied().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_i_is_horizontal() {
        let rotated = ShapeKind::I.shape().rotated_cw();
        assert_eq!((rotated.rows(), rotated.cols()), (1, 4));
        assert_eq!(rotated.occupied().collect::<Vec<_>>(), vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_rotate_t_clockwise() {
        // T:   ###      .#
        //      .#.  ->  ##
        //               .#
        let rotated = ShapeKind::T.shape().rotated_cw();
        assert_eq!((rotated.rows(), rotated.cols()), (3, 2));
        assert!(rotated.is_filled(0, 1));
        assert!(rotated.is_filled(1, 0));
        assert!(rotated.is_filled(1, 1));
        assert!(rotated.is_filled(2, 1));
        assert!(!rotated.is_filled(0, 0));
        assert!(!rotated.is_filled(2, 0));
    }

    #[test]
    fn test_rotate_l_matches_reverse_then_transpose() {
        // L:  #.        ###
        //     #.   ->   #..
        //     ##
        let rotated = ShapeKind::L.shape().rotated_cw();
        let expected = Shape::from_rows(&[&[1, 1, 1], &[1, 0, 0]]);
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_four_rotations_is_identity() {
        for kind in ShapeKind::ALL {
            let shape = kind.shape();
            let spun = shape.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
            assert_eq!(spun, shape, "{kind:?}");
        }
    }

    #[test]
    fn test_rotation_does_not_touch_template() {
        let template = ShapeKind::S.shape();
        let _ = template.rotated_cw();
        assert_eq!(template, ShapeKind::S.shape());
    }

    #[test]
    fn test_spawn_position_is_centred() {
        assert_eq!(Piece::new(ShapeKind::I, 10).x, 5);
        assert_eq!(Piece::new(ShapeKind::O, 10).x, 4);
        assert_eq!(Piece::new(ShapeKind::T, 10).x, 4);
        assert_eq!(Piece::new(ShapeKind::T, 10).y, 0);
    }

    #[test]
    fn test_reset_position_uses_rotated_width() {
        let mut piece = Piece::new(ShapeKind::I, 10);
        piece.shape = piece.shape.rotated_cw();
        piece.x = 0;
        piece.y = 7;
        piece.reset_position(10);
        assert_eq!((piece.x, piece.y), (3, 0));
    }

    #[test]
    fn test_cells_are_offset_by_anchor() {
        let mut piece = Piece::new(ShapeKind::O, 10);
        piece.x = 2;
        piece.y = -1;
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(2, -1), (3, -1), (2, 0), (3, 0)]);
    }
}
