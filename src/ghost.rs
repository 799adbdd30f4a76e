//! Landing preview for the active piece.

use crate::board::Board;
use crate::piece::Piece;

/// Row the piece would come to rest on if dropped straight down from where it is.
/// Never mutates either argument.
pub fn landing_y(board: &Board, piece: &Piece) -> i32 {
    let mut offset = 0;
    while !board.collides(&piece.shape, piece.x, piece.y + offset + 1) {
        offset += 1;
    }
    piece.y + offset
}

/// Copy of `piece` moved to its landing row.
pub fn project(board: &Board, piece: &Piece) -> Piece {
    Piece {
        y: landing_y(board, piece),
        ..*piece
    }
}
