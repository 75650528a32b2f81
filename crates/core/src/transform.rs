//! Transform module - maps any slide direction onto a single canonical one
//!
//! In the canonical frame every row collapses toward column 0, so the row
//! engine only has to implement a left slide. A direction selects how board
//! coordinates map into that frame:
//!
//! | Direction | canonical (r, c) reads original |
//! |-----------|---------------------------------|
//! | left      | (r, c)                          |
//! | right     | (r, n-1-c)                      |
//! | up        | (c, r)                          |
//! | down      | (n-1-c, r)                      |

use crate::board::{Board, Pos};
use crate::types::Direction;

/// Original-frame position of canonical cell `(r, c)`.
#[inline]
pub fn from_canonical(pos: Pos, direction: Direction, size: usize) -> Pos {
    let Pos { r, c } = pos;
    match direction {
        Direction::Left => Pos::new(r, c),
        Direction::Right => Pos::new(r, size - 1 - c),
        Direction::Up => Pos::new(c, r),
        Direction::Down => Pos::new(size - 1 - c, r),
    }
}

/// Canonical-frame position of original cell `(r, c)`.
#[inline]
pub fn to_canonical(pos: Pos, direction: Direction, size: usize) -> Pos {
    let Pos { r, c } = pos;
    match direction {
        Direction::Left => Pos::new(r, c),
        Direction::Right => Pos::new(r, size - 1 - c),
        Direction::Up => Pos::new(c, r),
        Direction::Down => Pos::new(c, size - 1 - r),
    }
}

/// Map a coordinate between frames.
///
/// `reverse = false` maps an original position into the canonical frame,
/// `reverse = true` maps a canonical position back.
pub fn transform_coord(r: usize, c: usize, direction: Direction, size: usize, reverse: bool) -> Pos {
    let pos = Pos::new(r, c);
    if reverse {
        from_canonical(pos, direction, size)
    } else {
        to_canonical(pos, direction, size)
    }
}

/// Re-orient a whole board.
///
/// `reverse = false` produces the canonical board for `direction`,
/// `reverse = true` restores the original orientation of a canonical board.
pub fn transform_board(board: &Board, direction: Direction, reverse: bool) -> Board {
    let size = board.size();
    let mut out = Board::new(size);
    for r in 0..size {
        for c in 0..size {
            let src = if reverse {
                to_canonical(Pos::new(r, c), direction, size)
            } else {
                from_canonical(Pos::new(r, c), direction, size)
            };
            if let Some(tile) = board.at(src) {
                out.set(r, c, *tile);
            }
        }
    }
    out
}
