//! Quantum jump pass - probabilistic diagonal merges after spawning
//!
//! Anchors are scanned top-left to bottom-right. For each anchor the `\`
//! neighbour (r+1, c+1) is considered before the `/` neighbour (r+1, c-1).
//! A cell can belong to at most one candidate pair per pass, whether or not
//! that pair actually jumps.

use rand::Rng;

use crate::board::{Board, Pos};
use crate::report::QuantumJump;
use crate::rng::{coin, roll};

/// Outcome of one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantumPass {
    pub jumps: Vec<QuantumJump>,
    pub score: u64,
}

/// Run the quantum pass over `board` in place.
pub fn quantum_pass<R: Rng + ?Sized>(board: &mut Board, chance: f64, rng: &mut R) -> QuantumPass {
    let size = board.size();
    let mut used = vec![false; size * size];
    let mut pass = QuantumPass::default();

    for r in 0..size.saturating_sub(1) {
        for c in 0..size {
            let anchor = Pos::new(r, c);
            let diagonals = [
                (c + 1 < size).then(|| Pos::new(r + 1, c + 1)),
                c.checked_sub(1).map(|left| Pos::new(r + 1, left)),
            ];
            for other in diagonals.into_iter().flatten() {
                if used[anchor.r * size + anchor.c] {
                    break;
                }
                if used[other.r * size + other.c] || !is_pair(board, anchor, other) {
                    continue;
                }
                used[anchor.r * size + anchor.c] = true;
                used[other.r * size + other.c] = true;

                if !roll(rng, chance) {
                    continue;
                }
                let (to, from) = if coin(rng) {
                    (anchor, other)
                } else {
                    (other, anchor)
                };
                let value = board.value(to.r, to.c).saturating_mul(2);
                if let Some(tile) = board.get_mut(to.r, to.c) {
                    tile.value = value;
                }
                board.take(from.r, from.c);
                pass.score += u64::from(value);
                pass.jumps.push(QuantumJump { from, to, value });
            }
        }
    }

    pass
}

fn is_pair(board: &Board, a: Pos, b: Pos) -> bool {
    match (board.at(a), board.at(b)) {
        (Some(x), Some(y)) => x.is_tangible() && y.is_tangible() && x.value != 0 && x.value == y.value,
        _ => false,
    }
}
