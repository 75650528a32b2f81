//! Row collapse engine - slide, merge and teleport a single canonical row
//!
//! The row is already oriented so that tiles collapse toward index 0. The pass:
//!
//! 1. **Slide**: empty cells are dropped. Portals stay even at value 0. Phased
//!    tiles are intangible and keep their slot; everything else is laid out
//!    around them, so tiles slide "through" a phased cell.
//! 2. **Merge**: left to right, equal neighbours merge once. The left tile
//!    doubles, keeps its id and becomes a normal tile.
//! 3. **Teleport**: a tile directly behind a portal is sent to the far end of
//!    the row. Repeats until no portal in the collapsed run is followed by a
//!    non-portal tile.
//! 4. **Pad**: remaining slots are filled with empty tiles.

use arrayvec::ArrayVec;

use crate::tile::{Special, Tile, TileId};
use crate::types::{TileKind, MAX_ROW_MERGES};

/// One merge inside a row pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRecord {
    /// Final index of the merged tile in the (padded) row
    pub index: usize,
    /// Value after merging
    pub value: u32,
    /// Tile that survives (keeps its id)
    pub survivor_id: Option<TileId>,
    /// Tile that was consumed
    pub absorbed_id: Option<TileId>,
    pub survivor_kind: TileKind,
    pub absorbed_kind: TileKind,
}

impl MergeRecord {
    /// Either source tile had the given kind
    pub fn involves(&self, kind: TileKind) -> bool {
        self.survivor_kind == kind || self.absorbed_kind == kind
    }

    /// Both source tiles had the given kind
    pub fn both(&self, kind: TileKind) -> bool {
        self.survivor_kind == kind && self.absorbed_kind == kind
    }

    /// Ids of both source tiles
    pub fn source_ids(&self) -> impl Iterator<Item = TileId> {
        self.survivor_id.into_iter().chain(self.absorbed_id)
    }
}

/// Result of collapsing one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub row: Vec<Tile>,
    /// Sum of merged values
    pub score: u64,
    /// Some cell's tile id or value differs from the input at the same index
    pub changed: bool,
    pub merges: ArrayVec<MergeRecord, MAX_ROW_MERGES>,
}

impl RowOutcome {
    /// Post-pad merge indices in merge order
    pub fn merge_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.merges.iter().map(|m| m.index)
    }

    /// Ids of echo tiles that took part in a merge
    pub fn echo_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.merges.iter().flat_map(|m| {
            let survivor = (m.survivor_kind == TileKind::Echo).then_some(m.survivor_id).flatten();
            let absorbed = (m.absorbed_kind == TileKind::Echo).then_some(m.absorbed_id).flatten();
            survivor.into_iter().chain(absorbed)
        })
    }
}

/// Collapse `row` toward index 0 and pad it to `width` cells.
pub fn collapse_row(row: &[Tile], width: usize) -> RowOutcome {
    let cell = |i: usize| row.get(i).copied().unwrap_or(Tile::EMPTY);

    let fixed: Vec<bool> = (0..width).map(|i| cell(i).is_phased()).collect();
    let moving: Vec<Tile> = (0..width)
        .map(cell)
        .filter(|t| t.is_tangible())
        .collect();

    // Merge pass. Each entry carries the index of its merge record, if any.
    let mut records: ArrayVec<MergeRecord, MAX_ROW_MERGES> = ArrayVec::new();
    let mut run: Vec<(Tile, Option<usize>)> = Vec::with_capacity(moving.len());
    let mut score: u64 = 0;
    let mut i = 0;
    while i < moving.len() {
        let current = moving[i];
        let mergeable = moving
            .get(i + 1)
            .is_some_and(|next| current.value != 0 && next.value == current.value);

        if mergeable && !records.is_full() {
            let absorbed = moving[i + 1];
            let value = current.value.saturating_mul(2);
            score += u64::from(value);
            records.push(MergeRecord {
                index: 0,
                value,
                survivor_id: current.id,
                absorbed_id: absorbed.id,
                survivor_kind: current.kind(),
                absorbed_kind: absorbed.kind(),
            });
            let survivor = Tile {
                id: current.id,
                value,
                special: Special::Normal,
            };
            run.push((survivor, Some(records.len() - 1)));
            i += 2;
        } else {
            run.push((current, None));
            i += 1;
        }
    }

    // Teleport pass: tiles directly behind a portal leave the run for the row end.
    let mut tail: Vec<(Tile, Option<usize>)> = Vec::new();
    while let Some(hop) = run
        .windows(2)
        .position(|w| w[0].0.is_portal() && !w[1].0.is_portal())
    {
        tail.push(run.remove(hop + 1));
    }

    // Lay the run, the gap and the teleported tail into the free slots.
    let free: Vec<usize> = (0..width).filter(|&i| !fixed[i]).collect();
    let gap = free.len().saturating_sub(run.len() + tail.len());
    let sequence = run
        .into_iter()
        .map(Some)
        .chain(std::iter::repeat(None).take(gap))
        .chain(tail.into_iter().map(Some));

    let mut out: Vec<Tile> = (0..width)
        .map(|i| if fixed[i] { cell(i) } else { Tile::EMPTY })
        .collect();
    for (&slot, entry) in free.iter().zip(sequence) {
        if let Some((tile, record)) = entry {
            out[slot] = tile;
            if let Some(k) = record {
                records[k].index = slot;
            }
        }
    }

    let changed = out
        .iter()
        .enumerate()
        .any(|(i, t)| {
            let before = cell(i);
            before.id != t.id || before.value != t.value
        });

    RowOutcome {
        row: out,
        score,
        changed,
        merges: records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::PhaseState;

    fn row_of(values: &[u32]) -> Vec<Tile> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| if v == 0 { Tile::EMPTY } else { Tile::new(i as TileId + 1, v) })
            .collect()
    }

    fn values(row: &[Tile]) -> Vec<u32> {
        row.iter().map(|t| t.value).collect()
    }

    #[test]
    fn triple_merges_once() {
        let out = collapse_row(&row_of(&[2, 2, 2, 0, 0, 0]), 6);
        assert_eq!(values(&out.row), vec![4, 2, 0, 0, 0, 0]);
        assert_eq!(out.merge_indices().collect::<Vec<_>>(), vec![0]);
        assert_eq!(out.score, 4);
        assert!(out.changed);
    }

    #[test]
    fn four_equal_make_two_pairs() {
        let out = collapse_row(&row_of(&[2, 2, 2, 2]), 4);
        assert_eq!(values(&out.row), vec![4, 4, 0, 0]);
        assert_eq!(out.merge_indices().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(out.score, 8);
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        let out = collapse_row(&row_of(&[2, 2, 4, 0]), 4);
        assert_eq!(values(&out.row), vec![4, 4, 0, 0]);
        assert_eq!(out.merges.len(), 1);
    }

    #[test]
    fn survivor_keeps_left_id() {
        let out = collapse_row(&row_of(&[0, 2, 0, 2]), 4);
        assert_eq!(out.row[0].id, Some(2));
        assert_eq!(out.merges[0].absorbed_id, Some(4));
    }

    #[test]
    fn collapsed_row_without_pairs_is_unchanged() {
        let row = row_of(&[2, 4, 8, 0]);
        let out = collapse_row(&row, 4);
        assert_eq!(out.row, row);
        assert!(!out.changed);
        assert_eq!(out.score, 0);
    }

    #[test]
    fn portal_sends_follower_to_row_end() {
        let mut row = row_of(&[0, 0, 0, 4, 0, 0]);
        row[2] = Tile::with_special(50, 2, Special::Portal);
        let out = collapse_row(&row, 6);
        assert_eq!(values(&out.row), vec![2, 0, 0, 0, 0, 4]);
        assert!(out.row[0].is_portal());
    }

    #[test]
    fn portal_pair_merges_into_normal_tile() {
        let row = vec![
            Tile::with_special(1, 2, Special::Portal),
            Tile::with_special(2, 2, Special::Portal),
            Tile::EMPTY,
            Tile::EMPTY,
        ];
        let out = collapse_row(&row, 4);
        assert_eq!(values(&out.row), vec![4, 0, 0, 0]);
        assert!(out.merges[0].both(TileKind::Portal));
        assert_eq!(out.row[0].kind(), TileKind::Normal);
    }

    #[test]
    fn phased_tile_stays_put_and_is_passed_through() {
        let mut row = row_of(&[0, 0, 0, 0, 0, 2]);
        row[4] = Tile::with_special(
            9,
            0,
            Special::Phase(PhaseState {
                counter: 3,
                phased: true,
                stored_value: 4,
            }),
        );
        let out = collapse_row(&row, 6);
        assert_eq!(out.row[0].value, 2);
        assert!(out.row[4].is_phased());
        assert_eq!(out.row[4].id, Some(9));
    }

    #[test]
    fn echo_ids_reported_from_merges() {
        let row = vec![
            Tile::with_special(10, 2, Special::Echo),
            Tile::new(11, 2),
            Tile::EMPTY,
        ];
        let out = collapse_row(&row, 3);
        assert_eq!(out.echo_ids().collect::<Vec<_>>(), vec![10]);
    }
}
