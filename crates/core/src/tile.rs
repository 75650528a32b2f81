//! Tile module - a single board cell and its variant payload
//!
//! Empty cells are tiles with value 0 and no id. Every tile that carries a value
//! gets a fresh id from [`crate::GameState`] so movement can be diffed by id.

use crate::types::TileKind;

/// Stable identity of a tile for its whole lifetime
pub type TileId = u32;

/// Phase-shift bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseState {
    /// Moves until the next visibility toggle
    pub counter: u8,
    /// Currently intangible
    pub phased: bool,
    /// Value hidden while phased
    pub stored_value: u32,
}

/// Variant payload of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Special {
    #[default]
    Normal,
    Phase(PhaseState),
    /// Twin of an echo pair (pair bookkeeping lives in [`crate::special::EchoPairs`])
    Echo,
    Portal,
}

impl Special {
    pub fn kind(&self) -> TileKind {
        match self {
            Special::Normal => TileKind::Normal,
            Special::Phase(_) => TileKind::Phase,
            Special::Echo => TileKind::Echo,
            Special::Portal => TileKind::Portal,
        }
    }
}

/// One board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile {
    pub id: Option<TileId>,
    pub value: u32,
    pub special: Special,
}

impl Tile {
    /// An empty cell
    pub const EMPTY: Tile = Tile {
        id: None,
        value: 0,
        special: Special::Normal,
    };

    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// A normal tile with the given id and value
    pub fn new(id: TileId, value: u32) -> Self {
        Self {
            id: Some(id),
            value,
            special: Special::Normal,
        }
    }

    pub fn with_special(id: TileId, value: u32, special: Special) -> Self {
        Self {
            id: Some(id),
            value,
            special,
        }
    }

    pub fn kind(&self) -> TileKind {
        self.special.kind()
    }

    /// Zero value (intangible phase tiles included)
    pub fn is_empty(&self) -> bool {
        self.value == 0
    }

    /// Free for a spawn: no value and not a resting phase tile
    pub fn is_vacant(&self) -> bool {
        self.value == 0 && !matches!(self.special, Special::Phase(_)) && !self.is_portal()
    }

    /// Counts as an empty cell for the game-over check: a phased tile does,
    /// a zero-value portal does not
    pub fn is_open(&self) -> bool {
        self.value == 0 && !self.is_portal()
    }

    pub fn is_portal(&self) -> bool {
        matches!(self.special, Special::Portal)
    }

    /// Phase tile currently intangible
    pub fn is_phased(&self) -> bool {
        matches!(self.special, Special::Phase(PhaseState { phased: true, .. }))
    }

    /// Occupies its cell for sliding and merging
    pub fn is_tangible(&self) -> bool {
        !self.is_phased() && (self.value != 0 || self.is_portal())
    }

    /// Value as shown to the player (phased tiles show their hidden value)
    pub fn display_value(&self) -> u32 {
        match self.special {
            Special::Phase(PhaseState {
                phased: true,
                stored_value,
                ..
            }) => stored_value,
            _ => self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tile_is_vacant() {
        let t = Tile::empty();
        assert!(t.is_empty());
        assert!(t.is_vacant());
        assert!(!t.is_tangible());
        assert_eq!(t.kind(), TileKind::Normal);
    }

    #[test]
    fn phased_tile_is_intangible_but_not_vacant() {
        let t = Tile::with_special(
            7,
            0,
            Special::Phase(PhaseState {
                counter: 3,
                phased: true,
                stored_value: 8,
            }),
        );
        assert!(t.is_empty());
        assert!(!t.is_vacant());
        assert!(t.is_open());
        assert!(!t.is_tangible());
        assert_eq!(t.display_value(), 8);
    }

    #[test]
    fn zero_value_portal_still_tangible() {
        let t = Tile::with_special(3, 0, Special::Portal);
        assert!(t.is_tangible());
        assert!(!t.is_vacant());
        assert!(!t.is_open());
    }
}
