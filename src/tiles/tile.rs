use super::Letter;
use std::fmt;

/// Stable identifier of a tile: an index into the tile table of a [`Grid`](crate::Grid).
///
/// Ids are never reused, so an id of a removed tile simply resolves to nothing.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileId(pub(crate) u32);

impl TileId {
    /// Index into the tile table
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A tile on the grid: its id, its current position and its face.
///
/// Row 0 is the bottom row of the grid.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub(crate) id: TileId,
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) letter: Letter,
}

impl Tile {
    pub(crate) fn new(id: TileId, row: usize, col: usize, letter: Letter) -> Tile {
        Tile {
            id,
            row,
            col,
            letter,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Position as (row, col)
    pub fn pos(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn letter(&self) -> Letter {
        self.letter
    }

    pub fn is_blank(&self) -> bool {
        self.letter.is_blank()
    }

    pub fn is_star(&self) -> bool {
        self.letter.is_star()
    }

    pub fn is_rare(&self) -> bool {
        self.letter.is_rare()
    }

    pub fn value(&self) -> u32 {
        self.letter.value()
    }

    /// True if `other` is one of the 8 squares around this tile.
    pub fn is_moore_adjacent(&self, other: &Tile) -> bool {
        let dr = (self.row as isize - other.row as isize).abs();
        let dc = (self.col as isize - other.col as isize).abs();
        dr <= 1 && dc <= 1 && dr + dc > 0
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@({},{})", self.letter, self.row, self.col)
    }
}
