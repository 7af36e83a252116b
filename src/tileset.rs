use crate::tiles::Label;

/// label, count, points
type TileInfo = (&'static str, u32, u32);

/// The tile distribution, indexed by label. Index 0 is the blank tile.
/// `count` is the relative frequency of a letter on a random board.
pub const TILESET: [TileInfo; 27] = [
    (".", 0, 0),
    ("a", 9, 1),
    ("b", 2, 3),
    ("c", 2, 3),
    ("d", 4, 2),
    ("e", 12, 1),
    ("f", 2, 4),
    ("g", 3, 2),
    ("h", 2, 4),
    ("i", 9, 1),
    ("j", 1, 8),
    ("k", 1, 5),
    ("l", 4, 1),
    ("m", 2, 3),
    ("n", 6, 1),
    ("o", 8, 1),
    ("p", 2, 3),
    ("q", 1, 10),
    ("r", 6, 1),
    ("s", 4, 1),
    ("t", 6, 1),
    ("u", 4, 1),
    ("v", 2, 4),
    ("w", 2, 4),
    ("x", 1, 8),
    ("y", 2, 4),
    ("z", 1, 10),
];

/// Letters that clear their whole row when played.
pub const RARE_LETTERS: [Label; 4] = [10, 17, 24, 26]; // j q x z

/// Return the points for a letter, or 0 if not found
pub fn points(label: Label) -> u32 {
    TILESET.get(label as usize).map_or(0, |tile| tile.2)
}

/// Return the relative frequency of a letter, or 0 if not found
pub fn count(label: Label) -> u32 {
    TILESET.get(label as usize).map_or(0, |tile| tile.1)
}

/// Check if `label` is one of the [`RARE_LETTERS`].
pub fn is_rare(label: Label) -> bool {
    RARE_LETTERS.contains(&label)
}
