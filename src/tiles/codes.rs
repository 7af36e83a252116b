/// Code 1..26 for the letters `a`..`z`
pub type Label = u8;

/// Code used to represent a square of the board text. See [`Codec`](crate::Codec).
pub type Code = u8;

/// code for EMPTY (no tile)
pub const EMPTY: Code = 0;

/// code for a BLANK tile: a tile without a letter
pub const BLANK: Code = 0x20;

/// Mask to get label value 0..31. A blank has label 0.
pub const LETTER_MASK: u8 = 0b11111;

/// bitflag for star tiles
pub const IS_STAR: Code = 0x40;

/// An uninitialized tile
pub(super) const UNINIT: Code = 0x7f;

/// Number of letters in the alphabet
pub const NLETTERS: usize = 26;
