//! Basic types for working with grid tiles.
mod codec;
mod codes;
mod letter;
mod tile;

pub(crate) use codec::codec;
pub use codec::Codec;
pub use codes::{Code, Label, BLANK, EMPTY, IS_STAR, LETTER_MASK, NLETTERS};
pub use letter::Letter;
pub use tile::{Tile, TileId};
