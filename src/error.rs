use crate::tiles::TileId;
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors that can be returned
pub enum Error {
    /// Error reading board or wordfile
    #[error("File \"{path}\" could not be read")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// Error writing a serialized trie
    #[error("File \"{path}\" could not be written")]
    WriteError {
        path: String,
        source: std::io::Error,
    },

    /// Error deserializing bincoded wordfile
    #[cfg(all(feature = "serde", feature = "bincode"))]
    #[error("Wordfile {0} could not be deserialized")]
    WordfileDeserializeError(String),

    /// Token can not be encoded
    #[error("Encoder: invalid token '{0}'")]
    EncodeInvalidToken(String),

    /// Code is not valid for a tile face
    #[error("Invalid code for letter {0}")]
    InvalidLetterCode(u8),

    /// A dictionary word contains something other than `a`..`z`
    #[error("Invalid word \"{0}\"")]
    InvalidWord(String),

    /// A board needs at least one row
    #[error("Invalid number of rows {0} (expect at least 1)")]
    InvalidRowCount(usize),

    /// All rows of a board must have the same length
    #[error("Invalid row \"{row}\": length {len}, expect {expect}")]
    InvalidRowLength {
        row: String,
        len: usize,
        expect: usize,
    },

    /// A tile sits above an empty square
    #[error("Tile at row {row}, col {col} is floating above an empty square")]
    FloatingTile { row: usize, col: usize },

    /// Error parsing a serialized trie
    #[error("Serialized trie invalid at byte {pos}: {reason}")]
    TrieParseError { pos: usize, reason: &'static str },

    /// Attempt to use a tile that is no longer on the grid
    #[error("Tile {0:?} is not on the grid")]
    StaleTile(TileId),

    /// The grid indexes disagree with the column stacks
    #[error("Tile {id:?} is missing from the {index} index")]
    IndexMismatch { id: TileId, index: &'static str },

    /// Two consecutive tiles of a played word don't touch
    #[error("Word {0} is not connected on the grid")]
    DisconnectedPath(String),
}
