//! A word grid solver for Rust.
//! <br>
//! This crate finds the words on a letter grid where tiles fall down when the
//! tiles below them are played, and plays them greedily for the highest score.
//!
//! A word is a path of tiles through the grid. Each pair of consecutive tiles
//! must touch, horizontally, vertically or diagonally. Playing a word removes
//! its tiles, the blanks next to it, and more:
//! - a word of 5 or more letters also removes all tiles directly next to it,
//! - the rare letters `j`, `q`, `x` and `z` clear their whole row,
//! - each star tile in the word multiplies the score.
//!
//! Clearing the grid (almost) completely earns a bonus at the end of the game.
//!
//! # How to use `wordfall_solver`
//! Build a [`Trie`] from a word list with one word per line, then create a
//! [`Grid`] from rows of text, top row first. Lowercase letters are plain tiles,
//! uppercase letters are star tiles, `.` is a blank tile and a space is an
//! empty square.
//!
//! # Basic usage
//! ```
//! use wordfall_solver::{Grid, Solver, Trie};
//!
//! let trie = Trie::from_words(&["cat", "at"])?;
//! let grid = Grid::from_strings(&["cat"])?;
//! let mut solver = Solver::new(&trie, grid);
//! let score = solver.solve_greedily()?;
//! for play in solver.solution() {
//!     println!("{}", play);
//! }
//! assert_eq!(solver.solution()[0].word, "cat");
//! assert_eq!(score, 15 + 2000);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # About implementation
//! The trie keeps the child letters of each node in a bitset. The grid keeps one
//! stack of slots per column, and indexes the tiles by letter and star.
//! While searching, a [`Path`] tracks the path tiles per column, so it can
//! check quickly whether gravity could ever make a path playable.
mod error;
mod grid;
mod labelset;
mod path;
mod solver;
mod tiles;
mod tileset;
mod trie;

pub use error::Error;
pub use grid::{
    Grid, Neighbors, Slot, ALMOST_THERE_BONUS, ALMOST_THERE_HEIGHT, FULL_CLEAR_BONUS, LONG_WORD,
};
pub use labelset::LabelSet;
pub use path::{Extended, Path, Rejection};
pub use solver::{Play, Solver, WordCache};
pub use tiles::{
    Code, Codec, Label, Letter, Tile, TileId, BLANK, EMPTY, IS_STAR, LETTER_MASK, NLETTERS,
};
pub use tileset::{RARE_LETTERS, TILESET};
pub use trie::{Trie, TrieNode, ROOT};
