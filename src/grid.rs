use crate::path::Path;
use crate::tiles::{codec, Label, Letter, Tile, TileId, EMPTY, NLETTERS};
use crate::tileset;
use crate::Error;
use multiset::HashMultiSet;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};
use std::convert::TryFrom;
use std::fmt;
use tinyvec::ArrayVec;

/// Words of at least this many tiles also clear all lettered neighbours.
pub const LONG_WORD: usize = 5;

/// Columns must be at most this high for the "almost there" bonus.
pub const ALMOST_THERE_HEIGHT: usize = 2;

/// Bonus when every column holds at most [`ALMOST_THERE_HEIGHT`] tiles.
pub const ALMOST_THERE_BONUS: u32 = 1000;

/// Extra bonus for clearing the whole grid.
pub const FULL_CLEAR_BONUS: u32 = 1000;

/// Probability of a star tile on a random grid.
const STAR_PROBABILITY: f64 = 0.1;

const MOORE: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const VON_NEUMANN: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// A list of up to 8 neighbouring tiles.
pub type Neighbors = ArrayVec<[TileId; 8]>;

/// A square in a column stack.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Slot {
    Occupied(TileId),
    Empty,
}

/// The playing field: `rows` x `cols` squares, stored as one bottom-to-top
/// stack of slots per column.
///
/// In every column the empty slots form a suffix: a tile never floats above an
/// empty square. Removing a tile lets everything above it fall one row.
/// Tiles are owned by the grid and addressed by [`TileId`].
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    tiles: Vec<Option<Tile>>,
    columns: Vec<Vec<Slot>>,
    stars: BTreeSet<TileId>,
    letters: BTreeMap<Label, BTreeSet<TileId>>,
    column_letters: Vec<HashMultiSet<Label>>,
}

/// Display the grid as rows of text, top row first.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_strings().join("\n"))
    }
}

impl Grid {
    /// Create a grid without tiles.
    pub fn empty(rows: usize, cols: usize) -> Grid {
        Grid {
            rows,
            cols,
            tiles: Vec::new(),
            columns: vec![vec![Slot::Empty; rows]; cols],
            stars: BTreeSet::new(),
            letters: BTreeMap::new(),
            column_letters: (0..cols).map(|_| HashMultiSet::new()).collect(),
        }
    }

    /// Parse a grid from rows of text, top row first.
    ///
    /// - `a`..`z`: a tile
    /// - `A`..`Z`: a star tile
    /// - `.`: a blank tile (no letter)
    /// - ` `: an empty square
    ///
    /// ## Errors
    /// If there are no rows, the rows differ in length, a character can't be
    /// encoded, or a tile floats above an empty square.
    /// ## Examples
    /// ```
    /// # use wordfall_solver::{Error, Grid};
    /// let grid = Grid::from_strings(&[
    ///     "  b ",
    ///     "cAt.",
    /// ])?;
    /// assert_eq!(grid.rows(), 2);
    /// assert_eq!(grid.len(), 5);
    /// assert!(grid.tile_at(0, 1).unwrap().is_star());
    /// assert_eq!(grid.tile_at(1, 2).unwrap().letter().to_char(), 'b');
    /// # Ok::<(), Error>(())
    /// ```
    pub fn from_strings<S: AsRef<str>>(text: &[S]) -> Result<Grid, Error> {
        if text.is_empty() {
            return Err(Error::InvalidRowCount(0));
        }
        let codes = text
            .iter()
            .map(|row| codec().encode(row.as_ref()))
            .collect::<Result<Vec<_>, Error>>()?;
        let cols = codes[0].len();
        for (row, encoded) in text.iter().zip(&codes) {
            if encoded.len() != cols {
                return Err(Error::InvalidRowLength {
                    row: String::from(row.as_ref()),
                    len: encoded.len(),
                    expect: cols,
                });
            }
        }
        let rows = codes.len();
        let mut grid = Grid::empty(rows, cols);
        for col in 0..cols {
            for row in 0..rows {
                let code = codes[rows - 1 - row][col];
                if code == EMPTY {
                    continue;
                }
                if grid.column_height(col) != row {
                    return Err(Error::FloatingTile { row, col });
                }
                grid.push_tile(col, Letter::try_from(code)?);
            }
        }
        Ok(grid)
    }

    /// Create a full grid with random letters, drawn with the tileset frequencies.
    /// The same `seed` always gives the same grid.
    pub fn random(rows: usize, cols: usize, seed: u64) -> Grid {
        let mut rng = StdRng::seed_from_u64(seed);
        let bag: Vec<Letter> = (1..=NLETTERS as Label)
            .filter_map(|label| Letter::from_label(label).ok())
            .flat_map(|letter| {
                std::iter::repeat(letter).take(tileset::count(letter.label()) as usize)
            })
            .collect();
        let mut grid = Grid::empty(rows, cols);
        for col in 0..cols {
            for _ in 0..rows {
                if let Some(&letter) = bag.choose(&mut rng) {
                    let letter = if rng.gen_bool(STAR_PROBABILITY) {
                        letter.with_star()
                    } else {
                        letter
                    };
                    grid.push_tile(col, letter);
                }
            }
        }
        grid
    }

    /// Put a new tile on top of column `col`.
    fn push_tile(&mut self, col: usize, letter: Letter) -> TileId {
        let row = self.column_height(col);
        let id = TileId(self.tiles.len() as u32);
        self.tiles.push(Some(Tile::new(id, row, col, letter)));
        self.columns[col][row] = Slot::Occupied(id);
        if letter.is_star() {
            self.stars.insert(id);
        }
        if !letter.is_blank() {
            self.letters.entry(letter.label()).or_default().insert(id);
            self.column_letters[col].insert(letter.label());
        }
        id
    }

    /// Get grid rows as strings, top row first. Inverse of [`from_strings`](Grid::from_strings).
    pub fn to_strings(&self) -> Vec<String> {
        (0..self.rows)
            .rev()
            .map(|row| {
                (0..self.cols)
                    .map(|col| match self.tile_at(row, col) {
                        Some(tile) => codec().decode_code(tile.letter().code()),
                        None => codec().decode_code(EMPTY),
                    })
                    .collect()
            })
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the tile with `id`, or None if it has been removed.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index()).and_then(Option::as_ref)
    }

    /// Return the slot at row, col or None if outside the grid.
    pub fn slot(&self, row: usize, col: usize) -> Option<Slot> {
        self.columns.get(col).and_then(|column| column.get(row)).copied()
    }

    /// Return tile at row, col or None if empty square or outside grid.
    pub fn tile_at(&self, row: usize, col: usize) -> Option<&Tile> {
        match self.slot(row, col)? {
            Slot::Occupied(id) => self.tile(id),
            Slot::Empty => None,
        }
    }

    /// Iterate over all tiles on the grid, in id order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    /// The number of tiles on the grid
    pub fn len(&self) -> usize {
        (0..self.cols).map(|col| self.column_height(col)).sum()
    }

    /// Check if all tiles are cleared
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of tiles in column `col`, 0 outside the grid.
    pub fn column_height(&self, col: usize) -> usize {
        self.columns.get(col).map_or(0, |column| {
            column
                .iter()
                .position(|slot| *slot == Slot::Empty)
                .unwrap_or(column.len())
        })
    }

    /// Tiles in column `col`, bottom to top. Empty outside the grid.
    pub fn column(&self, col: usize) -> Vec<&Tile> {
        (0..self.column_height(col))
            .filter_map(|row| self.tile_at(row, col))
            .collect()
    }

    /// Tiles in row `row`, left to right. Empty outside the grid.
    pub fn row(&self, row: usize) -> Vec<&Tile> {
        (0..self.cols)
            .filter_map(|col| self.tile_at(row, col))
            .collect()
    }

    /// Ids of all star tiles
    pub fn star_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.stars.iter().copied()
    }

    /// Ids of all tiles with letter `label`, in id order.
    pub fn tiles_with_letter(&self, label: Label) -> impl Iterator<Item = TileId> + '_ {
        self.letters.get(&label).into_iter().flatten().copied()
    }

    /// The number of tiles with letter `label` in column `col`.
    pub fn letter_count(&self, col: usize, label: Label) -> usize {
        self.column_letters
            .get(col)
            .map_or(0, |letters| letters.count_of(&label))
    }

    fn neighbors(&self, tile: &Tile, offsets: &[(isize, isize)]) -> Neighbors {
        offsets
            .iter()
            .filter_map(|&(dr, dc)| {
                let row = tile.row() as isize + dr;
                let col = tile.col() as isize + dc;
                if row < 0 || col < 0 {
                    return None;
                }
                self.tile_at(row as usize, col as usize).map(Tile::id)
            })
            .collect()
    }

    /// The tiles on the 8 squares around `tile`.
    pub fn moore_neighbors(&self, tile: &Tile) -> Neighbors {
        self.neighbors(tile, &MOORE)
    }

    /// The tiles directly above, below, left and right of `tile`.
    pub fn von_neumann_neighbors(&self, tile: &Tile) -> Neighbors {
        self.neighbors(tile, &VON_NEUMANN)
    }

    /// Candidates to extend `path`: the lettered Moore neighbours of its last
    /// tile that are not already in the path.
    pub fn possible_next_tiles(&self, path: &Path) -> Neighbors {
        match path.last() {
            Some(last) => self
                .moore_neighbors(last)
                .into_iter()
                .filter(|&id| self.is_candidate(path, id))
                .collect(),
            None => Neighbors::new(),
        }
    }

    /// Check if `path` can be played now: all its tiles are on the grid and
    /// every pair of consecutive tiles touches.
    pub fn is_connected(&self, path: &Path) -> bool {
        let tiles: Option<Vec<&Tile>> = path.ids().map(|id| self.tile(id)).collect();
        tiles.map_or(false, |tiles| {
            !tiles.is_empty()
                && tiles
                    .windows(2)
                    .all(|pair| pair[0].is_moore_adjacent(pair[1]))
        })
    }

    /// Candidates to extend `path` when gravity may still bring tiles together:
    /// every lettered tile in the column of the last tile or a column next to
    /// it, that is not already in the path.
    pub fn reachable_next_tiles(&self, path: &Path) -> Vec<TileId> {
        let last = match path.last() {
            Some(last) => last,
            None => return Vec::new(),
        };
        let first = last.col().saturating_sub(1);
        (first..=last.col() + 1)
            .flat_map(|col| self.column(col))
            .map(Tile::id)
            .filter(|&id| self.is_candidate(path, id))
            .collect()
    }

    fn is_candidate(&self, path: &Path, id: TileId) -> bool {
        self.tile(id).map_or(false, |tile| !tile.is_blank()) && !path.contains(id)
    }

    /// All tiles that are removed when `path` is played:
    /// - the tiles of the path,
    /// - their Von Neumann neighbours: only blanks for words shorter than
    ///   [`LONG_WORD`], all of them for longer words,
    /// - the whole row of every tile with a rare letter.
    pub fn tiles_removed_by(&self, path: &Path) -> BTreeSet<TileId> {
        let long = path.len() >= LONG_WORD;
        let mut removed = BTreeSet::new();
        for tile in path.tiles().iter().filter_map(|t| self.tile(t.id())) {
            removed.insert(tile.id());
            for id in self.von_neumann_neighbors(tile) {
                if long || self.tile(id).map_or(false, Tile::is_blank) {
                    removed.insert(id);
                }
            }
            if tile.is_rare() {
                removed.extend(self.row(tile.row()).into_iter().map(Tile::id));
            }
        }
        removed
    }

    /// Score for playing `path`: the value of all removed tiles, times the
    /// word length, times one plus the number of stars in the word.
    /// ## Examples
    /// ```
    /// # use wordfall_solver::{Error, Grid, Path};
    /// let grid = Grid::from_strings(&["Cats"])?;
    /// let mut path = Path::new();
    /// for col in 0..3 {
    ///     path.push_back(*grid.tile_at(0, col).unwrap()).unwrap();
    /// }
    /// assert_eq!(path.word(), "cat");
    /// assert_eq!(grid.score_path(&path), (3 + 1 + 1) * 3 * 2);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn score_path(&self, path: &Path) -> u32 {
        let value: u32 = self
            .tiles_removed_by(path)
            .into_iter()
            .filter_map(|id| self.tile(id))
            .filter(|tile| !tile.is_blank())
            .map(Tile::value)
            .sum();
        value * path.len() as u32 * (1 + path.star_count())
    }

    /// Remove all [`tiles_removed_by`](Grid::tiles_removed_by) `path`, and let the
    /// remaining tiles fall. Returns the removed tile ids.
    /// ## Errors
    /// If a tile of the path is no longer on the grid, or the grid is inconsistent.
    /// The grid is not modified when an error is returned.
    pub fn clear_path(&mut self, path: &Path) -> Result<BTreeSet<TileId>, Error> {
        for tile in path.tiles() {
            self.tile(tile.id()).ok_or(Error::StaleTile(tile.id()))?;
        }
        let removed = self.tiles_removed_by(path);
        let mut next = self.clone();
        for &id in &removed {
            next.clear_tile(id)?;
        }
        *self = next;
        Ok(removed)
    }

    /// Remove a single tile. Every tile above it in its column falls one row.
    /// ## Errors
    /// - [`StaleTile`](Error::StaleTile) if the tile is not on the grid.
    /// - [`IndexMismatch`](Error::IndexMismatch) if the grid indexes disagree with the tile.
    pub fn clear_tile(&mut self, id: TileId) -> Result<(), Error> {
        let tile = *self.tile(id).ok_or(Error::StaleTile(id))?;
        let (row, col) = tile.pos();
        if self.slot(row, col) != Some(Slot::Occupied(id)) {
            return Err(Error::IndexMismatch { id, index: "column" });
        }
        if tile.is_star() && !self.stars.contains(&id) {
            return Err(Error::IndexMismatch { id, index: "star" });
        }
        let label = tile.letter().label();
        if !tile.is_blank() {
            if !self.letters.get(&label).map_or(false, |ids| ids.contains(&id)) {
                return Err(Error::IndexMismatch { id, index: "letter" });
            }
            if self.letter_count(col, label) == 0 {
                return Err(Error::IndexMismatch {
                    id,
                    index: "column letter",
                });
            }
        }

        let column = &mut self.columns[col];
        column.remove(row);
        column.push(Slot::Empty);
        for (r, slot) in column.iter().enumerate().skip(row) {
            if let Slot::Occupied(above) = *slot {
                if let Some(fallen) = self.tiles[above.index()].as_mut() {
                    fallen.row = r;
                }
            }
        }

        self.stars.remove(&id);
        if !tile.is_blank() {
            if let Some(ids) = self.letters.get_mut(&label) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.letters.remove(&label);
                }
            }
            self.column_letters[col].remove(&label);
        }
        self.tiles[id.index()] = None;
        Ok(())
    }

    /// End of game bonus: [`ALMOST_THERE_BONUS`] when no column holds more than
    /// [`ALMOST_THERE_HEIGHT`] tiles, plus [`FULL_CLEAR_BONUS`] when the grid is empty.
    pub fn score_bonuses(&self) -> u32 {
        let mut bonus = 0;
        if (0..self.cols).all(|col| self.column_height(col) <= ALMOST_THERE_HEIGHT) {
            bonus += ALMOST_THERE_BONUS;
        }
        if self.is_empty() {
            bonus += FULL_CLEAR_BONUS;
        }
        bonus
    }

    /// Verify that the column stacks, the tile table and all indexes agree.
    /// ## Errors
    /// The first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), Error> {
        let mut on_grid = 0;
        for (col, column) in self.columns.iter().enumerate() {
            let height = self.column_height(col);
            for (row, slot) in column.iter().enumerate() {
                let id = match *slot {
                    Slot::Occupied(id) => id,
                    Slot::Empty => continue,
                };
                if row >= height {
                    return Err(Error::FloatingTile { row, col });
                }
                let tile = self.tile(id).ok_or(Error::StaleTile(id))?;
                if tile.pos() != (row, col) {
                    return Err(Error::IndexMismatch {
                        id,
                        index: "position",
                    });
                }
                if tile.is_star() != self.stars.contains(&id) {
                    return Err(Error::IndexMismatch { id, index: "star" });
                }
                if !tile.is_blank()
                    && !self
                        .letters
                        .get(&tile.letter().label())
                        .map_or(false, |ids| ids.contains(&id))
                {
                    return Err(Error::IndexMismatch { id, index: "letter" });
                }
                on_grid += 1;
            }
            for label in 1..=NLETTERS as Label {
                let counted = self
                    .column(col)
                    .iter()
                    .filter(|tile| !tile.is_blank() && tile.letter().label() == label)
                    .count();
                if counted != self.letter_count(col, label) {
                    let id = self.column(col).first().map_or(TileId(0), |t| t.id());
                    return Err(Error::IndexMismatch {
                        id,
                        index: "column letter",
                    });
                }
            }
        }
        if let Some(&id) = self.stars.iter().find(|&&id| self.tile(id).is_none()) {
            return Err(Error::IndexMismatch { id, index: "star" });
        }
        let indexed: usize = self.letters.values().map(BTreeSet::len).sum();
        let lettered = self.tiles().filter(|tile| !tile.is_blank()).count();
        if indexed != lettered || self.tiles().count() != on_grid {
            let id = self.tiles().next().map_or(TileId(0), Tile::id);
            return Err(Error::IndexMismatch { id, index: "letter" });
        }
        Ok(())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::empty(0, 0)
    }
}
