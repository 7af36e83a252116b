use crate::tiles::{Label, Tile, TileId};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Why a tile can not extend a [`Path`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The tile is already in the path
    Repeat,
    /// The tile is more than one column away from the last tile
    ColumnGap,
    /// Another path tile sits between two consecutive tiles of the same column
    InterruptedColumn,
    /// No amount of falling makes every consecutive pair adjacent
    Unsatisfiable,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match self {
            Rejection::Repeat => "tile already in path",
            Rejection::ColumnGap => "column gap",
            Rejection::InterruptedColumn => "interrupted column",
            Rejection::Unsatisfiable => "tiles can never become adjacent",
        };
        write!(f, "{}", reason)
    }
}

/// An ordered sequence of tiles that spells a word.
///
/// Consecutive tiles need not be adjacent right now: the path is accepted as
/// long as removing the tiles of the grid from under them could make every
/// consecutive pair adjacent. Tiles keep the position they had when they were
/// added.
///
/// Besides the tiles, the path keeps for every column the path tiles in that
/// column, sorted by row. The position of a tile in that list is its *floor*:
/// the lowest row the tile can ever fall to while the path tiles below it are
/// still there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    tiles: Vec<Tile>,
    columns: BTreeMap<usize, Vec<usize>>,
    stars: u32,
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tiles: Vec<String> = self.tiles.iter().map(Tile::to_string).collect();
        write!(f, "{} [{}]", self.word(), tiles.join(" "))
    }
}

impl Path {
    pub fn new() -> Path {
        Path::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn last(&self) -> Option<&Tile> {
        self.tiles.last()
    }

    /// The tile ids, in path order.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(Tile::id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.iter().any(|tile| tile.id() == id)
    }

    /// The number of star tiles in the path
    pub fn star_count(&self) -> u32 {
        self.stars
    }

    /// The letter labels, in path order.
    pub fn labels(&self) -> Vec<Label> {
        self.tiles.iter().map(|tile| tile.letter().label()).collect()
    }

    /// The word spelled by the path, `.` for a blank.
    pub fn word(&self) -> String {
        self.tiles.iter().map(|tile| tile.letter().to_char()).collect()
    }

    /// The floor of the `i`th tile: the number of path tiles below it in its column.
    pub fn floor(&self, i: usize) -> Option<usize> {
        let tile = self.tiles.get(i)?;
        self.columns[&tile.col()].iter().position(|&j| j == i)
    }

    /// Add `tile` to the end of the path.
    /// ## Errors
    /// The [`Rejection`] if the tile can not follow the path. The path is not
    /// modified in that case.
    /// ## Examples
    /// ```
    /// # use wordfall_solver::{Error, Grid, Path, Rejection};
    /// let grid = Grid::from_strings(&[
    ///     "c  ",
    ///     "xx ",
    ///     "xxa",
    /// ])?;
    /// let mut path = Path::new();
    /// path.push_back(*grid.tile_at(2, 0).unwrap()).unwrap();
    /// assert_eq!(path.push_back(*grid.tile_at(0, 2).unwrap()), Err(Rejection::ColumnGap));
    /// // "x" is two rows below "c", but "c" falls once the tiles under it are gone
    /// path.push_back(*grid.tile_at(0, 1).unwrap()).unwrap();
    /// path.push_back(*grid.tile_at(0, 2).unwrap()).unwrap();
    /// assert_eq!(path.word(), "cxa");
    /// # Ok::<(), Error>(())
    /// ```
    pub fn push_back(&mut self, tile: Tile) -> Result<(), Rejection> {
        if self.contains(tile.id()) {
            return Err(Rejection::Repeat);
        }
        if let Some(last) = self.tiles.last() {
            if (last.col() as isize - tile.col() as isize).abs() > 1 {
                return Err(Rejection::ColumnGap);
            }
        }
        let index = self.tiles.len();
        let tiles = &self.tiles;
        let column = self.columns.entry(tile.col()).or_default();
        let pos = column.partition_point(|&i| tiles[i].row() < tile.row());
        column.insert(pos, index);
        self.tiles.push(tile);
        if tile.is_star() {
            self.stars += 1;
        }

        if self.interrupts(tile.col()) {
            self.pop_back();
            return Err(Rejection::InterruptedColumn);
        }
        if !self.is_possible() {
            self.pop_back();
            return Err(Rejection::Unsatisfiable);
        }
        Ok(())
    }

    /// Remove the last tile. Exactly undoes the last successful [`push_back`](Path::push_back).
    pub fn pop_back(&mut self) -> Option<Tile> {
        let tile = self.tiles.pop()?;
        let index = self.tiles.len();
        if let Some(column) = self.columns.get_mut(&tile.col()) {
            column.retain(|&i| i != index);
            if column.is_empty() {
                self.columns.remove(&tile.col());
            }
        }
        if tile.is_star() {
            self.stars -= 1;
        }
        Some(tile)
    }

    /// Add `tile` for the lifetime of the returned guard, which removes it again when dropped.
    /// ## Errors
    /// The [`Rejection`] if the tile can not follow the path.
    pub fn extend_scoped(&mut self, tile: Tile) -> Result<Extended<'_>, Rejection> {
        self.push_back(tile)?;
        Ok(Extended { path: self })
    }

    /// Two tiles that follow each other in the path and share a column can only
    /// meet when no other path tile is between them.
    fn interrupts(&self, col: usize) -> bool {
        let column = match self.columns.get(&col) {
            Some(column) => column,
            None => return false,
        };
        column.iter().enumerate().any(|(k, &i)| {
            column
                .iter()
                .position(|&j| j == i + 1)
                .map_or(false, |next| (next as isize - k as isize).abs() != 1)
        })
    }

    /// Check if gravity can bring every pair of consecutive tiles together.
    ///
    /// Works on scratch rows, visiting tiles from the lowest row up. When a
    /// tile and its neighbour in the path are apart, the higher one is lowered
    /// to just above the lower one, the path tiles above it in its column drop
    /// along, and the path tiles below it make room. Fails when a tile has to
    /// go below its floor. After every adjustment the scan starts over.
    pub fn is_possible(&self) -> bool {
        let n = self.tiles.len();
        if n < 2 {
            return true;
        }
        let mut rows: Vec<isize> = self.tiles.iter().map(|t| t.row() as isize).collect();
        let mut floors = vec![0; n];
        for column in self.columns.values() {
            for (k, &i) in column.iter().enumerate() {
                floors[i] = k;
            }
        }
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| (self.tiles[i].row(), self.tiles[i].col(), i));

        'scan: loop {
            for &i in &order {
                let neighbors = [i.checked_sub(1), Some(i + 1).filter(|&j| j < n)];
                for &j in neighbors.iter().flatten() {
                    if (self.tiles[i].col() as isize - self.tiles[j].col() as isize).abs() > 1 {
                        return false;
                    }
                    if (rows[i] - rows[j]).abs() <= 1 {
                        continue;
                    }
                    let (fixed, loose) = if rows[i] < rows[j] { (i, j) } else { (j, i) };
                    let target = rows[fixed] + 1;
                    if target < floors[loose] as isize {
                        return false;
                    }
                    self.settle(&mut rows, loose, floors[loose], target);
                    continue 'scan;
                }
            }
            return true;
        }
    }

    /// Lower tile `loose`, at position `k` in its column, to row `target`.
    fn settle(&self, rows: &mut [isize], loose: usize, k: usize, target: isize) {
        let column = &self.columns[&self.tiles[loose].col()];
        let delta = rows[loose] - target;
        for &i in &column[k..] {
            rows[i] -= delta;
        }
        for m in (0..k).rev() {
            let above = rows[column[m + 1]];
            let i = column[m];
            rows[i] = rows[i].min(above - 1);
        }
    }
}

/// A [`Path`] with one extra tile, see [`Path::extend_scoped`].
pub struct Extended<'p> {
    path: &'p mut Path,
}

impl Deref for Extended<'_> {
    type Target = Path;
    fn deref(&self) -> &Path {
        self.path
    }
}

impl DerefMut for Extended<'_> {
    fn deref_mut(&mut self) -> &mut Path {
        self.path
    }
}

impl Drop for Extended<'_> {
    fn drop(&mut self) {
        self.path.pop_back();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Grid};

    type Result<T> = std::result::Result<T, Error>;

    fn tile(grid: &Grid, row: usize, col: usize) -> Tile {
        *grid.tile_at(row, col).unwrap()
    }

    #[test]
    fn test_adjacent_path() -> Result<()> {
        let grid = Grid::from_strings(&["ab", "Cd"])?;
        let mut path = Path::new();
        for &(row, col) in &[(0, 0), (1, 0), (1, 1), (0, 1)] {
            path.push_back(tile(&grid, row, col)).unwrap();
        }
        assert_eq!(path.word(), "cabd");
        assert_eq!(path.len(), 4);
        assert_eq!(path.star_count(), 1);
        assert_eq!(path.floor(1), Some(1));
        assert_eq!(path.floor(3), Some(0));
        assert!(path.is_possible());
        Ok(())
    }

    #[test]
    fn test_repeat() -> Result<()> {
        let grid = Grid::from_strings(&["ab"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 0)).unwrap();
        path.push_back(tile(&grid, 0, 1)).unwrap();
        assert_eq!(path.push_back(tile(&grid, 0, 0)), Err(Rejection::Repeat));
        assert_eq!(path.word(), "ab");
        Ok(())
    }

    #[test]
    fn test_column_gap() -> Result<()> {
        let grid = Grid::from_strings(&["abc"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 0)).unwrap();
        assert_eq!(path.push_back(tile(&grid, 0, 2)), Err(Rejection::ColumnGap));
        assert_eq!(path.len(), 1);
        Ok(())
    }

    #[test]
    fn test_drop_same_column() -> Result<()> {
        // "a" and "c" meet once "b" is gone
        let grid = Grid::from_strings(&["c", "b", "a"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 0)).unwrap();
        path.push_back(tile(&grid, 2, 0)).unwrap();
        assert_eq!(path.word(), "ac");
        assert_eq!(path.floor(1), Some(1));
        Ok(())
    }

    #[test]
    fn test_drop_next_column() -> Result<()> {
        let grid = Grid::from_strings(&[" e", " d", " c", "ab"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 0)).unwrap();
        // "d" falls next to "a" once a tile below it is gone
        path.push_back(tile(&grid, 2, 1)).unwrap();
        // "e" rides down with "d"
        path.push_back(tile(&grid, 3, 1)).unwrap();
        assert_eq!(path.word(), "ade");
        Ok(())
    }

    #[test]
    fn test_cascading_drops() -> Result<()> {
        // p(0,0) q(2,1) r(4,0): q drops to row 1, then r drops to row 2
        let grid = Grid::from_strings(&["r ", "xx", "xq", "xx", "px"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 0)).unwrap();
        path.push_back(tile(&grid, 2, 1)).unwrap();
        path.push_back(tile(&grid, 4, 0)).unwrap();
        assert_eq!(path.word(), "pqr");
        assert!(path.is_possible());
        Ok(())
    }

    #[test]
    fn test_tile_below_makes_room() -> Result<()> {
        // "c" drops next to "a", which pushes "b" down next to "d"
        let grid = Grid::from_strings(&[" c ", " b ", " x ", "axd"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 2)).unwrap();
        path.push_back(tile(&grid, 2, 1)).unwrap();
        path.push_back(tile(&grid, 3, 1)).unwrap();
        path.push_back(tile(&grid, 0, 0)).unwrap();
        assert_eq!(path.word(), "dbca");
        assert!(path.is_possible());
        Ok(())
    }

    #[test]
    fn test_tile_below_pushed_too_far() -> Result<()> {
        // "c" must drop next to "a", so "b" ends on the bottom row, out of
        // reach of "e" which sits on top of "f" and "g"
        let grid = Grid::from_strings(&[" c ", " be", " xg", "axf"])?;
        let mut path = Path::new();
        for &(row, col) in &[(0, 2), (1, 2), (2, 2), (2, 1), (3, 1)] {
            path.push_back(tile(&grid, row, col)).unwrap();
        }
        assert_eq!(path.word(), "fgebc");
        let before = path.clone();
        assert_eq!(
            path.push_back(tile(&grid, 0, 0)),
            Err(Rejection::Unsatisfiable)
        );
        assert_eq!(path, before);
        Ok(())
    }

    #[test]
    fn test_interrupted_column() -> Result<()> {
        let grid = Grid::from_strings(&["b ", "cn", "ax"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 0)).unwrap();
        path.push_back(tile(&grid, 2, 0)).unwrap();
        path.push_back(tile(&grid, 1, 1)).unwrap();
        // "c" would sit between "a" and "b", which must meet
        let before = path.clone();
        assert_eq!(
            path.push_back(tile(&grid, 1, 0)),
            Err(Rejection::InterruptedColumn)
        );
        assert_eq!(path, before);
        Ok(())
    }

    #[test]
    fn test_unsatisfiable() -> Result<()> {
        // "z" stays above "x" and "y", so it can never reach "w" on the bottom row
        let grid = Grid::from_strings(&[" z", " y", "wx"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 1)).unwrap();
        path.push_back(tile(&grid, 1, 1)).unwrap();
        path.push_back(tile(&grid, 2, 1)).unwrap();
        let before = path.clone();
        assert_eq!(
            path.push_back(tile(&grid, 0, 0)),
            Err(Rejection::Unsatisfiable)
        );
        assert_eq!(path, before);
        assert_eq!(path.word(), "xyz");
        Ok(())
    }

    #[test]
    fn test_pop_back_undoes_push() -> Result<()> {
        let grid = Grid::from_strings(&["aB"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 0)).unwrap();
        let before = path.clone();
        path.push_back(tile(&grid, 0, 1)).unwrap();
        assert_eq!(path.star_count(), 1);
        assert_eq!(path.pop_back(), Some(tile(&grid, 0, 1)));
        assert_eq!(path, before);
        assert_eq!(path.pop_back(), Some(tile(&grid, 0, 0)));
        assert_eq!(path.pop_back(), None);
        assert_eq!(path, Path::new());
        Ok(())
    }

    #[test]
    fn test_extend_scoped() -> Result<()> {
        let grid = Grid::from_strings(&["abc"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 0)).unwrap();
        {
            let mut ext = path.extend_scoped(tile(&grid, 0, 1)).unwrap();
            assert_eq!(ext.word(), "ab");
            {
                let inner = ext.extend_scoped(tile(&grid, 0, 2)).unwrap();
                assert_eq!(inner.word(), "abc");
            }
            assert_eq!(ext.word(), "ab");
            assert!(ext.extend_scoped(tile(&grid, 0, 0)).is_err());
            assert_eq!(ext.len(), 2);
        }
        assert_eq!(path.word(), "a");
        Ok(())
    }

    #[test]
    fn test_display() -> Result<()> {
        let grid = Grid::from_strings(&["Ab"])?;
        let mut path = Path::new();
        path.push_back(tile(&grid, 0, 0)).unwrap();
        path.push_back(tile(&grid, 0, 1)).unwrap();
        assert_eq!(path.to_string(), "ab [A@(0,0) b@(0,1)]");
        assert_eq!(Rejection::ColumnGap.to_string(), "column gap");
        Ok(())
    }
}
