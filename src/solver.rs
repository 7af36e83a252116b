use crate::grid::Grid;
use crate::path::Path;
use crate::tiles::{Tile, TileId};
use crate::trie::{Trie, ROOT};
use crate::Error;
#[cfg(feature = "flame_it")]
use flamer::flame;
use log::{debug, trace};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A word that was played, with the points it scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Play {
    pub word: String,
    pub score: u32,
    pub path: Path,
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.word, self.score)
    }
}

/// All playable paths of a grid, grouped by score.
///
/// Within a score, paths are ordered by word and then by tile ids, which makes
/// the best play deterministic.
#[derive(Debug, Clone, Default)]
pub struct WordCache(BTreeMap<u32, BTreeMap<(String, Vec<TileId>), Path>>);

impl WordCache {
    pub fn insert(&mut self, score: u32, path: Path) {
        let key = (path.word(), path.ids().collect());
        self.0.entry(score).or_default().insert(key, path);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of paths in the cache
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    /// The first path, best first, that is accepted by `accept`.
    pub fn best<F>(&self, mut accept: F) -> Option<(u32, &Path)>
    where
        F: FnMut(&Path) -> bool,
    {
        self.iter().find(|(_, path)| accept(*path))
    }

    /// Iterate over (score, path), best first.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Path)> {
        self.0
            .iter()
            .rev()
            .flat_map(|(&score, paths)| paths.values().map(move |path| (score, path)))
    }
}

/// Limit on the number of search nodes for one fill of the word cache.
#[derive(Debug)]
struct Budget {
    limit: Option<usize>,
    visited: usize,
}

impl Budget {
    fn spend(&mut self) -> bool {
        if self.limit.map_or(false, |limit| self.visited >= limit) {
            return false;
        }
        self.visited += 1;
        true
    }

    fn is_exhausted(&self) -> bool {
        self.limit.map_or(false, |limit| self.visited >= limit)
    }
}

/// Finds the words on a [`Grid`] and plays them greedily.
///
/// ## Examples
/// ```
/// use wordfall_solver::{Error, Grid, Solver, Trie};
/// let trie = Trie::from_words(&["tin", "tins", "nit"])?;
/// let grid = Grid::from_strings(&["  n", "tis"])?;
/// let mut solver = Solver::new(&trie, grid);
/// let words: Vec<_> = solver.playable_words().into_iter().map(|(w, _)| w).collect();
/// assert_eq!(words, vec!["tins", "nit", "tin"]);
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Solver<'a> {
    trie: &'a Trie,
    start: Grid,
    grid: Grid,
    cache: WordCache,
    solution: Vec<Play>,
    score: u32,
    node_limit: Option<usize>,
    lookahead: bool,
}

impl<'a> Solver<'a> {
    pub fn new(trie: &'a Trie, grid: Grid) -> Solver<'a> {
        Solver {
            trie,
            start: grid.clone(),
            grid,
            cache: WordCache::default(),
            solution: Vec::new(),
            score: 0,
            node_limit: None,
            lookahead: false,
        }
    }

    /// Stop each search for words after visiting `limit` search nodes.
    pub fn with_node_limit(mut self, limit: usize) -> Solver<'a> {
        self.node_limit = Some(limit);
        self
    }

    /// Also consider tiles that are not adjacent yet, but may become adjacent
    /// when the tiles under them are removed. Such words show up in the word
    /// cache and in [`playable_words`](Solver::playable_words), but are only
    /// played once all their tiles touch.
    pub fn with_lookahead(mut self, lookahead: bool) -> Solver<'a> {
        self.lookahead = lookahead;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The grid the solver started with
    pub fn start_grid(&self) -> &Grid {
        &self.start
    }

    pub fn word_cache(&self) -> &WordCache {
        &self.cache
    }

    /// The words played so far, in order.
    pub fn solution(&self) -> &[Play] {
        &self.solution
    }

    /// The sum of the scores of the words played so far.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// The score of the words played so far, plus the end of game bonuses.
    pub fn final_score(&self) -> u32 {
        self.score + self.grid.score_bonuses()
    }

    /// Find all words on the current grid. Does nothing if the cache is already filled.
    #[cfg_attr(feature = "flame_it", flame)]
    pub fn fill_word_cache(&mut self) {
        if !self.cache.is_empty() {
            return;
        }
        let mut cache = WordCache::default();
        let mut budget = Budget {
            limit: self.node_limit,
            visited: 0,
        };
        let mut path = Path::new();
        for (label, node) in self.trie.children(ROOT) {
            for id in self.grid.tiles_with_letter(label) {
                let tile = match self.grid.tile(id) {
                    Some(&tile) => tile,
                    None => continue,
                };
                if let Ok(mut first) = path.extend_scoped(tile) {
                    self.search(&mut first, node, &mut cache, &mut budget);
                }
            }
        }
        if budget.is_exhausted() {
            trace!("search stopped after {} nodes", budget.visited);
        }
        debug!(
            "found {} paths in {} nodes on {} tiles",
            cache.len(),
            budget.visited,
            self.grid.len()
        );
        self.cache = cache;
    }

    /// Depth first search of the grid in lock-step with the trie. `node` is the
    /// trie node for the letters of `path`.
    fn search(&self, path: &mut Path, node: usize, cache: &mut WordCache, budget: &mut Budget) {
        if !budget.spend() {
            return;
        }
        if self.trie.is_word(node) {
            cache.insert(self.grid.score_path(path), path.clone());
        }
        let candidates: Vec<TileId> = if self.lookahead {
            self.grid.reachable_next_tiles(path)
        } else {
            self.grid.possible_next_tiles(path).into_iter().collect()
        };
        for id in candidates {
            let tile: Tile = match self.grid.tile(id) {
                Some(&tile) => tile,
                None => continue,
            };
            let child = match self.trie.child(node, tile.letter().label()) {
                Some(child) => child,
                None => continue,
            };
            let mut next = match path.extend_scoped(tile) {
                Ok(next) => next,
                Err(rejection) => {
                    trace!("{} rejected: {}", tile, rejection);
                    continue;
                }
            };
            self.search(&mut next, child, cache, budget);
        }
    }

    /// All distinct playable words with their best score, best first.
    pub fn playable_words(&mut self) -> Vec<(String, u32)> {
        self.fill_word_cache();
        let mut seen = HashSet::new();
        self.cache
            .iter()
            .filter(|(_, path)| seen.insert(path.word()))
            .map(|(score, path)| (path.word(), score))
            .collect()
    }

    /// The best play on the current grid: highest score, then smallest word,
    /// then smallest tile ids. Only words whose tiles touch now are considered.
    pub fn best_word(&mut self) -> Option<(u32, Path)> {
        self.fill_word_cache();
        let grid = &self.grid;
        self.cache
            .best(|path| grid.is_connected(path))
            .map(|(score, path)| (score, path.clone()))
    }

    /// Play `path`: score it, clear its tiles, and add it to the solution.
    /// The word cache is emptied.
    /// ## Errors
    /// - [`StaleTile`](Error::StaleTile) if a tile of `path` is no longer on the grid.
    /// - [`DisconnectedPath`](Error::DisconnectedPath) if two consecutive tiles don't touch.
    pub fn play_word(&mut self, path: &Path) -> Result<u32, Error> {
        for id in path.ids() {
            self.grid.tile(id).ok_or(Error::StaleTile(id))?;
        }
        if !self.grid.is_connected(path) {
            return Err(Error::DisconnectedPath(path.to_string()));
        }
        let score = self.grid.score_path(path);
        let removed = self.grid.clear_path(path)?;
        debug_assert!(self.grid.check_invariants().is_ok());
        debug!(
            "play {} for {} points, {} tiles removed, {} left",
            path,
            score,
            removed.len(),
            self.grid.len()
        );
        self.solution.push(Play {
            word: path.word(),
            score,
            path: path.clone(),
        });
        self.score += score;
        self.cache.clear();
        Ok(score)
    }

    /// Keep playing the best word until no playable word is left.
    /// Returns the final score, including the end of game bonuses.
    /// ## Errors
    /// If the grid turns out to be inconsistent.
    pub fn solve_greedily(&mut self) -> Result<u32, Error> {
        while let Some((_, path)) = self.best_word() {
            self.play_word(&path)?;
        }
        let score = self.final_score();
        debug!(
            "solved with {} words, {} tiles left, score {}",
            self.solution.len(),
            self.grid.len(),
            score
        );
        Ok(score)
    }

    /// Go back to the start grid and forget the solution.
    pub fn reset(&mut self) {
        self.grid = self.start.clone();
        self.cache.clear();
        self.solution.clear();
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Result<T> = std::result::Result<T, Error>;

    const WORDS: &[&str] = &[
        "a", "at", "act", "ant", "cat", "can", "cot", "con", "no", "not", "on", "tan", "to",
        "ton", "tonic",
    ];

    const TEST_GRID: &[&str] = &[
        " o  ", //
        "tnc ", //
        "Acat", //
    ];

    #[test]
    fn test_single_word() -> Result<()> {
        let trie = Trie::from_words(&["cat", "at"])?;
        let mut solver = Solver::new(&trie, Grid::from_strings(&["cat"])?);
        assert_eq!(solver.playable_words(), vec![("cat".to_string(), 15), ("at".to_string(), 4)]);
        assert_eq!(solver.solve_greedily()?, 15 + 2000);
        assert_eq!(solver.score(), 15);
        let words: Vec<&str> = solver.solution().iter().map(|p| p.word.as_str()).collect();
        assert_eq!(words, vec!["cat"]);
        assert!(solver.grid().is_empty());
        Ok(())
    }

    #[test]
    fn test_best_word_tie_break() -> Result<()> {
        let trie = Trie::from_words(&["ab"])?;
        let mut solver = Solver::new(&trie, Grid::from_strings(&["ab", "ba"])?);
        assert_eq!(solver.word_cache().len(), 0);
        let (score, path) = solver.best_word().unwrap();
        assert_eq!(solver.word_cache().len(), 4);
        assert_eq!(score, 8);
        let positions: Vec<_> = path.tiles().iter().map(Tile::pos).collect();
        assert_eq!(positions, vec![(1, 0), (0, 0)]);
        Ok(())
    }

    #[test]
    fn test_paths_are_words() -> Result<()> {
        let trie = Trie::from_words(WORDS)?;
        let mut solver = Solver::new(&trie, Grid::from_strings(TEST_GRID)?);
        solver.fill_word_cache();
        assert!(!solver.word_cache().is_empty());
        for (score, path) in solver.word_cache().iter() {
            assert!(trie.contains(&path.word()), "{}", path);
            assert_eq!(score, solver.grid().score_path(path));
            for pair in path.tiles().windows(2) {
                assert!(pair[0].is_moore_adjacent(&pair[1]), "{}", path);
            }
        }
        let words: Vec<_> = solver.playable_words().into_iter().map(|(w, _)| w).collect();
        assert!(words.contains(&"ton".to_string()));
        assert!(words.contains(&"can".to_string()));
        assert!(!words.contains(&"tonic".to_string()));
        Ok(())
    }

    #[test]
    fn test_cache_is_refreshed_after_play() -> Result<()> {
        let trie = Trie::from_words(WORDS)?;
        let mut solver = Solver::new(&trie, Grid::from_strings(TEST_GRID)?);
        let (score, path) = solver.best_word().unwrap();
        assert_eq!(solver.play_word(&path)?, score);
        assert!(solver.word_cache().is_empty());
        solver.fill_word_cache();
        for (_, path) in solver.word_cache().iter() {
            for id in path.ids() {
                assert!(solver.grid().tile(id).is_some(), "{} uses a removed tile", path);
            }
        }
        solver.grid().check_invariants()?;
        Ok(())
    }

    #[test]
    fn test_play_stale_path() -> Result<()> {
        let trie = Trie::from_words(WORDS)?;
        let mut solver = Solver::new(&trie, Grid::from_strings(TEST_GRID)?);
        let (_, path) = solver.best_word().unwrap();
        solver.play_word(&path)?;
        let before = solver.grid().to_strings();
        assert!(matches!(solver.play_word(&path), Err(Error::StaleTile(_))));
        assert_eq!(solver.grid().to_strings(), before);
        assert_eq!(solver.solution().len(), 1);
        Ok(())
    }

    #[test]
    fn test_solve_greedily() -> Result<()> {
        let trie = Trie::from_words(WORDS)?;
        let mut solver = Solver::new(&trie, Grid::from_strings(TEST_GRID)?);
        let total = solver.solve_greedily()?;
        assert!(!solver.solution().is_empty());
        let played: u32 = solver.solution().iter().map(|play| play.score).sum();
        assert_eq!(played, solver.score());
        assert_eq!(total, solver.score() + solver.grid().score_bonuses());
        assert!(solver.playable_words().is_empty());
        solver.grid().check_invariants()?;
        Ok(())
    }

    #[test]
    fn test_greedy_is_deterministic() -> Result<()> {
        let trie = Trie::from_words(WORDS)?;
        let grid = Grid::random(5, 4, 11);
        let mut first = Solver::new(&trie, grid.clone());
        let mut second = Solver::new(&trie, grid);
        assert_eq!(first.solve_greedily()?, second.solve_greedily()?);
        assert_eq!(first.solution(), second.solution());
        Ok(())
    }

    #[test]
    fn test_reset() -> Result<()> {
        let trie = Trie::from_words(WORDS)?;
        let mut solver = Solver::new(&trie, Grid::from_strings(TEST_GRID)?);
        let total = solver.solve_greedily()?;
        solver.reset();
        assert_eq!(solver.grid().to_strings(), TEST_GRID);
        assert_eq!(solver.score(), 0);
        assert!(solver.solution().is_empty());
        assert!(solver.word_cache().is_empty());
        assert_eq!(solver.solve_greedily()?, total);
        Ok(())
    }

    #[test]
    fn test_node_limit() -> Result<()> {
        let trie = Trie::from_words(WORDS)?;
        let grid = Grid::from_strings(TEST_GRID)?;
        let mut solver = Solver::new(&trie, grid.clone()).with_node_limit(0);
        assert!(solver.playable_words().is_empty());
        let mut limited = Solver::new(&trie, grid.clone()).with_node_limit(3);
        let mut full = Solver::new(&trie, grid);
        assert!(limited.playable_words().len() < full.playable_words().len());
        Ok(())
    }

    #[test]
    fn test_lookahead() -> Result<()> {
        let trie = Trie::from_words(&["ca"])?;
        let grid = Grid::from_strings(&["c ", "x ", "xa"])?;
        let mut solver = Solver::new(&trie, grid.clone());
        assert!(solver.playable_words().is_empty());
        let mut solver = Solver::new(&trie, grid).with_lookahead(true);
        assert_eq!(solver.playable_words(), vec![("ca".to_string(), 8)]);
        // "c" and "a" don't touch yet, so "ca" can't be played
        assert_eq!(solver.best_word(), None);
        let (_, path) = solver.word_cache().iter().next().unwrap();
        let path = path.clone();
        assert!(matches!(
            solver.play_word(&path),
            Err(Error::DisconnectedPath(_))
        ));
        assert_eq!(solver.solve_greedily()?, 0);
        assert!(solver.solution().is_empty());
        assert_eq!(solver.grid().len(), 4);
        Ok(())
    }

    #[test]
    fn test_lookahead_plays_connected_words() -> Result<()> {
        let trie = Trie::from_words(&["ca", "ee"])?;
        let grid = Grid::from_strings(&["c ", "e ", "ea"])?;
        let mut solver = Solver::new(&trie, grid).with_lookahead(true);
        // "ca" scores more, but "c" only reaches "a" after "ee" is played
        assert_eq!(solver.solve_greedily()?, 4 + 8 + 2000);
        let words: Vec<&str> = solver.solution().iter().map(|p| p.word.as_str()).collect();
        assert_eq!(words, vec!["ee", "ca"]);
        for play in solver.solution() {
            for pair in play.path.tiles().windows(2) {
                assert!(pair[0].is_moore_adjacent(&pair[1]), "{}", play.path);
            }
        }
        Ok(())
    }

    #[test]
    fn test_empty_grid() -> Result<()> {
        let trie = Trie::from_words(WORDS)?;
        let mut solver = Solver::new(&trie, Grid::from_strings(&["   "])?);
        assert_eq!(solver.best_word(), None);
        assert_eq!(solver.solve_greedily()?, 2000);
        Ok(())
    }
}
