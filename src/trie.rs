mod format;

use crate::labelset::LabelSet;
use crate::tiles::{codec, Label};
use crate::Error;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::read_to_string;

/// Index of the root node
pub const ROOT: usize = 0;

/// A node in the [`Trie`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrieNode {
    /// A word ends at this node
    word: bool,
    /// The number of words that pass through or end at this node
    count: u32,
    /// Letters of the child nodes
    labels: LabelSet,
    /// Child node indices, sorted by letter
    children: Vec<u32>,
}

impl TrieNode {
    pub fn is_word(&self) -> bool {
        self.word
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn labels(&self) -> LabelSet {
        self.labels
    }

    fn child(&self, label: Label) -> Option<usize> {
        self.labels
            .index_of(label)
            .map(|pos| self.children[pos] as usize)
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// A prefix tree that holds all the possible words.
///
/// Nodes live in an arena, the root is node [`ROOT`]. Each node knows how many
/// words are rooted at it, which makes prefix counting a walk down the tree.
pub struct Trie {
    nodes: Vec<TrieNode>,
    /// Path of the file used to build the trie.
    /// Empty if the trie is not read from a file.
    pub wordfile: String,
}

impl Default for Trie {
    fn default() -> Self {
        Trie::new()
    }
}

impl fmt::Display for Trie {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "<Trie: {} words, {} nodes from '{}'>",
            self.word_count(),
            self.node_count(),
            self.wordfile
        )
    }
}

impl Trie {
    /// Return an empty trie.
    pub fn new() -> Trie {
        Trie {
            nodes: vec![TrieNode::default()],
            wordfile: String::new(),
        }
    }

    /// Build a trie from a list of words.
    /// ## Errors
    /// If a word contains anything but `a`..`z`.
    /// ## Examples
    /// ```
    /// use wordfall_solver::{Error, Trie};
    /// let trie = Trie::from_words(&["tea", "ten", "to"])?;
    /// assert!(trie.contains("ten"));
    /// assert_eq!(trie.words_with_prefix("te"), 2);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Trie, Error> {
        let mut trie = Trie::new();
        for word in words {
            trie.insert(word.as_ref())?;
        }
        Ok(trie)
    }

    /// Read the trie from a word list. The file must have one word per line.
    /// Lines are trimmed and empty lines are skipped.
    /// ## Errors
    /// Fails if the file can not be read, or a word is not valid.
    pub fn from_file(wordfile: &str) -> Result<Trie, Error> {
        let text = read_to_string(wordfile).map_err(|source| Error::ReadError {
            path: String::from(wordfile),
            source,
        })?;
        let mut trie = Trie::new();
        for word in text.lines().map(str::trim).filter(|w| !w.is_empty()) {
            trie.insert(word)?;
        }
        trie.wordfile = String::from(wordfile);
        debug!("loaded {}", trie);
        Ok(trie)
    }

    #[cfg(all(feature = "serde", feature = "bincode"))]
    /// Deserialize the trie from a bincoded file.
    /// ## Errors
    /// - If the file can not be read.
    /// - If the contents can not be deserialized
    pub fn deserialize_from(wordfile: &str) -> Result<Trie, Error> {
        use std::fs::File;
        use std::io::BufReader;
        let file = File::open(wordfile).map_err(|source| Error::ReadError {
            path: String::from(wordfile),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut trie: Trie = bincode::deserialize_from(reader)
            .map_err(|_| Error::WordfileDeserializeError(String::from(wordfile)))?;
        trie.wordfile = String::from(wordfile);
        Ok(trie)
    }

    /// Insert `word`. Returns false if the word was already present.
    /// ## Errors
    /// If the word contains anything but `a`..`z`.
    pub fn insert(&mut self, word: &str) -> Result<bool, Error> {
        let labels = codec().encode_word(word)?;
        Ok(self.insert_labels(&labels))
    }

    /// Insert a word given as letter labels. Returns false if the word was already present.
    pub fn insert_labels(&mut self, labels: &[Label]) -> bool {
        if labels.is_empty() || self.find(labels).map_or(false, |i| self.nodes[i].word) {
            return false;
        }
        let mut i = ROOT;
        self.nodes[i].count += 1;
        for &label in labels {
            i = match self.nodes[i].child(label) {
                Some(child) => child,
                None => self.add_child(i, label),
            };
            self.nodes[i].count += 1;
        }
        self.nodes[i].word = true;
        true
    }

    /// Append a new empty node as child of `parent`, return its index.
    fn add_child(&mut self, parent: usize, label: Label) -> usize {
        let child = self.nodes.len();
        self.nodes.push(TrieNode::default());
        let node = &mut self.nodes[parent];
        let pos = node.labels.rank(label);
        node.labels.insert(label);
        node.children.insert(pos, child as u32);
        child
    }

    /// Return the node reached by following `labels` from the root.
    pub fn find(&self, labels: &[Label]) -> Option<usize> {
        labels
            .iter()
            .try_fold(ROOT, |i, &label| self.nodes[i].child(label))
    }

    fn find_prefix(&self, prefix: &str) -> Option<usize> {
        if prefix.is_empty() {
            return Some(ROOT);
        }
        let labels = codec().encode_word(prefix).ok()?;
        self.find(&labels)
    }

    /// Get the index of child with `label` for node `i` if present.
    pub fn child(&self, i: usize, label: Label) -> Option<usize> {
        self.nodes.get(i).and_then(|node| node.child(label))
    }

    /// Iterate over (label, child index) of node `i`, in alphabetical order.
    /// Empty if there is no node `i`.
    pub fn children(&self, i: usize) -> impl Iterator<Item = (Label, usize)> + '_ {
        self.nodes.get(i).into_iter().flat_map(|node| {
            node.labels
                .iter()
                .zip(node.children.iter().map(|&c| c as usize))
        })
    }

    /// Returns true if a word ends at node `i`.
    pub fn is_word(&self, i: usize) -> bool {
        self.nodes.get(i).map_or(false, TrieNode::is_word)
    }

    /// Get node `i`.
    pub fn node(&self, i: usize) -> Option<&TrieNode> {
        self.nodes.get(i)
    }

    /// Returns true if `word` is in the trie.
    pub fn contains(&self, word: &str) -> bool {
        !word.is_empty() && self.find_prefix(word).map_or(false, |i| self.nodes[i].word)
    }

    /// The number of words that start with `prefix`. The empty prefix counts all words.
    pub fn words_with_prefix(&self, prefix: &str) -> u32 {
        self.find_prefix(prefix).map_or(0, |i| self.nodes[i].count)
    }

    /// All words that start with `prefix`, in alphabetical order.
    pub fn all_words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut words = Vec::new();
        if let Some(i) = self.find_prefix(prefix) {
            let mut word = String::from(prefix);
            self.collect_words(i, &mut word, &mut words);
        }
        words
    }

    fn collect_words(&self, i: usize, word: &mut String, words: &mut Vec<String>) {
        if self.nodes[i].word {
            words.push(word.clone());
        }
        for (label, child) in self.children(i) {
            word.push(codec().decode_label(label));
            self.collect_words(child, word, words);
            word.pop();
        }
    }

    /// The number of words in the trie
    pub fn word_count(&self) -> usize {
        self.nodes[ROOT].count as usize
    }

    /// The number of nodes in the trie
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
