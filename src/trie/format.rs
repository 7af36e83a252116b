//! Compact textual serialization of a [`Trie`].
//!
//! A node is written as `[count]['!'][letter node]*']'`: the decimal count of
//! words rooted at the node (omitted when zero), `!` when a word ends here, each
//! child as its letter followed by its own encoding in alphabetical order, and a
//! closing `]`.
use super::{Trie, TrieNode, ROOT};
use crate::tiles::codec;
use crate::Error;
use log::debug;
use std::fmt::Write;
use std::fs;

impl Trie {
    /// Serialize the trie to its textual form.
    /// ## Examples
    /// ```
    /// use wordfall_solver::{Error, Trie};
    /// let trie = Trie::from_words(&["a", "ab"])?;
    /// assert_eq!(trie.to_serialized(), "2a2!b1!]]]");
    /// # Ok::<(), Error>(())
    /// ```
    pub fn to_serialized(&self) -> String {
        let mut out = String::with_capacity(self.node_count() * 3);
        self.write_node(ROOT, &mut out);
        out
    }

    fn write_node(&self, i: usize, out: &mut String) {
        let node = &self.nodes[i];
        if node.count > 0 {
            // writing to a String can't fail
            let _ = write!(out, "{}", node.count);
        }
        if node.word {
            out.push('!');
        }
        for (label, child) in self.children(i) {
            out.push(codec().decode_label(label));
            self.write_node(child, out);
        }
        out.push(']');
    }

    /// Parse a trie from its textual form. Whitespace after the closing `]` of
    /// the root is ignored.
    /// ## Errors
    /// [`TrieParseError`](Error::TrieParseError) with the byte offset of the problem.
    pub fn from_serialized(text: &str) -> Result<Trie, Error> {
        let mut trie = Trie::new();
        let mut stack = vec![ROOT];
        let err = |pos, reason| Error::TrieParseError { pos, reason };

        for (pos, byte) in text.bytes().enumerate() {
            let current = match stack.last() {
                Some(&i) => i,
                None if byte.is_ascii_whitespace() => continue,
                None => return Err(err(pos, "data after the root node")),
            };
            match byte {
                b'a'..=b'z' => {
                    let label = byte - b'a' + 1;
                    if trie.nodes[current].labels.contains(label) {
                        return Err(err(pos, "duplicate child"));
                    }
                    let child = trie.add_child(current, label);
                    stack.push(child);
                }
                b'0'..=b'9' => {
                    let node: &mut TrieNode = &mut trie.nodes[current];
                    node.count = node
                        .count
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(u32::from(byte - b'0')))
                        .ok_or_else(|| err(pos, "count overflow"))?;
                }
                b'!' => trie.nodes[current].word = true,
                b']' => {
                    stack.pop();
                }
                _ => return Err(err(pos, "unexpected character")),
            }
        }
        if !stack.is_empty() {
            return Err(err(text.len(), "unterminated node"));
        }
        Ok(trie)
    }

    /// Read a serialized trie from `path`.
    /// ## Errors
    /// If the file can not be read or parsed.
    pub fn from_serialized_file(path: &str) -> Result<Trie, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::ReadError {
            path: String::from(path),
            source,
        })?;
        let mut trie = Trie::from_serialized(&text)?;
        trie.wordfile = String::from(path);
        debug!("loaded {}", trie);
        Ok(trie)
    }

    /// Write the serialized trie to `path`.
    /// ## Errors
    /// If the file can not be written.
    pub fn write_serialized_to(&self, path: &str) -> Result<(), Error> {
        fs::write(path, self.to_serialized()).map_err(|source| Error::WriteError {
            path: String::from(path),
            source,
        })
    }
}
