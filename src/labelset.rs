#[cfg(feature = "bitintr")]
use bitintr::{Bzhi, Popcnt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FromIterator;

use crate::tiles::{codec, Label};

#[cfg(feature = "bitintr")]
#[inline(always)]
fn count_ones(n: u32) -> u32 {
    n.popcnt()
}

#[cfg(not(feature = "bitintr"))]
#[inline(always)]
fn count_ones(n: u32) -> u32 {
    n.count_ones()
}

#[cfg(feature = "bitintr")]
#[inline(always)]
fn zero_highbits(n: u32, v: u32) -> u32 {
    n.bzhi(v)
}

#[cfg(not(feature = "bitintr"))]
#[inline(always)]
fn zero_highbits(n: u32, v: u32) -> u32 {
    n & ((1 << v) - 1)
}

/// A bitset of letter labels, used for the child letters of a trie node.
///
/// [`index_of`](LabelSet::index_of) gives the rank of a label in the set, which is
/// the position of the matching child in the node's sorted child list.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelSet(u32);

impl LabelSet {
    pub fn new() -> LabelSet {
        LabelSet(0)
    }

    pub fn contains(&self, label: Label) -> bool {
        label < 32 && self.0 & (1 << label) != 0
    }

    /// Insert `label`, returns true if it was already present.
    pub fn insert(&mut self, label: Label) -> bool {
        assert!(label < 32);
        let present = self.contains(label);
        self.0 |= 1 << label;
        present
    }

    pub fn len(&self) -> usize {
        count_ones(self.0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the labels in ascending order.
    pub fn iter(&self) -> IteratorLabelSet {
        IteratorLabelSet(self.0)
    }

    /// Return the rank of `label` in the set, if present.
    pub fn index_of(&self, label: Label) -> Option<usize> {
        if !self.contains(label) {
            return None;
        }
        Some(self.rank(label))
    }

    /// Number of labels in the set that are smaller than `label`.
    pub fn rank(&self, label: Label) -> usize {
        count_ones(zero_highbits(self.0, u32::from(label))) as usize
    }
}

impl fmt::Debug for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s: String = self.iter().map(|label| codec().decode_label(label)).collect();
        write!(f, "{{{}}}", s)
    }
}

pub struct IteratorLabelSet(u32);

impl Iterator for IteratorLabelSet {
    type Item = Label;
    fn next(&mut self) -> Option<Label> {
        if self.0 == 0 {
            return None;
        }
        let label = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(label as Label)
    }
}

impl FromIterator<Label> for LabelSet {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}
