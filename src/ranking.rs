//! Bounded top-K ranking set
//!
//! [`BoundedRankingSet`] keeps at most `capacity` entries ordered by a
//! [`ComparatorType`]. Inserting past capacity evicts the entry that ranks
//! last, so the set always holds the best `capacity` entries seen so far.
//! Insertion is O(log K).

use crate::comparator::ComparatorType;
use crate::entry::RankedEntry;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Set element ordering entries by the comparator shared across the set
#[derive(Debug, Clone, Copy)]
struct RankSlot {
    entry: RankedEntry,
    comparator: ComparatorType,
}

impl PartialEq for RankSlot {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankSlot {}

impl PartialOrd for RankSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparator.compare(&self.entry, &other.entry)
    }
}

/// Fixed-capacity ordered container retaining the best entries
#[derive(Debug, Clone)]
pub struct BoundedRankingSet {
    slots: BTreeSet<RankSlot>,
    comparator: ComparatorType,
    capacity: usize,
}

impl BoundedRankingSet {
    /// Create an empty set holding at most `capacity` entries
    pub fn new(comparator: ComparatorType, capacity: usize) -> Self {
        Self {
            slots: BTreeSet::new(),
            comparator,
            capacity,
        }
    }

    /// Insert an entry, evicting the worst entry when over capacity
    ///
    /// Returns `true` if the inserted entry is still in the set afterwards.
    /// An entry comparing equal to one already present (same term, count and
    /// sequence) is not added twice.
    pub fn insert(&mut self, entry: RankedEntry) -> bool {
        if self.capacity == 0 {
            return false;
        }

        let slot = RankSlot {
            entry,
            comparator: self.comparator,
        };

        // Full set: a candidate ranking at or after the current worst can never survive
        if self.slots.len() >= self.capacity {
            if let Some(worst) = self.slots.last() {
                if slot >= *worst {
                    return false;
                }
            }
        }

        if !self.slots.insert(slot) {
            return false;
        }

        if self.slots.len() > self.capacity {
            self.slots.pop_last();
        }
        true
    }

    /// Iterate entries in comparator order without consuming the set
    pub fn iter(&self) -> impl Iterator<Item = &RankedEntry> + '_ {
        self.slots.iter().map(|slot| &slot.entry)
    }

    /// Entry currently ranked last
    pub fn worst(&self) -> Option<&RankedEntry> {
        self.slots.last().map(|slot| &slot.entry)
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the set holds no entries
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of entries retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Comparator ordering the set
    pub fn comparator(&self) -> ComparatorType {
        self.comparator
    }

    /// Consume the set into a vector in comparator order
    pub fn into_sorted_vec(self) -> Vec<RankedEntry> {
        self.slots.into_iter().map(|slot| slot.entry).collect()
    }
}

impl Extend<RankedEntry> for BoundedRankingSet {
    fn extend<I: IntoIterator<Item = RankedEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}
