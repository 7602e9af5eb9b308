use crate::kmer::counter::Counter;
use crate::kmer::key::KeyBytes;

/// Bounded, count-descending list of the currently largest counters.
///
/// Maintained online as store entries change, so a final ranking of up to
/// `capacity` keys never needs a full store scan. Invariants, kept by every
/// [`observe`](TopList::observe):
///
/// * at most `capacity` entries, sorted by count descending;
/// * ties keep their existing order (new equal counts go after old ones);
/// * once full, any store key whose count strictly exceeds the tail count is
///   present in the list.
pub struct TopList<C: Counter> {
    capacity: usize,
    entries: Vec<(KeyBytes, C)>,
}

impl<C: Counter> TopList<C> {
    pub fn new(capacity: usize) -> Self {
        TopList {
            capacity,
            entries: Vec::with_capacity(capacity.min(1024)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[(KeyBytes, C)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(KeyBytes, C)> {
        self.entries
    }

    /// Record that `key` now has `count` in the store.
    ///
    /// The first observation always primes the list, however small its count;
    /// later observations can only displace entries with strictly larger
    /// counts, which keeps the invariant intact.
    pub fn observe(&mut self, key: &[u8], count: C) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.is_empty() {
            self.entries.push((KeyBytes::from_slice(key), count));
            return;
        }

        let tail = self.entries[self.entries.len() - 1].1;
        if !(count > tail || self.entries.len() < self.capacity) {
            return;
        }

        let insert_at = self
            .entries
            .iter()
            .position(|(_, c)| count > *c)
            .unwrap_or(self.entries.len());
        let previous = self.entries.iter().position(|(k, _)| k.as_slice() == key);

        self.entries.insert(insert_at, (KeyBytes::from_slice(key), count));
        if let Some(mut old) = previous {
            if old >= insert_at {
                old += 1;
            }
            self.entries.remove(old);
        }
        self.entries.truncate(self.capacity);
    }
}
