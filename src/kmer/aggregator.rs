use crate::kmer::counter::Counter;
use crate::kmer::error::KmerError;
use crate::kmer::key::{KeyBytes, MerKey};
use crate::kmer::store::CountStore;
use fxhash::FxHashMap;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// In-memory pre-summation of counts, spilled into the store as additive
/// deltas so the disk never sees one write per token.
///
/// Strategies are interchangeable: the controller only calls `ingest`, which
/// is allowed to spill inline, and `flush` at the end of a run.
pub trait Aggregator<K: MerKey, C: Counter> {
    fn with_spill_threshold(spill_threshold: usize) -> Self;

    fn default_spill_threshold() -> usize;

    /// Absorb one sequence worth of tokens; may spill into `store`.
    fn ingest(&mut self, tokens: &[K], store: &mut CountStore<C>) -> Result<(), KmerError>;

    /// Move everything accumulated so far into `store`. A no-op when nothing
    /// has been ingested, for every strategy alike.
    fn flush(&mut self, store: &mut CountStore<C>) -> Result<(), KmerError>;
}

fn emit<K: MerKey, C: Counter>(
    key: &K,
    delta: C,
    buf: &mut KeyBytes,
    store: &mut CountStore<C>,
) -> Result<(), KmerError> {
    buf.clear();
    key.store_bytes(buf);
    store.merge_delta(buf, delta)
}

/// Buffer every token, then sort and run-length the buffer on spill.
///
/// Cheap per token (one append) at the cost of holding tokens rather than
/// distinct keys, so its threshold counts tokens. Each run's length saturates
/// at the counter maximum before it ever reaches the store.
pub struct SortAggregator<K: MerKey, C: Counter> {
    tokens: Vec<K>,
    spill_threshold: usize,
    _counter: PhantomData<C>,
}

impl<K: MerKey, C: Counter> Aggregator<K, C> for SortAggregator<K, C> {
    fn with_spill_threshold(spill_threshold: usize) -> Self {
        SortAggregator {
            tokens: Vec::with_capacity(spill_threshold.min(1 << 20)),
            spill_threshold,
            _counter: PhantomData,
        }
    }

    fn default_spill_threshold() -> usize {
        100_000
    }

    fn ingest(&mut self, tokens: &[K], store: &mut CountStore<C>) -> Result<(), KmerError> {
        self.tokens.extend_from_slice(tokens);
        if self.tokens.len() > self.spill_threshold {
            return self.flush(store);
        }
        Ok(())
    }

    fn flush(&mut self, store: &mut CountStore<C>) -> Result<(), KmerError> {
        if self.tokens.is_empty() {
            return Ok(());
        }
        self.tokens.sort_unstable();

        let mut key_buf = KeyBytes::new();
        let mut run_start = 0usize;
        let mut run = C::zero();
        for i in 0..self.tokens.len() {
            if self.tokens[i] != self.tokens[run_start] {
                emit(&self.tokens[run_start], run, &mut key_buf, store)?;
                run_start = i;
                run = C::zero();
            }
            run = run.saturating_add(C::one());
        }
        emit(&self.tokens[run_start], run, &mut key_buf, store)?;

        self.tokens.clear();
        Ok(())
    }
}

/// Ordered map of key → count; spills when the number of distinct keys
/// crosses the threshold.
pub struct MapAggregator<K: MerKey, C: Counter> {
    counts: BTreeMap<K, C>,
    spill_threshold: usize,
}

impl<K: MerKey, C: Counter> Aggregator<K, C> for MapAggregator<K, C> {
    fn with_spill_threshold(spill_threshold: usize) -> Self {
        MapAggregator {
            counts: BTreeMap::new(),
            spill_threshold,
        }
    }

    fn default_spill_threshold() -> usize {
        10_000_000
    }

    fn ingest(&mut self, tokens: &[K], store: &mut CountStore<C>) -> Result<(), KmerError> {
        for token in tokens {
            if let Some(count) = self.counts.get_mut(token) {
                *count = count.saturating_add(C::one());
            } else {
                self.counts.insert(token.clone(), C::one());
            }
        }
        if self.counts.len() > self.spill_threshold {
            return self.flush(store);
        }
        Ok(())
    }

    fn flush(&mut self, store: &mut CountStore<C>) -> Result<(), KmerError> {
        let mut key_buf = KeyBytes::new();
        for (key, count) in std::mem::take(&mut self.counts) {
            emit(&key, count, &mut key_buf, store)?;
        }
        Ok(())
    }
}

/// Hash map of key → count, same spill rule as [`MapAggregator`] but without
/// the ordering work per insert.
pub struct HashAggregator<K: MerKey, C: Counter> {
    counts: FxHashMap<K, C>,
    spill_threshold: usize,
}

impl<K: MerKey, C: Counter> Aggregator<K, C> for HashAggregator<K, C> {
    fn with_spill_threshold(spill_threshold: usize) -> Self {
        HashAggregator {
            counts: FxHashMap::default(),
            spill_threshold,
        }
    }

    fn default_spill_threshold() -> usize {
        10_000_000
    }

    fn ingest(&mut self, tokens: &[K], store: &mut CountStore<C>) -> Result<(), KmerError> {
        for token in tokens {
            if let Some(count) = self.counts.get_mut(token) {
                *count = count.saturating_add(C::one());
            } else {
                self.counts.insert(token.clone(), C::one());
            }
        }
        if self.counts.len() > self.spill_threshold {
            return self.flush(store);
        }
        Ok(())
    }

    fn flush(&mut self, store: &mut CountStore<C>) -> Result<(), KmerError> {
        let mut key_buf = KeyBytes::new();
        for (key, count) in std::mem::take(&mut self.counts) {
            emit(&key, count, &mut key_buf, store)?;
        }
        Ok(())
    }
}
