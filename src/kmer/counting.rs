use crate::kmer::aggregator::Aggregator;
use crate::kmer::codec;
use crate::kmer::counter::Counter;
use crate::kmer::error::KmerError;
use crate::kmer::key::MerKey;
use crate::kmer::store::CountStore;

/// The counting controller for one run: owns the aggregator, the store and
/// (through the store) the Top-N cache. Dropping it closes and removes the
/// temporary store file on every exit path.
pub struct MerCounter<K: MerKey, C: Counter, A: Aggregator<K, C>> {
    width: usize,
    aggregator: A,
    store: CountStore<C>,
    encoded: Vec<u8>,
    tokens: Vec<K>,
}

impl<K: MerKey, C: Counter, A: Aggregator<K, C>> MerCounter<K, C, A> {
    pub fn new(width: usize, store: CountStore<C>) -> Result<Self, KmerError> {
        Self::with_spill_threshold(width, store, A::default_spill_threshold())
    }

    pub fn with_spill_threshold(
        width: usize,
        store: CountStore<C>,
        spill_threshold: usize,
    ) -> Result<Self, KmerError> {
        if width == 0 {
            return Err(KmerError::InvalidArg("k-mer width must be at least 1".into()));
        }
        K::check_width(width)?;
        Ok(MerCounter {
            width,
            aggregator: A::with_spill_threshold(spill_threshold),
            store,
            encoded: Vec::new(),
            tokens: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The saturation value of the counter type in use.
    pub fn max_count(&self) -> C {
        C::max_value()
    }

    pub fn store(&self) -> &CountStore<C> {
        &self.store
    }

    /// Validate, encode and tokenize one sequence and feed the aggregator,
    /// which may spill into the store inline. Returns the number of windows
    /// the sequence produced.
    pub fn add_sequence(&mut self, text: &[u8]) -> Result<usize, KmerError> {
        codec::encode_into(text, &mut self.encoded)?;
        K::tokenize(&self.encoded, self.width, &mut self.tokens);
        self.aggregator.ingest(&self.tokens, &mut self.store)?;
        Ok(self.tokens.len())
    }

    /// Final flush, then the up-to-`total` highest-counted k-mers as decoded
    /// text, count descending with stable ties. Entries with counts at or
    /// below `min_filter` are dropped.
    pub fn top_mers(
        &mut self,
        total: usize,
        min_filter: C,
    ) -> Result<Vec<(String, C)>, KmerError> {
        self.aggregator.flush(&mut self.store)?;

        let candidates = self.store.top_keys(total, min_filter)?;
        let mut mers = Vec::with_capacity(candidates.len());
        for (raw, count) in candidates {
            let key = K::from_store_bytes(&raw);
            let window = key.to_window(self.width);
            mers.push((codec::decode(&window)?, count));
        }

        // Already near-sorted coming out of the cache; a stable pass keeps
        // tie order deterministic regardless of which path produced them.
        mers.sort_by(|a, b| b.1.cmp(&a.1));
        mers.truncate(total);
        Ok(mers)
    }
}
