use crate::kmer::counter::Counter;
use crate::kmer::error::KmerError;
use crate::kmer::key::KeyBytes;
use crate::kmer::top::TopList;
use fxhash::FxHasher;
use std::fs::File;
use std::hash::Hasher;
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::Path;
use tempfile::{Builder, TempPath};

const MAGIC: &[u8; 8] = b"KMRIDX01";
const HEADER_LEN: u64 = 16;
const RECORD_HEADER_LEN: usize = 12; // next offset (u64) + key length (u32)

/// Tuning knobs for a [`CountStore`].
///
/// `buckets` sizes the on-disk hash directory; `cache_bytes` is the RAM
/// budget for keeping that directory in memory. When the directory fits the
/// budget every chain-head access is a memory access, otherwise heads are
/// read and written through the file.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub buckets: u64,
    pub cache_bytes: usize,
    pub top_capacity: usize,
}

impl StoreConfig {
    /// Settings sized for workloads around a billion distinct keys.
    pub fn tuned() -> Self {
        StoreConfig {
            buckets: 50_000_000,
            cache_bytes: 1 << 30,
            top_capacity: 100,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            buckets: 1 << 22,
            cache_bytes: 64 << 20,
            top_capacity: 100,
        }
    }
}

/// Disk-backed hash index from opaque byte keys to fixed-width counters.
///
/// Layout: a header, a sparse directory of `buckets` chain-head offsets, then
/// appended records of the form `[next: u64][klen: u32][key][counter]`.
/// Inserts prepend to their bucket's chain; counter updates overwrite in
/// place. Offset zero marks an empty chain (no record can start inside the
/// header).
///
/// The backing file gets a unique temporary path, is created exclusively, and
/// is removed when the store is dropped. Every update also feeds the online
/// [`TopList`] so the final ranking can usually skip a full scan.
pub struct CountStore<C: Counter> {
    file: File,
    path: TempPath,
    buckets: u64,
    dir_cache: Option<Vec<u64>>,
    records_start: u64,
    append_at: u64,
    entries: u64,
    top: TopList<C>,
    scratch: Vec<u8>,
}

impl<C: Counter> CountStore<C> {
    pub fn open(config: StoreConfig) -> Result<Self, KmerError> {
        let buckets = config.buckets.max(1);
        let named = Builder::new()
            .prefix("kmercount-store-")
            .suffix(".idx")
            .tempfile()?;
        let (mut file, path) = named.into_parts();

        let records_start = HEADER_LEN + buckets * 8;
        // The directory region stays a hole until a head is written.
        file.set_len(records_start)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(MAGIC)?;
        file.write_all(&buckets.to_le_bytes())?;

        let dir_cache = if buckets
            .checked_mul(8)
            .map_or(false, |bytes| bytes <= config.cache_bytes as u64)
        {
            Some(vec![0u64; buckets as usize])
        } else {
            None
        };

        Ok(CountStore {
            file,
            path,
            buckets,
            dir_cache,
            records_start,
            append_at: records_start,
            entries: 0,
            top: TopList::new(config.top_capacity),
            scratch: Vec::new(),
        })
    }

    /// Path of the backing file; gone after drop.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct keys currently stored.
    pub fn len(&self) -> u64 {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// The online Top-N cache fed by every update.
    pub fn top(&self) -> &TopList<C> {
        &self.top
    }

    pub fn has(&mut self, key: &[u8]) -> Result<bool, KmerError> {
        Ok(self.find(key)?.is_some())
    }

    pub fn get(&mut self, key: &[u8]) -> Result<Option<C>, KmerError> {
        Ok(self.find(key)?.map(|(_, value)| value))
    }

    /// Unconditional write: overwrite the key's counter, inserting the key if
    /// it is absent.
    pub fn put(&mut self, key: &[u8], value: C) -> Result<(), KmerError> {
        match self.find(key)? {
            Some((counter_at, _)) => self.write_counter(counter_at, value),
            None => self.append(key, value),
        }
    }

    /// Insert only if absent. Returns whether the key was inserted.
    pub fn add(&mut self, key: &[u8], value: C) -> Result<bool, KmerError> {
        if self.has(key)? {
            return Ok(false);
        }
        self.append(key, value)?;
        Ok(true)
    }

    /// Fold one aggregated delta into the store: insert the key with `delta`,
    /// or saturating-add onto the current value. The Top-N cache observes the
    /// resulting count either way.
    pub fn merge_delta(&mut self, key: &[u8], delta: C) -> Result<(), KmerError> {
        match self.find(key)? {
            None => {
                self.append(key, delta)?;
                self.top.observe(key, delta);
            }
            Some((counter_at, current)) => {
                let merged = current.saturating_add(delta);
                self.write_counter(counter_at, merged)?;
                self.top.observe(key, merged);
            }
        }
        Ok(())
    }

    /// One pass over every entry, in unspecified order.
    pub fn cursor(&self) -> Result<StoreCursor<C>, KmerError> {
        let mut reader = BufReader::new(self.file.try_clone()?);
        reader.seek(SeekFrom::Start(self.records_start))?;
        Ok(StoreCursor {
            reader,
            pos: self.records_start,
            end: self.append_at,
            _counter: PhantomData,
        })
    }

    /// The `total` highest-counted entries, count descending.
    ///
    /// Served straight from the online cache when it is deep enough,
    /// otherwise by scanning every entry into a fresh bounded list. Entries
    /// with counts at or below `min_filter` are excluded.
    pub fn top_keys(
        &mut self,
        total: usize,
        min_filter: C,
    ) -> Result<Vec<(KeyBytes, C)>, KmerError> {
        if total <= self.top.len() {
            return Ok(self.top.entries()[..total]
                .iter()
                .filter(|(_, count)| *count > min_filter)
                .cloned()
                .collect());
        }

        let mut best = TopList::new(total);
        for entry in self.cursor()? {
            let (key, count) = entry?;
            best.observe(&key, count);
        }
        Ok(best
            .into_entries()
            .into_iter()
            .filter(|(_, count)| *count > min_filter)
            .collect())
    }

    fn bucket_of(&self, key: &[u8]) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write(key);
        hasher.finish() % self.buckets
    }

    fn read_head(&mut self, bucket: u64) -> Result<u64, KmerError> {
        if let Some(cache) = &self.dir_cache {
            return Ok(cache[bucket as usize]);
        }
        let mut buf = [0u8; 8];
        self.file.seek(SeekFrom::Start(HEADER_LEN + bucket * 8))?;
        self.file.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn write_head(&mut self, bucket: u64, head: u64) -> Result<(), KmerError> {
        if let Some(cache) = &mut self.dir_cache {
            cache[bucket as usize] = head;
            return Ok(());
        }
        self.file.seek(SeekFrom::Start(HEADER_LEN + bucket * 8))?;
        self.file.write_all(&head.to_le_bytes())?;
        Ok(())
    }

    /// Walk the key's bucket chain. Returns the file offset of the counter
    /// and its current value when the key is present.
    fn find(&mut self, key: &[u8]) -> Result<Option<(u64, C)>, KmerError> {
        let bucket = self.bucket_of(key);
        let mut offset = self.read_head(bucket)?;
        let mut header = [0u8; RECORD_HEADER_LEN];
        let mut key_buf = KeyBytes::new();
        while offset != 0 {
            self.file.seek(SeekFrom::Start(offset))?;
            self.file.read_exact(&mut header)?;
            let next = read_u64(&header[..8]);
            let klen = read_u32(&header[8..12]) as usize;
            if klen == key.len() {
                key_buf.resize(klen, 0);
                self.file.read_exact(&mut key_buf)?;
                if key_buf.as_slice() == key {
                    let mut counter_buf = [0u8; 8];
                    self.file.read_exact(&mut counter_buf[..C::WIDTH])?;
                    let counter_at = offset + RECORD_HEADER_LEN as u64 + klen as u64;
                    return Ok(Some((counter_at, C::read_le(&counter_buf[..C::WIDTH]))));
                }
            }
            offset = next;
        }
        Ok(None)
    }

    /// Append a new record at the tail and make it the head of its chain.
    fn append(&mut self, key: &[u8], value: C) -> Result<(), KmerError> {
        let bucket = self.bucket_of(key);
        let head = self.read_head(bucket)?;

        self.scratch.clear();
        self.scratch.extend_from_slice(&head.to_le_bytes());
        self.scratch.extend_from_slice(&(key.len() as u32).to_le_bytes());
        self.scratch.extend_from_slice(key);
        value.write_le(&mut self.scratch);

        let offset = self.append_at;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&self.scratch)?;
        self.append_at += self.scratch.len() as u64;
        self.write_head(bucket, offset)?;
        self.entries += 1;
        Ok(())
    }

    fn write_counter(&mut self, counter_at: u64, value: C) -> Result<(), KmerError> {
        self.scratch.clear();
        value.write_le(&mut self.scratch);
        self.file.seek(SeekFrom::Start(counter_at))?;
        self.file.write_all(&self.scratch)?;
        Ok(())
    }
}

/// Sequential scan over a store's record region.
pub struct StoreCursor<C: Counter> {
    reader: BufReader<File>,
    pos: u64,
    end: u64,
    _counter: PhantomData<C>,
}

impl<C: Counter> StoreCursor<C> {
    fn read_entry(&mut self) -> Result<(KeyBytes, C), KmerError> {
        let mut header = [0u8; RECORD_HEADER_LEN];
        self.reader.read_exact(&mut header)?;
        let klen = read_u32(&header[8..12]) as usize;

        let mut key = KeyBytes::new();
        key.resize(klen, 0);
        self.reader.read_exact(&mut key)?;

        let mut counter_buf = [0u8; 8];
        self.reader.read_exact(&mut counter_buf[..C::WIDTH])?;

        self.pos += (RECORD_HEADER_LEN + klen + C::WIDTH) as u64;
        Ok((key, C::read_le(&counter_buf[..C::WIDTH])))
    }
}

impl<C: Counter> Iterator for StoreCursor<C> {
    type Item = Result<(KeyBytes, C), KmerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let entry = self.read_entry();
        if entry.is_err() {
            // A torn record means the rest of the scan is unreadable too.
            self.pos = self.end;
        }
        Some(entry)
    }
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}
