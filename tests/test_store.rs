#[cfg(test)]
mod tests {
    use kmercount::kmer::store::{CountStore, StoreConfig};

    /// Few buckets to force chains; directory cache off so the file path is
    /// exercised too.
    fn small_config(cache_bytes: usize) -> StoreConfig {
        StoreConfig {
            buckets: 8,
            cache_bytes,
            top_capacity: 4,
        }
    }

    fn dump(store: &CountStore<u32>) -> Vec<(Vec<u8>, u32)> {
        let mut entries: Vec<(Vec<u8>, u32)> = store
            .cursor()
            .unwrap()
            .map(|e| {
                let (key, count) = e.unwrap();
                (key.to_vec(), count)
            })
            .collect();
        entries.sort();
        entries
    }

    /* --------------------------------------------------------------------- */
    /*  basic operations                                                     */
    /* --------------------------------------------------------------------- */

    #[test]
    fn add_get_has_put() {
        let mut store: CountStore<u32> = CountStore::open(small_config(0)).unwrap();

        assert!(!store.has(b"ab").unwrap());
        assert_eq!(store.get(b"ab").unwrap(), None);

        assert!(store.add(b"ab", 3).unwrap());
        assert!(store.has(b"ab").unwrap());
        assert_eq!(store.get(b"ab").unwrap(), Some(3));

        // Insert-only: a second add leaves the value alone
        assert!(!store.add(b"ab", 9).unwrap());
        assert_eq!(store.get(b"ab").unwrap(), Some(3));

        // Unconditional write replaces it
        store.put(b"ab", 11).unwrap();
        assert_eq!(store.get(b"ab").unwrap(), Some(11));

        // put also inserts absent keys
        store.put(b"cd", 7).unwrap();
        assert_eq!(store.get(b"cd").unwrap(), Some(7));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn merge_is_additive_per_key() {
        let mut store: CountStore<u32> = CountStore::open(small_config(0)).unwrap();

        store.merge_delta(b"k1", 5).unwrap();
        store.merge_delta(b"k2", 7).unwrap();
        store.merge_delta(b"k1", 11).unwrap();

        assert_eq!(store.get(b"k1").unwrap(), Some(16));
        assert_eq!(store.get(b"k2").unwrap(), Some(7));
    }

    #[test]
    fn merge_saturates_at_counter_max() {
        let mut store: CountStore<u8> = CountStore::open(StoreConfig {
            buckets: 8,
            cache_bytes: 0,
            top_capacity: 4,
        })
        .unwrap();

        store.merge_delta(b"k", 200).unwrap();
        store.merge_delta(b"k", 100).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(u8::MAX));

        // Once saturated it stays there
        store.merge_delta(b"k", 1).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(u8::MAX));
    }

    /* --------------------------------------------------------------------- */
    /*  cursor                                                               */
    /* --------------------------------------------------------------------- */

    #[test]
    fn cursor_visits_every_entry_once() {
        let mut store: CountStore<u32> = CountStore::open(small_config(0)).unwrap();

        let mut expected = Vec::new();
        for i in 0u32..20 {
            let key = format!("key-{i:02}").into_bytes();
            store.merge_delta(&key, i + 1).unwrap();
            expected.push((key, i + 1));
        }
        expected.sort();

        assert_eq!(dump(&store), expected);
    }

    #[test]
    fn keys_longer_than_inline_capacity_survive() {
        let mut store: CountStore<u32> = CountStore::open(small_config(0)).unwrap();
        let long_key = vec![7u8; 64]; // spills the SmallVec
        store.merge_delta(&long_key, 9).unwrap();
        assert_eq!(store.get(&long_key).unwrap(), Some(9));
        assert_eq!(dump(&store), vec![(long_key, 9)]);
    }

    /* --------------------------------------------------------------------- */
    /*  directory cache equivalence                                          */
    /* --------------------------------------------------------------------- */

    #[test]
    fn cached_and_uncached_directories_agree() {
        let mut uncached: CountStore<u32> = CountStore::open(small_config(0)).unwrap();
        let mut cached: CountStore<u32> = CountStore::open(small_config(1 << 20)).unwrap();

        for i in 0u32..50 {
            let key = format!("{}", i * 31 % 17).into_bytes();
            uncached.merge_delta(&key, 1).unwrap();
            cached.merge_delta(&key, 1).unwrap();
        }

        assert_eq!(dump(&uncached), dump(&cached));
    }

    /* --------------------------------------------------------------------- */
    /*  top_keys                                                             */
    /* --------------------------------------------------------------------- */

    #[test]
    fn top_keys_serves_cache_and_scan_paths_identically() {
        let mut store: CountStore<u32> = CountStore::open(StoreConfig {
            buckets: 8,
            cache_bytes: 0,
            top_capacity: 3,
        })
        .unwrap();

        // Distinct counts so the ranking is unambiguous
        for (key, count) in [
            (b"aa".as_slice(), 10u32),
            (b"bb", 40),
            (b"cc", 20),
            (b"dd", 5),
            (b"ee", 30),
        ] {
            store.merge_delta(key, count).unwrap();
        }

        // Cache path: the online cache is 3 deep
        let cached = store.top_keys(3, 0).unwrap();
        let cached: Vec<(Vec<u8>, u32)> =
            cached.into_iter().map(|(k, c)| (k.to_vec(), c)).collect();
        assert_eq!(
            cached,
            vec![(b"bb".to_vec(), 40), (b"ee".to_vec(), 30), (b"cc".to_vec(), 20)]
        );

        // Scan path: asking for more than the cache holds rescans everything
        let scanned = store.top_keys(5, 0).unwrap();
        let scanned: Vec<(Vec<u8>, u32)> =
            scanned.into_iter().map(|(k, c)| (k.to_vec(), c)).collect();
        assert_eq!(
            scanned,
            vec![
                (b"bb".to_vec(), 40),
                (b"ee".to_vec(), 30),
                (b"cc".to_vec(), 20),
                (b"aa".to_vec(), 10),
                (b"dd".to_vec(), 5),
            ]
        );

        // The cache result is a prefix of the scan result
        assert_eq!(&scanned[..3], &cached[..]);
    }

    #[test]
    fn top_keys_applies_min_filter() {
        let mut store: CountStore<u32> = CountStore::open(small_config(0)).unwrap();
        store.merge_delta(b"hi", 10).unwrap();
        store.merge_delta(b"lo", 2).unwrap();

        let kept = store.top_keys(10, 2).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0.as_slice(), b"hi");
    }

    /* --------------------------------------------------------------------- */
    /*  teardown                                                             */
    /* --------------------------------------------------------------------- */

    #[test]
    fn backing_file_is_unique_and_removed_on_drop() {
        let store_a: CountStore<u32> = CountStore::open(small_config(0)).unwrap();
        let store_b: CountStore<u32> = CountStore::open(small_config(0)).unwrap();
        assert_ne!(store_a.path(), store_b.path());

        let path = store_a.path().to_path_buf();
        assert!(path.exists());
        drop(store_a);
        assert!(!path.exists());
    }
}
