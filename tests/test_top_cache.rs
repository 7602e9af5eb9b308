#[cfg(test)]
mod tests {
    use kmercount::kmer::top::TopList;

    fn contents(list: &TopList<u32>) -> Vec<(Vec<u8>, u32)> {
        list.entries()
            .iter()
            .map(|(k, c)| (k.to_vec(), *c))
            .collect()
    }

    /// The structural invariant that must hold after every observe.
    fn assert_invariant(list: &TopList<u32>) {
        assert!(list.len() <= list.capacity());
        let counts: Vec<u32> = list.entries().iter().map(|(_, c)| *c).collect();
        for pair in counts.windows(2) {
            assert!(pair[0] >= pair[1], "not count-descending: {counts:?}");
        }
    }

    /* --------------------------------------------------------------------- */
    /*  ordering and displacement                                            */
    /* --------------------------------------------------------------------- */

    #[test]
    fn primes_on_first_observation() {
        let mut list: TopList<u32> = TopList::new(3);
        list.observe(b"a", 1);
        assert_eq!(contents(&list), vec![(b"a".to_vec(), 1)]);
    }

    #[test]
    fn fills_in_descending_order() {
        let mut list: TopList<u32> = TopList::new(3);
        list.observe(b"a", 5);
        list.observe(b"b", 9);
        list.observe(b"c", 7);
        assert_invariant(&list);
        assert_eq!(
            contents(&list),
            vec![(b"b".to_vec(), 9), (b"c".to_vec(), 7), (b"a".to_vec(), 5)]
        );
    }

    #[test]
    fn evicts_the_tail_when_full() {
        let mut list: TopList<u32> = TopList::new(2);
        list.observe(b"a", 1);
        list.observe(b"b", 2);
        list.observe(b"c", 3);
        assert_invariant(&list);
        assert_eq!(
            contents(&list),
            vec![(b"c".to_vec(), 3), (b"b".to_vec(), 2)]
        );
    }

    #[test]
    fn below_tail_observation_is_ignored_when_full() {
        let mut list: TopList<u32> = TopList::new(2);
        list.observe(b"a", 10);
        list.observe(b"b", 20);
        list.observe(b"c", 10); // equal to tail, not strictly greater
        list.observe(b"d", 1);
        assert_eq!(
            contents(&list),
            vec![(b"b".to_vec(), 20), (b"a".to_vec(), 10)]
        );
    }

    #[test]
    fn growing_key_moves_up_without_duplication() {
        let mut list: TopList<u32> = TopList::new(3);
        list.observe(b"a", 1);
        list.observe(b"b", 2);
        list.observe(b"a", 5);
        assert_invariant(&list);
        assert_eq!(
            contents(&list),
            vec![(b"a".to_vec(), 5), (b"b".to_vec(), 2)]
        );
    }

    #[test]
    fn equal_counts_keep_insertion_order() {
        let mut list: TopList<u32> = TopList::new(4);
        list.observe(b"a", 3);
        list.observe(b"b", 3);
        list.observe(b"c", 3);
        assert_eq!(
            contents(&list),
            vec![(b"a".to_vec(), 3), (b"b".to_vec(), 3), (b"c".to_vec(), 3)]
        );

        // A new equal count goes after the existing run, not before
        list.observe(b"d", 3);
        assert_eq!(contents(&list)[3], (b"d".to_vec(), 3));
    }

    #[test]
    fn low_count_prime_still_satisfies_the_invariant() {
        // The first key primes the cache no matter how small its count; the
        // strict-displacement rule must still produce a correct top list.
        let mut list: TopList<u32> = TopList::new(2);
        list.observe(b"tiny", 1);
        list.observe(b"big", 100);
        list.observe(b"mid", 50);
        assert_invariant(&list);
        assert_eq!(
            contents(&list),
            vec![(b"big".to_vec(), 100), (b"mid".to_vec(), 50)]
        );
    }

    /* --------------------------------------------------------------------- */
    /*  monotone counting streams                                            */
    /* --------------------------------------------------------------------- */

    #[test]
    fn matches_final_ranking_for_incremental_counts() {
        // Simulate store updates: every key's count only ever grows, as it
        // does in a real run. The cache's head must equal the true top-N.
        let mut list: TopList<u32> = TopList::new(3);
        let keys: [&[u8]; 5] = [b"k0", b"k1", b"k2", b"k3", b"k4"];
        let totals = [4u32, 9, 2, 7, 1];

        let mut running = [0u32; 5];
        // Round-robin increments until every key reaches its total
        let mut progressed = true;
        while progressed {
            progressed = false;
            for (i, &total) in totals.iter().enumerate() {
                if running[i] < total {
                    running[i] += 1;
                    list.observe(keys[i], running[i]);
                    assert_invariant(&list);
                    progressed = true;
                }
            }
        }

        assert_eq!(
            contents(&list),
            vec![(b"k1".to_vec(), 9), (b"k3".to_vec(), 7), (b"k0".to_vec(), 4)]
        );
    }
}
