#[derive(Debug, Default)]
pub struct StreamCounters {
    pub records: u64,
    pub bases: u64,
    pub kmers: u64,
}

impl std::ops::AddAssign for StreamCounters {
    fn add_assign(&mut self, other: Self) {
        self.records += other.records;
        self.bases += other.bases;
        self.kmers += other.kmers;
    }
}
