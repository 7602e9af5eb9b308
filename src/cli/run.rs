use crate::cli::counters::StreamCounters;
use crate::cli::BigCount;
use crate::kmer::aggregator::{Aggregator, HashAggregator, MapAggregator, SortAggregator};
use crate::kmer::counter::Counter;
use crate::kmer::counting::MerCounter;
use crate::kmer::error::KmerError;
use crate::kmer::fastq::FastqReader;
use crate::kmer::key::{ByteKey, MerKey, PackedKey, WidthClass};
use crate::kmer::store::{CountStore, StoreConfig};
use indicatif::ProgressBar;
use std::io::BufRead;

/// Counter width selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    U8,
    U16,
    U32,
    U64,
}

impl Precision {
    pub fn from_arg(value: u8) -> Result<Self, KmerError> {
        match value {
            0 => Ok(Precision::U8),
            1 => Ok(Precision::U16),
            2 => Ok(Precision::U32),
            3 => Ok(Precision::U64),
            other => Err(KmerError::InvalidArg(format!("invalid precision {other}"))),
        }
    }
}

/// Aggregation strategy selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorKind {
    Sort,
    Map,
    Hash,
}

impl AggregatorKind {
    pub fn from_arg(value: u8) -> Result<Self, KmerError> {
        match value {
            0 => Ok(AggregatorKind::Sort),
            1 => Ok(AggregatorKind::Map),
            2 => Ok(AggregatorKind::Hash),
            other => Err(KmerError::InvalidArg(format!("invalid counter type {other}"))),
        }
    }
}

/// Everything one counting run needs to know.
#[derive(Debug, Clone)]
pub struct CountOptions {
    pub width: usize,
    pub top: usize,
    pub precision: Precision,
    pub aggregator: AggregatorKind,
    pub store: StoreConfig,
    /// Override of the aggregator's spill threshold; strategy default when
    /// `None`.
    pub spill_threshold: Option<usize>,
}

/// Outcome of a full counting run, counts widened for uniform reporting.
#[derive(Debug)]
pub struct Report {
    pub mers: Vec<(String, BigCount)>,
    pub counters: StreamCounters,
    pub requested: usize,
    pub saturated: bool,
}

/// Read every record from `input` and produce the Top-N report.
///
/// Dispatches the run onto the counter width, the key representation chosen
/// by [`WidthClass`] and the aggregation strategy; all combinations share one
/// generic drive loop.
pub fn count_records<R: BufRead>(
    input: R,
    opts: &CountOptions,
    progress: Option<&ProgressBar>,
) -> Result<Report, KmerError> {
    if opts.width == 0 {
        return Err(KmerError::InvalidArg("k-mer width must be at least 1".into()));
    }
    if opts.top == 0 {
        return Err(KmerError::InvalidArg(
            "number of k-mers to report must be at least 1".into(),
        ));
    }
    match opts.precision {
        Precision::U8 => count_with_counter::<u8, R>(input, opts, progress),
        Precision::U16 => count_with_counter::<u16, R>(input, opts, progress),
        Precision::U32 => count_with_counter::<u32, R>(input, opts, progress),
        Precision::U64 => count_with_counter::<u64, R>(input, opts, progress),
    }
}

fn count_with_counter<C: Counter, R: BufRead>(
    input: R,
    opts: &CountOptions,
    progress: Option<&ProgressBar>,
) -> Result<Report, KmerError> {
    macro_rules! with_key {
        ($key:ty) => {
            match opts.aggregator {
                AggregatorKind::Sort => {
                    drive::<$key, C, SortAggregator<$key, C>, R>(input, opts, progress)
                }
                AggregatorKind::Map => {
                    drive::<$key, C, MapAggregator<$key, C>, R>(input, opts, progress)
                }
                AggregatorKind::Hash => {
                    drive::<$key, C, HashAggregator<$key, C>, R>(input, opts, progress)
                }
            }
        };
    }

    match WidthClass::for_width(opts.width) {
        WidthClass::Reg8 => with_key!(PackedKey<u8, 1>),
        WidthClass::Reg16 => with_key!(PackedKey<u16, 1>),
        WidthClass::Reg32 => with_key!(PackedKey<u32, 1>),
        WidthClass::Reg32x2 => with_key!(PackedKey<u32, 2>),
        WidthClass::Reg64x2 => with_key!(PackedKey<u64, 2>),
        WidthClass::Bytes => with_key!(ByteKey),
    }
}

fn drive<K: MerKey, C: Counter, A: Aggregator<K, C>, R: BufRead>(
    input: R,
    opts: &CountOptions,
    progress: Option<&ProgressBar>,
) -> Result<Report, KmerError> {
    let store = CountStore::open(opts.store.clone())?;
    let spill = opts
        .spill_threshold
        .unwrap_or_else(A::default_spill_threshold);
    let mut counter = MerCounter::<K, C, A>::with_spill_threshold(opts.width, store, spill)?;

    let mut reader = FastqReader::new(input);
    let mut tallies = StreamCounters::default();
    while let Some(record) = reader.next_record()? {
        tallies.records += 1;
        tallies.bases += record.sequence.len() as u64;
        tallies.kmers += counter.add_sequence(record.sequence.as_bytes())? as u64;
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    if tallies.records == 0 {
        return Err(KmerError::EmptyInput);
    }

    let mers = counter.top_mers(opts.top, C::zero())?;
    if mers.is_empty() {
        return Err(KmerError::NoMers);
    }

    let saturated = mers.iter().any(|(_, count)| *count == C::max_value());
    let mers = mers
        .into_iter()
        .map(|(seq, count)| (seq, count.to_u64().unwrap_or(BigCount::MAX)))
        .collect();

    Ok(Report {
        mers,
        counters: tallies,
        requested: opts.top,
        saturated,
    })
}
