use clap::{value_parser, Parser};
use std::path::PathBuf;

/// Command-line options for the top k-mer reporting tool
#[derive(Debug, Parser)]
#[command(
    name = "kmercount",
    about = "Report the most frequent k-mers in a nucleotide read file",
    long_about = "Report the most frequent k-mers in a nucleotide read file.


EXAMPLES:
    // Top 25 9-mers with 32-bit counters and the hash aggregator
    $ kmercount reads.fastq 9 25 2 2

    // Same, written to a file instead of stdout
    $ kmercount reads.fastq 9 25 2 2 top_mers.csv
    ",
    version = "0.1.0"
)]
pub struct Cli {
    /// Four-line-per-record nucleotide read file [path]
    pub input_file: PathBuf,

    /// Number of base pairs in a mer [integer]
    #[clap(value_parser = value_parser!(u32).range(1..))]
    pub kmer_size: u32,

    /// Number of most frequent k-mers to report [integer]
    #[clap(value_parser = value_parser!(u64).range(1..))]
    pub top_kmers_to_report: u64,

    /// Size of the accumulators. 0 = 1 byte (max 2^8-1), 1 = 2 bytes
    /// (max 2^16-1), 2 = 4 bytes (max 2^32-1), 3 = 8 bytes (max 2^64-1)
    #[clap(value_parser = value_parser!(u8).range(0..=3))]
    pub precision: u8,

    /// Aggregation strategy. 0 = sort and accumulate (fast, worse memory),
    /// 1 = ordered map (slow, good memory, consistent performance),
    /// 2 = unordered hash map (better speed, delays during rehashing)
    #[clap(value_parser = value_parser!(u8).range(0..=2))]
    pub counter_type: u8,

    /// Output file for the report; stdout when omitted [path]
    pub output: Option<PathBuf>,
}
