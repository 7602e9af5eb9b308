pub mod aggregator;
pub mod codec;
pub mod counter;
pub mod counting;
pub mod error;
pub mod fastq;
pub mod key;
pub mod store;
pub mod top;
