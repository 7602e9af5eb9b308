pub mod counters;
pub mod io;
pub mod opts;
pub mod run;

/// Widest count type, used when reporting counts across precisions.
pub type BigCount = u64;
