//! Count fixed-width substrings (k-mers) of nucleotide reads and report the
//! most frequent ones.
//!
//! The counting engine lives in [`kmer`]; the thin layer that the command-line
//! binary drives lives in [`cli`].

pub mod cli;
pub mod kmer;
