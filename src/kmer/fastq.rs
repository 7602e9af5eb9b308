use crate::kmer::codec;
use crate::kmer::error::KmerError;
use std::io::BufRead;

/// One four-line record: id line, bases, separator, quality string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub seq_id: String,
    pub sequence: String,
    pub marker: String,
    pub quality: String,
}

/// Streaming reader for four-line nucleotide read files.
///
/// Assumes records are not interleaved with blank lines. A record that ends
/// at EOF before its fourth line is an error, not a silent stop.
pub struct FastqReader<R> {
    input: R,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(input: R) -> Self {
        FastqReader { input }
    }

    /// The next record, or `None` at a clean end of stream.
    pub fn next_record(&mut self) -> Result<Option<FastqRecord>, KmerError> {
        let seq_id = match self.read_line()? {
            None => return Ok(None),
            Some(line) => line,
        };
        let sequence = self.read_line()?.ok_or(KmerError::TruncatedRecord)?;
        let marker = self.read_line()?.ok_or(KmerError::TruncatedRecord)?;
        let quality = self.read_line()?.ok_or(KmerError::TruncatedRecord)?;

        if !seq_id.starts_with('@') {
            return Err(KmerError::BadSeqId(seq_id));
        }
        if !marker.starts_with('+') {
            return Err(KmerError::BadMarker(marker));
        }
        check_sequence(&sequence)?;

        Ok(Some(FastqRecord {
            seq_id,
            sequence,
            marker,
            quality,
        }))
    }

    fn read_line(&mut self) -> Result<Option<String>, KmerError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(KmerError::ReadIo)?;
        if read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// Reject any byte outside the alphabet, either case, reporting its ASCII
/// value and offset.
pub fn check_sequence(sequence: &str) -> Result<(), KmerError> {
    for (offset, &b) in sequence.as_bytes().iter().enumerate() {
        if !codec::is_valid_base(b) {
            return Err(KmerError::InvalidBase { ascii: b, offset });
        }
    }
    Ok(())
}
