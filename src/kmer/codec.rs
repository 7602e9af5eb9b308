use crate::kmer::error::KmerError;

/// Decode table. The index of each letter is its encoded value, so the
/// mapping G=0, T=1, C=2, A=3, N=4 is part of the wire contract: packed keys
/// decode through this table and changing the order changes every report.
pub const BASES: [char; 5] = ['G', 'T', 'C', 'A', 'N'];

const INVALID: u8 = u8::MAX;

/// Static ASCII→code lookup table, both cases accepted.
static LUT: [u8; 256] = {
    let mut t = [INVALID; 256];
    t[b'G' as usize] = 0;
    t[b'g' as usize] = 0;
    t[b'T' as usize] = 1;
    t[b't' as usize] = 1;
    t[b'C' as usize] = 2;
    t[b'c' as usize] = 2;
    t[b'A' as usize] = 3;
    t[b'a' as usize] = 3;
    t[b'N' as usize] = 4;
    t[b'n' as usize] = 4;
    t
};

/// Encode a single nucleotide letter, or `None` for anything outside the
/// alphabet.
#[inline(always)]
pub fn encode_base(b: u8) -> Option<u8> {
    let v = LUT[b as usize];
    if v == INVALID {
        None
    } else {
        Some(v)
    }
}

/// True when `b` is an alphabet letter in either case.
#[inline(always)]
pub fn is_valid_base(b: u8) -> bool {
    LUT[b as usize] != INVALID
}

/// Encode `text` into `out`, replacing its previous contents.
///
/// Upper- and lower-case letters are equivalent; the first byte outside the
/// alphabet fails the whole sequence and reports the offending ASCII value
/// and offset.
pub fn encode_into(text: &[u8], out: &mut Vec<u8>) -> Result<(), KmerError> {
    out.clear();
    out.reserve(text.len());
    for (offset, &b) in text.iter().enumerate() {
        match encode_base(b) {
            Some(v) => out.push(v),
            None => return Err(KmerError::InvalidBase { ascii: b, offset }),
        }
    }
    Ok(())
}

/// Encode `text` into a fresh buffer. See [`encode_into`].
pub fn encode(text: &[u8]) -> Result<Vec<u8>, KmerError> {
    let mut out = Vec::new();
    encode_into(text, &mut out)?;
    Ok(out)
}

/// Decode an encoded sequence back to uppercase letters.
///
/// Any value ≥ 5 fails; the error is propagated unchanged to the caller.
pub fn decode(encoded: &[u8]) -> Result<String, KmerError> {
    let mut out = String::with_capacity(encoded.len());
    for &v in encoded {
        if v as usize >= BASES.len() {
            return Err(KmerError::InvalidCode { value: v });
        }
        out.push(BASES[v as usize]);
    }
    Ok(out)
}
