//! Head section layout shared by the encoder and decoder
//!
//! A sequence of fields (tuple fields or array elements) is laid out as a
//! head followed by a tail. Each head slot is one of:
//!
//! - a run of consecutive `bool` fields packed MSB-first, 8 per byte
//! - a static field written inline, with its encoded length
//! - a 2-byte big-endian offset to a dynamic field in the tail

use crate::error::Result;
use crate::types::Type;

/// Width of an offset, string length or array count on the wire
pub(crate) const LENGTH_PREFIX: usize = 2;

/// One head slot of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Fields `start..start + len` are all `bool`
    BoolRun { start: usize, len: usize },
    /// Field `index` is static and occupies `len` bytes inline
    Static { index: usize, len: usize },
    /// Field `index` is dynamic and written in the tail
    Dynamic { index: usize },
}

/// Group a field sequence into head slots
pub(crate) fn head_slots(fields: &[&Type]) -> Result<Vec<Slot>> {
    let mut slots = Vec::with_capacity(fields.len());
    let mut i = 0;
    while i < fields.len() {
        if *fields[i] == Type::Bool {
            let len = fields[i..].iter().take_while(|t| ***t == Type::Bool).count();
            slots.push(Slot::BoolRun { start: i, len });
            i += len;
        } else {
            slots.push(match fields[i].static_len()? {
                Some(len) => Slot::Static { index: i, len },
                None => Slot::Dynamic { index: i },
            });
            i += 1;
        }
    }
    Ok(slots)
}

/// Pack booleans MSB-first; unused low bits of the last byte stay zero
pub(crate) fn pack_bools(bits: &[bool]) -> Vec<u8> {
    let mut out = vec![0u8; bits.len().div_ceil(8)];
    for (i, bit) in bits.iter().enumerate() {
        if *bit {
            out[i / 8] |= 0x80 >> (i % 8);
        }
    }
    out
}

/// Unpack `count` booleans MSB-first; unused low bits are ignored
pub(crate) fn unpack_bools(bytes: &[u8], count: usize) -> Vec<bool> {
    (0..count)
        .map(|i| bytes[i / 8] & (0x80 >> (i % 8)) != 0)
        .collect()
}
