//! ABI decoding
//!
//! Decoding is strict: every region handed to a decoder must hold exactly one
//! value. Short input, stray offsets and leftover bytes are all errors.

use avm_primitives::{Address, U512};
use tracing::trace;

use crate::config::AbiConfig;
use crate::error::{AbiError, Result};
use crate::layout::{self, Slot, LENGTH_PREFIX};
use crate::types::Type;
use crate::value::Value;

/// Decode `bytes` as a value of `ty` with the default configuration
pub fn decode(ty: &Type, bytes: &[u8]) -> Result<Value> {
    Decoder::default().decode(ty, bytes)
}

/// Strict ABI decoder
///
/// Zero-width types such as `()` or `bool[0]` decode from no input at all, so
/// the number of array elements and tuple fields one call may produce is
/// capped by [`AbiConfig::max_decode_values`].
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: AbiConfig,
}

impl Decoder {
    /// Create a decoder with the given configuration
    pub fn new(config: AbiConfig) -> Self {
        Self { config }
    }

    /// Decode `bytes` as a value of `ty`
    pub fn decode(&self, ty: &Type, bytes: &[u8]) -> Result<Value> {
        let mut reader = Reader {
            limit: self.config.max_decode_values,
            remaining: self.config.max_decode_values,
        };
        let value = reader.read_value(ty, bytes)?;
        trace!(ty = %ty, len = bytes.len(), "decoded abi value");
        Ok(value)
    }
}

/// Per-call decoding state
struct Reader {
    limit: usize,
    remaining: usize,
}

impl Reader {
    /// Decode a region holding exactly one value of `ty`
    fn read_value(&mut self, ty: &Type, bytes: &[u8]) -> Result<Value> {
        match ty {
            Type::Uint(bits) => {
                expect_len(bytes, bits.bytes())?;
                Ok(Value::Uint(U512::from_big_endian(bytes)))
            }
            Type::Ufixed(bits, _) => {
                expect_len(bytes, bits.bytes())?;
                Ok(Value::Ufixed(U512::from_big_endian(bytes)))
            }
            Type::Bool => {
                expect_len(bytes, 1)?;
                Ok(Value::Bool(layout::unpack_bools(bytes, 1)[0]))
            }
            Type::Byte => {
                expect_len(bytes, 1)?;
                Ok(Value::byte(bytes[0]))
            }
            Type::Address => {
                expect_len(bytes, Address::LEN)?;
                Ok(Value::Address(Address::from_slice(bytes)?))
            }
            Type::String => {
                let (len, body) = split_length(bytes)?;
                expect_len(body, len)?;
                Ok(Value::String(body.to_vec()))
            }
            Type::StaticArray(elem, len) => {
                self.charge(*len as usize)?;
                let fields = vec![&**elem; *len as usize];
                Ok(Value::StaticArray(self.read_sequence(&fields, bytes)?))
            }
            Type::DynamicArray(elem) => {
                let (count, body) = split_length(bytes)?;
                self.charge(count)?;
                let fields = vec![&**elem; count];
                Ok(Value::DynamicArray(self.read_sequence(&fields, body)?))
            }
            Type::Tuple(fields) => {
                self.charge(fields.len())?;
                let fields: Vec<&Type> = fields.iter().collect();
                Ok(Value::Tuple(self.read_sequence(&fields, bytes)?))
            }
        }
    }

    /// Account for `count` child values against the element limit
    fn charge(&mut self, count: usize) -> Result<()> {
        self.remaining = self
            .remaining
            .checked_sub(count)
            .ok_or(AbiError::ValueLimitExceeded { limit: self.limit })?;
        Ok(())
    }

    /// Decode a region holding a head section followed by its tail
    fn read_sequence(&mut self, fields: &[&Type], bytes: &[u8]) -> Result<Vec<Value>> {
        let mut values: Vec<Option<Value>> = vec![None; fields.len()];
        // (field index, offset from head start)
        let mut dynamic: Vec<(usize, usize)> = Vec::new();
        let mut cursor = 0;

        for slot in layout::head_slots(fields)? {
            match slot {
                Slot::BoolRun { start, len } => {
                    let chunk = take(bytes, cursor, len.div_ceil(8))?;
                    for (i, bit) in layout::unpack_bools(chunk, len).into_iter().enumerate() {
                        values[start + i] = Some(Value::Bool(bit));
                    }
                    cursor += chunk.len();
                }
                Slot::Static { index, len } => {
                    let chunk = take(bytes, cursor, len)?;
                    values[index] = Some(self.read_value(fields[index], chunk)?);
                    cursor += len;
                }
                Slot::Dynamic { index } => {
                    let chunk = take(bytes, cursor, LENGTH_PREFIX)?;
                    dynamic.push((index, u16::from_be_bytes([chunk[0], chunk[1]]) as usize));
                    cursor += LENGTH_PREFIX;
                }
            }
        }

        let head_len = cursor;
        match dynamic.first() {
            None if head_len != bytes.len() => {
                return Err(AbiError::TrailingBytes {
                    consumed: head_len,
                    len: bytes.len(),
                });
            }
            Some(&(_, offset)) if offset != head_len => {
                return Err(AbiError::UnalignedOffset {
                    offset,
                    expected: head_len,
                });
            }
            _ => {}
        }

        let mut previous = head_len;
        for &(_, offset) in &dynamic {
            if offset > bytes.len() {
                return Err(AbiError::OffsetOutOfBounds {
                    offset,
                    len: bytes.len(),
                });
            }
            if offset < previous {
                return Err(AbiError::NonMonotonicOffset { offset, previous });
            }
            previous = offset;
        }

        for (k, &(index, start)) in dynamic.iter().enumerate() {
            let end = dynamic.get(k + 1).map_or(bytes.len(), |&(_, next)| next);
            values[index] = Some(self.read_value(fields[index], &bytes[start..end])?);
        }

        Ok(values.into_iter().flatten().collect())
    }
}

/// Read a 2-byte big-endian length and return it with the remaining bytes
fn split_length(bytes: &[u8]) -> Result<(usize, &[u8])> {
    let prefix = take(bytes, 0, LENGTH_PREFIX)?;
    let len = u16::from_be_bytes([prefix[0], prefix[1]]) as usize;
    Ok((len, &bytes[LENGTH_PREFIX..]))
}

/// Borrow `len` bytes at `at`, failing if the region is too short
fn take(bytes: &[u8], at: usize, len: usize) -> Result<&[u8]> {
    let end = at.checked_add(len).unwrap_or(usize::MAX);
    bytes.get(at..end).ok_or(AbiError::BufferTooShort {
        need: end,
        have: bytes.len(),
    })
}

/// Require a region of exactly `len` bytes
fn expect_len(bytes: &[u8], len: usize) -> Result<()> {
    if bytes.len() < len {
        return Err(AbiError::BufferTooShort {
            need: len,
            have: bytes.len(),
        });
    }
    if bytes.len() > len {
        return Err(AbiError::TrailingBytes {
            consumed: len,
            len: bytes.len(),
        });
    }
    Ok(())
}
