//! ABI encoding

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::error::{AbiError, Result, ValuePath};
use crate::layout::{self, Slot, LENGTH_PREFIX};
use crate::types::Type;
use crate::validate::validate;
use crate::value::Value;

/// Encode `value` as `ty`
///
/// The value is validated first; nothing is produced unless the whole value
/// conforms to the type.
pub fn encode(ty: &Type, value: &Value) -> Result<Vec<u8>> {
    validate(ty, value)?;

    let mut buf = BytesMut::new();
    write_value(&mut buf, ty, value)?;

    trace!(ty = %ty, len = buf.len(), "encoded abi value");
    Ok(buf.to_vec())
}

/// Encode a single value
fn write_value(buf: &mut BytesMut, ty: &Type, value: &Value) -> Result<()> {
    match (ty, value) {
        (Type::Uint(bits), Value::Uint(v)) | (Type::Ufixed(bits, _), Value::Ufixed(v)) => {
            let mut word = [0u8; 64];
            v.to_big_endian(&mut word);
            buf.put_slice(&word[word.len() - bits.bytes()..]);
        }
        (Type::Bool, Value::Bool(b)) => buf.put_slice(&layout::pack_bools(&[*b])),
        (Type::Byte, Value::Uint(v)) => buf.put_u8(v.byte(0)),
        (Type::Address, Value::Address(addr)) => buf.put_slice(addr.as_bytes()),
        (Type::String, Value::String(bytes)) => {
            buf.put_u16(length_field("string length", bytes.len())?);
            buf.put_slice(bytes);
        }
        (Type::StaticArray(elem, _), Value::StaticArray(items)) => {
            let fields = vec![&**elem; items.len()];
            write_sequence(buf, &fields, items)?;
        }
        (Type::DynamicArray(elem), Value::DynamicArray(items)) => {
            buf.put_u16(length_field("array length", items.len())?);
            let fields = vec![&**elem; items.len()];
            write_sequence(buf, &fields, items)?;
        }
        (Type::Tuple(fields), Value::Tuple(items)) => {
            let fields: Vec<&Type> = fields.iter().collect();
            write_sequence(buf, &fields, items)?;
        }
        (ty, value) => {
            return Err(AbiError::TypeMismatch {
                path: ValuePath::root(),
                expected: ty.to_string(),
                found: value.kind_name(),
            })
        }
    }
    Ok(())
}

/// Encode a field sequence as head followed by tail
///
/// Offsets are relative to the start of this sequence's head.
fn write_sequence(buf: &mut BytesMut, fields: &[&Type], items: &[Value]) -> Result<()> {
    let mut head = BytesMut::new();
    let mut tail = BytesMut::new();
    // (position of the offset in head, position of the field in tail)
    let mut pending = Vec::new();

    for slot in layout::head_slots(fields)? {
        match slot {
            Slot::BoolRun { start, len } => {
                let bits: Vec<bool> = items[start..start + len]
                    .iter()
                    .map(|v| matches!(v, Value::Bool(true)))
                    .collect();
                head.put_slice(&layout::pack_bools(&bits));
            }
            Slot::Static { index, .. } => write_value(&mut head, fields[index], &items[index])?,
            Slot::Dynamic { index } => {
                pending.push((head.len(), tail.len()));
                head.put_u16(0);
                write_value(&mut tail, fields[index], &items[index])?;
            }
        }
    }

    let head_len = head.len();
    for (at, tail_pos) in pending {
        let offset = length_field("offset", head_len + tail_pos)?;
        head[at..at + LENGTH_PREFIX].copy_from_slice(&offset.to_be_bytes());
    }

    buf.put_slice(&head);
    buf.put_slice(&tail);
    Ok(())
}

fn length_field(what: &'static str, size: usize) -> Result<u16> {
    u16::try_from(size).map_err(|_| AbiError::EncodingOverflow { what, size })
}
