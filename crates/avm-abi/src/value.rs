//! ABI value model

use std::fmt;

use avm_primitives::{Address, U512};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Type;
use crate::{decode, encode, validate};

/// In-memory value of an ABI type
///
/// A value carries no type of its own; it is always paired with the [`Type`]
/// it was built for. [`TypedValue`] keeps such a pair together.
///
/// `byte` values are `Uint` values that fit in 8 bits; see [`Value::byte`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Unsigned integer
    Uint(U512),
    /// Raw fixed-point integer, scaled by the type's precision
    Ufixed(U512),
    /// Boolean
    Bool(bool),
    /// 32-byte address
    Address(Address),
    /// Byte string
    String(Vec<u8>),
    /// Elements of a static array
    StaticArray(Vec<Value>),
    /// Elements of a dynamic array
    DynamicArray(Vec<Value>),
    /// Tuple fields
    Tuple(Vec<Value>),
}

impl Value {
    /// Create a uint value
    pub fn uint(value: impl Into<U512>) -> Self {
        Value::Uint(value.into())
    }

    /// Create a byte value
    pub fn byte(b: u8) -> Self {
        Value::Uint(U512::from(b))
    }

    /// Create a ufixed value from its raw (scaled) integer
    pub fn ufixed(raw: impl Into<U512>) -> Self {
        Value::Ufixed(raw.into())
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into().into_bytes())
    }

    /// Create an address value from a byte slice
    pub fn address_from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Value::Address(Address::from_slice(bytes)?))
    }

    /// Variant name, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Ufixed(_) => "ufixed",
            Value::Bool(_) => "bool",
            Value::Address(_) => "address",
            Value::String(_) => "string",
            Value::StaticArray(_) => "static array",
            Value::DynamicArray(_) => "dynamic array",
            Value::Tuple(_) => "tuple",
        }
    }

    /// Integer of a `uint` or `ufixed` value
    pub fn as_uint(&self) -> Option<U512> {
        match self {
            Value::Uint(v) | Value::Ufixed(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean of a `bool` value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Byte of a `uint` value that fits in 8 bits
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Value::Uint(v) if v.bits() <= 8 => Some(v.byte(0)),
            _ => None,
        }
    }

    /// Address of an `address` value
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Value::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Raw bytes of a `string` value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// `string` value as UTF-8, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Children of an array or tuple value
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::StaticArray(items) | Value::DynamicArray(items) | Value::Tuple(items) => {
                Some(items)
            }
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Address> for Value {
    fn from(a: Address) -> Self {
        Value::Address(a)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

/// A value together with the type it was validated against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedValue {
    ty: Type,
    value: Value,
}

impl TypedValue {
    /// Pair a value with its type, validating it
    pub fn new(ty: Type, value: Value) -> Result<Self> {
        validate(&ty, &value)?;
        Ok(Self { ty, value })
    }

    /// Decode `bytes` as `ty`
    pub fn decode(ty: Type, bytes: &[u8]) -> Result<Self> {
        let value = decode(&ty, bytes)?;
        Ok(Self { ty, value })
    }

    /// Encode to the wire format
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode(&self.ty, &self.value)
    }

    /// The type
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// The value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Split into type and value
    pub fn into_parts(self) -> (Type, Value) {
        (self.ty, self.value)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, &self.ty, &self.value)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, ty: &Type, value: &Value) -> fmt::Result {
    match (ty, value) {
        (Type::Ufixed(_, precision), Value::Ufixed(raw)) => {
            let digits = raw.to_string();
            let places = precision.digits();
            if digits.len() > places {
                let (int, frac) = digits.split_at(digits.len() - places);
                write!(f, "{}.{}", int, frac)
            } else {
                write!(f, "0.{:0>width$}", digits, width = places)
            }
        }
        (Type::String, Value::String(bytes)) => match std::str::from_utf8(bytes) {
            Ok(s) => write!(f, "{:?}", s),
            Err(_) => write!(f, "0x{}", hex::encode(bytes)),
        },
        (Type::StaticArray(elem, _), Value::StaticArray(items))
        | (Type::DynamicArray(elem), Value::DynamicArray(items)) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, elem, item)?;
            }
            f.write_str("]")
        }
        (Type::Tuple(fields), Value::Tuple(items)) => {
            f.write_str("(")?;
            for (i, (field, item)) in fields.iter().zip(items).enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, field, item)?;
            }
            f.write_str(")")
        }
        (_, Value::Uint(v)) => write!(f, "{}", v),
        (_, Value::Bool(b)) => write!(f, "{}", b),
        (_, Value::Address(a)) => write!(f, "{}", a),
        // unreachable for validated pairs
        (_, other) => write!(f, "{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::uint(7u64).as_uint(), Some(U512::from(7u64)));
        assert_eq!(Value::ufixed(7u64).as_uint(), Some(U512::from(7u64)));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::byte(3).as_byte(), Some(3));
        assert_eq!(Value::byte(3), Value::uint(3u64));
        assert_eq!(Value::uint(256u64).as_byte(), None);
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert_eq!(Value::String(vec![0xff]).as_str(), None);
        assert_eq!(Value::String(vec![0xff]).as_bytes(), Some(&[0xff][..]));
        assert_eq!(Value::Tuple(vec![]).as_slice(), Some(&[][..]));
        assert_eq!(Value::Bool(true).as_uint(), None);
    }

    #[test]
    fn test_address_from_slice() {
        let v = Value::address_from_slice(&[0x11; 32]).unwrap();
        assert_eq!(v.as_address(), Some(&Address::from_bytes([0x11; 32])));

        let err = Value::address_from_slice(&[0x11; 20]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueOutOfRange);
    }

    #[test]
    fn test_typed_value_rejects_mismatch() {
        let err = TypedValue::new(Type::Bool, Value::byte(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_typed_value_encode_decode() {
        let ty: Type = "(uint16,string)".parse().unwrap();
        let tv = TypedValue::new(
            ty.clone(),
            Value::Tuple(vec![Value::uint(513u64), Value::from("hi")]),
        )
        .unwrap();
        let bytes = tv.encode().unwrap();
        assert_eq!(bytes, vec![0x02, 0x01, 0x00, 0x04, 0x00, 0x02, b'h', b'i']);

        let back = TypedValue::decode(ty, &bytes).unwrap();
        assert_eq!(back, tv);
        let (ty, value) = back.into_parts();
        assert_eq!(ty.to_string(), "(uint16,string)");
        assert_eq!(value.as_slice().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn test_display_ufixed_uses_precision() {
        let ty = Type::ufixed(64, 2).unwrap();
        let tv = TypedValue::new(ty.clone(), Value::ufixed(12345u64)).unwrap();
        assert_eq!(tv.to_string(), "123.45");

        let tv = TypedValue::new(ty.clone(), Value::ufixed(5u64)).unwrap();
        assert_eq!(tv.to_string(), "0.05");

        let tv = TypedValue::new(Type::ufixed(64, 3).unwrap(), Value::ufixed(0u64)).unwrap();
        assert_eq!(tv.to_string(), "0.000");
    }

    #[test]
    fn test_display_compound() {
        let ty: Type = "(bool[2],string,byte[])".parse().unwrap();
        let value = Value::Tuple(vec![
            Value::StaticArray(vec![true.into(), false.into()]),
            "x".into(),
            Value::DynamicArray(vec![Value::byte(1), Value::uint(2u64)]),
        ]);
        let tv = TypedValue::new(ty, value).unwrap();
        assert_eq!(tv.to_string(), "([true, false], \"x\", [1, 2])");
    }

    #[test]
    fn test_value_serde() {
        let value = Value::Tuple(vec![Value::uint(1u64), Value::Bool(false)]);
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
