//! ABI type definitions

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AbiError, Result};
use crate::layout::{self, Slot};

/// Width of a `uint`/`ufixed` type: a multiple of 8 in [8, 512]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitSize(u16);

impl BitSize {
    /// Smallest accepted width
    pub const MIN: u16 = 8;
    /// Largest accepted width
    pub const MAX: u16 = 512;

    /// Validate a width
    pub fn new(bits: u16) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&bits) || bits % 8 != 0 {
            return Err(AbiError::InvalidBitSize {
                found: bits.to_string(),
            });
        }
        Ok(BitSize(bits))
    }

    /// Width in bits
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Width in bytes
    pub fn bytes(self) -> usize {
        self.0 as usize / 8
    }
}

impl fmt::Display for BitSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decimal precision of a `ufixed` type, in [1, 160]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision(u8);

impl Precision {
    /// Smallest accepted precision
    pub const MIN: u16 = 1;
    /// Largest accepted precision
    pub const MAX: u16 = 160;

    /// Validate a precision
    pub fn new(precision: u16) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&precision) {
            return Err(AbiError::InvalidPrecision {
                found: precision.to_string(),
            });
        }
        Ok(Precision(precision as u8))
    }

    /// Number of decimal places
    pub fn digits(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ABI types
///
/// Every value of this enum is a well-formed type: widths and precisions can
/// only be built through their validating constructors, and compound types
/// own fully built children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Unsigned integer
    Uint(BitSize),
    /// Unsigned fixed-point decimal; precision is not visible on the wire
    Ufixed(BitSize, Precision),
    /// Boolean, bit-packed with its neighbours
    Bool,
    /// Single byte
    Byte,
    /// 32-byte address
    Address,
    /// Length-prefixed byte string
    String,
    /// Array whose length is part of the type
    StaticArray(Box<Type>, u16),
    /// Count-prefixed array
    DynamicArray(Box<Type>),
    /// Ordered heterogeneous fields
    Tuple(Vec<Type>),
}

impl Type {
    /// Largest number of tuple fields the wire format can address
    pub const MAX_TUPLE_FIELDS: usize = u16::MAX as usize;

    /// `uint<bits>`
    pub fn uint(bits: u16) -> Result<Self> {
        Ok(Type::Uint(BitSize::new(bits)?))
    }

    /// `ufixed<bits>x<precision>`
    pub fn ufixed(bits: u16, precision: u16) -> Result<Self> {
        Ok(Type::Ufixed(BitSize::new(bits)?, Precision::new(precision)?))
    }

    /// `<elem>[<len>]`
    pub fn static_array(elem: Type, len: u16) -> Self {
        Type::StaticArray(Box::new(elem), len)
    }

    /// `<elem>[]`
    pub fn dynamic_array(elem: Type) -> Self {
        Type::DynamicArray(Box::new(elem))
    }

    /// `(<field>,...)`
    pub fn tuple(fields: Vec<Type>) -> Result<Self> {
        if fields.len() > Self::MAX_TUPLE_FIELDS {
            return Err(AbiError::EncodingOverflow {
                what: "tuple field count",
                size: fields.len(),
            });
        }
        Ok(Type::Tuple(fields))
    }

    /// Whether the encoded size depends on the value
    pub fn is_dynamic(&self) -> bool {
        match self {
            Type::String | Type::DynamicArray(_) => true,
            Type::StaticArray(elem, _) => elem.is_dynamic(),
            Type::Tuple(fields) => fields.iter().any(Type::is_dynamic),
            _ => false,
        }
    }

    /// Encoded length in bytes of a static type, `None` for dynamic types
    ///
    /// Fails with `TypeTooLarge` when the length of a static type does not
    /// fit in `usize`.
    pub fn static_len(&self) -> Result<Option<usize>> {
        let len = match self {
            Type::Uint(bits) | Type::Ufixed(bits, _) => bits.bytes(),
            Type::Bool | Type::Byte => 1,
            Type::Address => avm_primitives::Address::LEN,
            Type::String | Type::DynamicArray(_) => return Ok(None),
            Type::StaticArray(elem, len) if **elem == Type::Bool => (*len as usize).div_ceil(8),
            Type::StaticArray(elem, len) => match elem.static_len()? {
                Some(n) => n.checked_mul(*len as usize).ok_or_else(|| self.too_large())?,
                None => return Ok(None),
            },
            Type::Tuple(fields) => {
                let fields: Vec<&Type> = fields.iter().collect();
                let mut total = 0usize;
                for slot in layout::head_slots(&fields)? {
                    let len = match slot {
                        Slot::BoolRun { len, .. } => len.div_ceil(8),
                        Slot::Static { len, .. } => len,
                        Slot::Dynamic { .. } => return Ok(None),
                    };
                    total = total.checked_add(len).ok_or_else(|| self.too_large())?;
                }
                total
            }
        };
        Ok(Some(len))
    }

    fn too_large(&self) -> AbiError {
        AbiError::TypeTooLarge {
            ty: self.to_string(),
        }
    }

    /// Nesting depth, counting scalars as depth 1
    pub fn depth(&self) -> usize {
        match self {
            Type::StaticArray(elem, _) | Type::DynamicArray(elem) => 1 + elem.depth(),
            Type::Tuple(fields) => 1 + fields.iter().map(Type::depth).max().unwrap_or(0),
            _ => 1,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Uint(bits) => write!(f, "uint{}", bits),
            Type::Ufixed(bits, precision) => write!(f, "ufixed{}x{}", bits, precision),
            Type::Bool => f.write_str("bool"),
            Type::Byte => f.write_str("byte"),
            Type::Address => f.write_str("address"),
            Type::String => f.write_str("string"),
            Type::StaticArray(elem, len) => write!(f, "{}[{}]", elem, len),
            Type::DynamicArray(elem) => write!(f, "{}[]", elem),
            Type::Tuple(fields) => {
                f.write_str("(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", field)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for Type {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        crate::parse::parse_type(s)
    }
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
