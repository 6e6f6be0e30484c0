//! Type string parser
//!
//! Accepts exactly the canonical grammar produced by `Type`'s `Display`:
//!
//! ```text
//! type   := "uint" N | "ufixed" N "x" M | "bool" | "byte" | "address" | "string"
//!         | type "[" LEN "]" | type "[]" | "(" [type ("," type)*] ")"
//! ```
//!
//! Numbers are plain decimal without sign, whitespace or leading zeros.

use crate::config::AbiConfig;
use crate::error::{AbiError, Result};
use crate::types::{BitSize, Precision, Type};

/// Parse a type string with the default configuration
pub fn parse_type(s: &str) -> Result<Type> {
    TypeParser::default().parse(s)
}

/// Type string parser
#[derive(Debug, Clone, Default)]
pub struct TypeParser {
    config: AbiConfig,
}

impl TypeParser {
    /// Create a parser with the given configuration
    pub fn new(config: AbiConfig) -> Self {
        Self { config }
    }

    /// Parse a type string
    pub fn parse(&self, s: &str) -> Result<Type> {
        self.parse_at(s, 1)
    }

    fn parse_at(&self, s: &str, depth: usize) -> Result<Type> {
        if depth > self.config.max_type_depth {
            return Err(AbiError::type_string(s, "type nesting too deep"));
        }
        if s.is_empty() {
            return Err(AbiError::type_string(s, "empty type"));
        }

        // array suffix binds last, so strip it first
        if let Some(prefix) = s.strip_suffix(']') {
            let open = prefix
                .rfind('[')
                .ok_or_else(|| AbiError::type_string(s, "unmatched ']'"))?;
            let (elem_str, len_str) = (&prefix[..open], &prefix[open + 1..]);
            if elem_str.is_empty() {
                return Err(AbiError::type_string(s, "array without element type"));
            }
            let elem = self.parse_at(elem_str, depth + 1)?;
            if len_str.is_empty() {
                return Ok(Type::dynamic_array(elem));
            }
            if !is_canonical_number(len_str) {
                return Err(AbiError::type_string(len_str, "invalid static array length"));
            }
            let len = len_str
                .parse::<u16>()
                .map_err(|_| AbiError::type_string(len_str, "static array length too large"))?;
            return sized(Type::static_array(elem, len));
        }

        if s.starts_with('(') {
            let inner = s
                .strip_prefix('(')
                .and_then(|rest| rest.strip_suffix(')'))
                .ok_or_else(|| AbiError::type_string(s, "unbalanced parentheses"))?;
            if inner.is_empty() {
                return Ok(Type::Tuple(Vec::new()));
            }
            let fields = split_fields(inner)
                .ok_or_else(|| AbiError::type_string(s, "unbalanced parentheses"))?
                .into_iter()
                .map(|field| self.parse_at(field, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            return sized(Type::tuple(fields)?);
        }

        if let Some(rest) = s.strip_prefix("ufixed") {
            let (bits, precision) = rest
                .split_once('x')
                .filter(|(n, m)| is_canonical_number(n) && is_canonical_number(m))
                .ok_or_else(|| AbiError::type_string(s, "expected ufixed<N>x<M>"))?;
            let bits = parse_bit_size(bits)?;
            let precision = precision
                .parse::<u16>()
                .map_err(|_| AbiError::InvalidPrecision {
                    found: precision.to_string(),
                })
                .and_then(Precision::new)?;
            return Ok(Type::Ufixed(bits, precision));
        }

        if let Some(rest) = s.strip_prefix("uint") {
            if !is_canonical_number(rest) {
                return Err(AbiError::type_string(s, "expected uint<N>"));
            }
            return Ok(Type::Uint(parse_bit_size(rest)?));
        }

        match s {
            "bool" => Ok(Type::Bool),
            "byte" => Ok(Type::Byte),
            "address" => Ok(Type::Address),
            "string" => Ok(Type::String),
            _ => Err(AbiError::type_string(s, "unknown type")),
        }
    }
}

/// Reject static types whose encoded size cannot be represented
fn sized(ty: Type) -> Result<Type> {
    ty.static_len()?;
    Ok(ty)
}

fn parse_bit_size(digits: &str) -> Result<BitSize> {
    digits
        .parse::<u16>()
        .map_err(|_| AbiError::InvalidBitSize {
            found: digits.to_string(),
        })
        .and_then(BitSize::new)
}

/// ASCII digits with no leading zero (except "0" itself)
fn is_canonical_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && (s == "0" || !s.starts_with('0'))
}

/// Split tuple contents at top-level commas
fn split_fields(inner: &str) -> Option<Vec<&str>> {
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                fields.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    fields.push(&inner[start..]);
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kind(s: &str) -> ErrorKind {
        parse_type(s).unwrap_err().kind()
    }

    #[test]
    fn test_parse_simple_types() {
        assert_eq!(parse_type("bool").unwrap(), Type::Bool);
        assert_eq!(parse_type("byte").unwrap(), Type::Byte);
        assert_eq!(parse_type("address").unwrap(), Type::Address);
        assert_eq!(parse_type("string").unwrap(), Type::String);
        assert_eq!(parse_type("uint64").unwrap(), Type::uint(64).unwrap());
        assert_eq!(parse_type("ufixed128x10").unwrap(), Type::ufixed(128, 10).unwrap());
    }

    #[test]
    fn test_parse_arrays() {
        assert_eq!(
            parse_type("byte[32]").unwrap(),
            Type::static_array(Type::Byte, 32)
        );
        assert_eq!(
            parse_type("uint8[][2]").unwrap(),
            Type::static_array(Type::dynamic_array(Type::uint(8).unwrap()), 2)
        );
        assert_eq!(parse_type("bool[0]").unwrap(), Type::static_array(Type::Bool, 0));
    }

    #[test]
    fn test_parse_tuples() {
        assert_eq!(parse_type("()").unwrap(), Type::Tuple(vec![]));
        assert_eq!(
            parse_type("(uint8,(string,bool))").unwrap(),
            Type::Tuple(vec![
                Type::uint(8).unwrap(),
                Type::Tuple(vec![Type::String, Type::Bool]),
            ])
        );
        assert_eq!(
            parse_type("((),bool[2])[]").unwrap(),
            Type::dynamic_array(Type::Tuple(vec![
                Type::Tuple(vec![]),
                Type::static_array(Type::Bool, 2),
            ]))
        );
    }

    #[test]
    fn test_parse_rejects_malformed_uint() {
        assert_eq!(kind("uint123x345"), ErrorKind::InvalidTypeString);
        assert_eq!(kind("uint 128"), ErrorKind::InvalidTypeString);
        assert_eq!(kind("uint_8"), ErrorKind::InvalidTypeString);
        assert_eq!(kind("uint[32]"), ErrorKind::InvalidTypeString);
        assert_eq!(kind("uint"), ErrorKind::InvalidTypeString);
        assert_eq!(kind("uint08"), ErrorKind::InvalidTypeString);
        assert_eq!(kind("uint+8"), ErrorKind::InvalidTypeString);
    }

    #[test]
    fn test_parse_bit_size_errors() {
        assert_eq!(kind("uint0"), ErrorKind::InvalidBitSize);
        assert_eq!(kind("uint7"), ErrorKind::InvalidBitSize);
        assert_eq!(kind("uint520"), ErrorKind::InvalidBitSize);
        assert_eq!(kind("uint18446744073709551616"), ErrorKind::InvalidBitSize);
        assert_eq!(kind("ufixed12x5"), ErrorKind::InvalidBitSize);
    }

    #[test]
    fn test_parse_precision_errors() {
        assert_eq!(kind("ufixed64x0"), ErrorKind::InvalidPrecision);
        assert_eq!(kind("ufixed64x161"), ErrorKind::InvalidPrecision);
        assert_eq!(kind("ufixed64x99999"), ErrorKind::InvalidPrecision);
        assert_eq!(kind("ufixed64"), ErrorKind::InvalidTypeString);
        assert_eq!(kind("ufixed64x"), ErrorKind::InvalidTypeString);
        assert_eq!(kind("ufixedx10"), ErrorKind::InvalidTypeString);
        assert_eq!(kind("ufixed64x10x2"), ErrorKind::InvalidTypeString);
    }

    #[test]
    fn test_parse_rejects_malformed_compounds() {
        for s in [
            "", " ", "bool ", "(bool", "bool)", "(bool,)", "(,bool)", "(bool))(", "[]",
            "bool[", "bool]", "bool[-1]", "bool[1a]", "bool[ 1]", "bool[01]", "bool[65536]",
            "Bool", "(uint8)(bool)",
        ] {
            assert_eq!(kind(s), ErrorKind::InvalidTypeString, "input {:?}", s);
        }
    }

    #[test]
    fn test_parse_error_names_offending_substring() {
        match parse_type("(uint8,bool[1x])").unwrap_err() {
            AbiError::InvalidTypeString { input, .. } => assert_eq!(input, "1x"),
            other => panic!("unexpected error {:?}", other),
        }
        match parse_type("(uint8,uint12)").unwrap_err() {
            AbiError::InvalidBitSize { found } => assert_eq!(found, "12"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_depth_limit() {
        let parser = TypeParser::new(AbiConfig {
            max_type_depth: 3,
            ..AbiConfig::default()
        });
        assert!(parser.parse("uint8[][]").is_ok());
        assert_eq!(
            parser.parse("uint8[][][]").unwrap_err().kind(),
            ErrorKind::InvalidTypeString
        );
        assert!(parser.parse("((bool))").is_ok());
        assert!(parser.parse("(((bool)))").is_err());

        let deep = format!("{}bool{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(kind(&deep), ErrorKind::InvalidTypeString);
    }

    #[test]
    fn test_parse_rejects_oversized_static_types() {
        assert_eq!(kind("uint512[65535][65535][65535][65535]"), ErrorKind::TypeTooLarge);
        assert_eq!(
            kind("(byte,uint512[65535][65535][65535][65535])"),
            ErrorKind::TypeTooLarge
        );
        assert!(parse_type("uint512[65535][65535]").is_ok());
        assert!(parse_type("(string,uint512[65535][65535][65535][65535])").is_err());
        assert!(parse_type("uint512[65535][65535][65535][65535][]").is_err());
        assert!(parse_type("string[65535][65535][65535][65535]").is_ok());
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(
            split_fields("uint8,(string,bool),byte[2]").unwrap(),
            vec!["uint8", "(string,bool)", "byte[2]"]
        );
        assert!(split_fields("uint8)(").is_none());
        assert!(split_fields("(uint8").is_none());
    }
}
