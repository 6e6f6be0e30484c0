//! # avm-abi
//!
//! ABI type grammar and binary codec for the AVM.
//!
//! ## Features
//!
//! - **Type**: the closed set of ABI types and their canonical strings
//! - **TypeParser**: canonical type string parser with a nesting limit
//! - **Value**: in-memory values, paired with a type through [`TypedValue`]
//! - **Codec**: head/tail encoding with 2-byte offsets and packed booleans
//!
//! ## Wire Format
//!
//! - `uintN` / `ufixedNxM`: N/8 bytes, big-endian
//! - `bool`: packed MSB-first with neighbouring bools, 8 per byte
//! - `byte`: 1 byte, carried as a `Uint` value below 256; `address`: 32 bytes
//! - `string`: 2-byte length + bytes
//! - `T[N]`: head/tail of N elements
//! - `T[]`: 2-byte count + head/tail of the elements
//! - `(T1,...,Tn)`: static fields inline in the head, dynamic fields as
//!   2-byte offsets (from the head start) into the tail
//!
//! ## Example
//!
//! ```rust
//! use avm_abi::{decode, encode, parse_type, Value};
//!
//! let ty = parse_type("(uint64,string,bool[])").unwrap();
//! let value = Value::Tuple(vec![
//!     Value::uint(42u64),
//!     Value::from("hello"),
//!     Value::DynamicArray(vec![true.into(), false.into()]),
//! ]);
//!
//! let bytes = encode(&ty, &value).unwrap();
//! assert_eq!(decode(&ty, &bytes).unwrap(), value);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod decode;
mod encode;
mod error;
mod layout;
mod parse;
mod types;
mod validate;
mod value;

pub use config::AbiConfig;
pub use decode::{decode, Decoder};
pub use encode::encode;
pub use error::{AbiError, ErrorKind, Result, ValuePath};
pub use parse::{parse_type, TypeParser};
pub use types::{BitSize, Precision, Type};
pub use validate::validate;
pub use value::{TypedValue, Value};

// Re-export primitives for convenience
pub use avm_primitives::{Address, U512};
