//! # avm-primitives
//!
//! Primitive types shared by the AVM ABI codec.
//!
//! This crate provides the fixed-width values the codec moves on and off the
//! wire: the 32-byte account [`Address`] and the 512-bit unsigned integer
//! [`U512`] that backs every `uint`/`ufixed` value.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;

pub use address::{Address, AddressError};

// Re-export primitive-types for U512
pub use primitive_types::U512;

/// Largest scalar width, in bits, that a [`U512`] can carry
pub const MAX_UINT_BITS: usize = 512;
