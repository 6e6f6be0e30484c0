//! Configuration types for avm-abi

use serde::{Deserialize, Serialize};

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiConfig {
    /// Deepest type nesting the parser accepts; scalars count as depth 1
    #[serde(default = "default_max_type_depth")]
    pub max_type_depth: usize,
    /// Most array elements and tuple fields a single decode may produce
    #[serde(default = "default_max_decode_values")]
    pub max_decode_values: usize,
}

fn default_max_type_depth() -> usize {
    64
}

fn default_max_decode_values() -> usize {
    1 << 20
}

impl Default for AbiConfig {
    fn default() -> Self {
        Self {
            max_type_depth: default_max_type_depth(),
            max_decode_values: default_max_decode_values(),
        }
    }
}
