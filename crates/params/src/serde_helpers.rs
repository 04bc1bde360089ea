//! Serde helper modules for serialization/deserialization of Bitcoin types.

use serde::{Deserialize, Deserializer, Serializer, de::Error};

/// Serialize/deserialize compact target bits as a `0x`-prefixed hex string.
///
/// Plain integers are accepted on input as well.
pub mod serde_compact_bits {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BitsRepr {
        Int(u32),
        Hex(String),
    }

    pub fn serialize<S: Serializer>(v: &u32, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{v:#010x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        match BitsRepr::deserialize(d)? {
            BitsRepr::Int(bits) => Ok(bits),
            BitsRepr::Hex(s) => {
                let digits = s
                    .strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .unwrap_or(&s);
                u32::from_str_radix(digits, 16)
                    .map_err(|e| D::Error::custom(format!("invalid compact bits {s}: {e}")))
            }
        }
    }
}
