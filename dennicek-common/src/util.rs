//! Serde helpers.

/// Serializes a byte buffer as standard base64 text.
///
/// Use with `#[serde(with = "crate::util::base64_bytes")]`.
pub mod base64_bytes {
    use base64::{Engine, display::Base64Display, prelude::BASE64_STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&Base64Display::new(bytes, &BASE64_STANDARD))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        BASE64_STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}
