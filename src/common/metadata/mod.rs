// src/common/metadata/mod.rs

mod encode;
pub mod parse;

pub use encode::{encode_header, encode_record};
pub use parse::{decode, pairs, strip_sentinel, value_for_key};

use alloc::string::String;

use super::config::KEY_TYPE;

/// Decoded form of one wire message.
///
/// `payload` is the complete pair sequence after the sentinel, reserved keys
/// included; sensors scan it again for their own parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    pub identifier: String,
    pub status: Option<String>,
    pub payload: String,
}

impl Metadata {
    /// A record is usable only with both an identifier and a payload.
    pub fn is_valid(&self) -> bool {
        !self.identifier.is_empty() && !self.payload.is_empty()
    }

    /// Valid and addressed to the sensor `identifier`.
    pub fn is_valid_for(&self, identifier: &str) -> bool {
        self.is_valid() && self.identifier == identifier
    }

    /// Looks up `key` in the payload (empty when absent).
    pub fn value(&self, key: &str) -> &str {
        value_for_key(&self.payload, key)
    }

    /// Sensor kind announced by the message, if any.
    pub fn kind(&self) -> Option<&str> {
        Some(self.value(KEY_TYPE)).filter(|kind| !kind.is_empty())
    }
}
