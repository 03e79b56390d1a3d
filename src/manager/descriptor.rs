// src/manager/descriptor.rs

use crate::common::{
    config::{DESCRIPTOR_SEPARATOR, PAIR_SEPARATOR},
    error::SensorError,
    metadata::strip_sentinel,
};
use crate::sensor::SensorKind;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// One `id:kind` entry of a handshake descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorEntry {
    pub id: String,
    pub kind: SensorKind,
}

/// Default fleet used when no handshake is performed.
pub const DEFAULT_FLEET: &[(&str, SensorKind)] = &[
    ("0", SensorKind::Adc),
    ("1", SensorKind::Adc),
    ("2", SensorKind::Th),
];

/// Parses `?<ID>:<KIND>&<ID>:<KIND>...`.
///
/// Only a missing sentinel is an error. Entries without `:`, with an empty
/// identifier or with an unknown kind are logged and skipped.
pub fn parse_descriptor(text: &str) -> Result<Vec<DescriptorEntry>, SensorError> {
    let body = strip_sentinel(text)?;
    let mut entries = Vec::new();

    for token in body.split(PAIR_SEPARATOR).filter(|t| !t.is_empty()) {
        let Some((id, kind)) = token.split_once(DESCRIPTOR_SEPARATOR) else {
            log::warn!("Skipping descriptor entry without '{}': {:?}", DESCRIPTOR_SEPARATOR, token);
            continue;
        };
        if id.is_empty() {
            log::warn!("Skipping descriptor entry without identifier: {:?}", token);
            continue;
        }
        match kind.parse::<SensorKind>() {
            Ok(kind) => entries.push(DescriptorEntry {
                id: id.to_string(),
                kind,
            }),
            Err(_) => log::warn!("Unknown sensor type '{}' for sensor {}, skipping", kind, id),
        }
    }
    Ok(entries)
}
