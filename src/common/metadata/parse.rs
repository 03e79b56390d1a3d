// src/common/metadata/parse.rs

use super::Metadata;
use crate::common::config::{
    KEY_ID, KEY_STATUS, KEY_VALUE_SEPARATOR, PAIR_SEPARATOR, SENTINEL,
};
use crate::common::error::{ErrorKind, SensorError};

use alloc::format;
use alloc::string::ToString;

// --- Internal Helpers ---
#[inline]
fn trim_line_end(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n'])
}

// --- Public Parsing Functions ---

/// Iterates the `key=value` pairs of a pair sequence.
///
/// Empty tokens (e.g. after a trailing `&`) and tokens without `=` are skipped.
pub fn pairs(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.split(PAIR_SEPARATOR)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.split_once(KEY_VALUE_SEPARATOR))
}

/// Returns the value of the first pair whose key matches `key` (ASCII
/// case-insensitive), or empty text when there is none.
pub fn value_for_key<'a>(text: &'a str, key: &str) -> &'a str {
    pairs(text)
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
        .map_or("", |(_, value)| value)
}

/// Removes the leading `?`, failing with `MalformedRequest` when it is missing.
pub fn strip_sentinel(text: &str) -> Result<&str, SensorError> {
    let text = trim_line_end(text);
    text.strip_prefix(SENTINEL).ok_or_else(|| {
        SensorError::new(
            ErrorKind::MalformedRequest,
            "metadata::strip_sentinel",
            format!("Invalid request format, missing '{}': {:?}", SENTINEL, text),
        )
    })
}

/// Decodes one wire message into a [`Metadata`] record.
///
/// The returned record may still be invalid (see [`Metadata::is_valid`]);
/// only the sentinel and a non-empty body are checked here.
pub fn decode(text: &str) -> Result<Metadata, SensorError> {
    let body = strip_sentinel(text)?;
    if body.is_empty() {
        return Err(SensorError::new(
            ErrorKind::MalformedRequest,
            "metadata::decode",
            "Empty record after sentinel",
        ));
    }

    let status = value_for_key(body, KEY_STATUS);
    Ok(Metadata {
        identifier: value_for_key(body, KEY_ID).to_string(),
        status: (!status.is_empty()).then(|| status.to_string()),
        payload: body.to_string(),
    })
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_decode_extracts_identifier_and_keeps_payload() {
        let md = decode("?id=X&key=val").unwrap();
        assert_eq!(md.identifier, "X");
        assert!(md.payload.contains("key=val"));
        assert_eq!(md.payload, "id=X&key=val");
        assert_eq!(md.status, None);
        assert!(md.is_valid());
    }

    #[test]
    fn test_decode_missing_sentinel() {
        for text in ["id=0&value=1", "", " ?id=0", "!id=0"] {
            let err = decode(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedRequest, "input {:?}", text);
        }
    }

    #[test]
    fn test_decode_empty_record_is_rejected() {
        assert_eq!(decode("?").unwrap_err().kind(), ErrorKind::MalformedRequest);
        assert_eq!(decode("?\r\n").unwrap_err().kind(), ErrorKind::MalformedRequest);
    }

    #[test]
    fn test_decode_status_and_line_end() {
        let md = decode("?id=2&status=offline&temperature=21.5\r\n").unwrap();
        assert_eq!(md.identifier, "2");
        assert_eq!(md.status.as_deref(), Some("offline"));
        assert_eq!(md.payload, "id=2&status=offline&temperature=21.5");
    }

    #[test]
    fn test_decode_without_identifier_is_invalid() {
        let md = decode("?type=ADC&Resolution=10").unwrap();
        assert!(md.identifier.is_empty());
        assert!(!md.is_valid());
        assert_eq!(md.kind(), Some("ADC"));
    }

    #[test]
    fn test_is_valid_for() {
        let md = decode("?id=0&value=255").unwrap();
        assert!(md.is_valid_for("0"));
        assert!(!md.is_valid_for("X"));
    }

    #[test]
    fn test_value_for_key_first_occurrence_wins() {
        assert_eq!(value_for_key("id=1&id=2", "id"), "1");
    }

    #[test]
    fn test_value_for_key_is_case_insensitive() {
        assert_eq!(value_for_key("Resolution=10", "resolution"), "10");
        assert_eq!(value_for_key("ID=7", "id"), "7");
    }

    #[test]
    fn test_value_for_key_matches_whole_keys() {
        // "id" must not match inside "uid" or "humidity"
        assert_eq!(value_for_key("uid=9&humidity=40", "id"), "");
        assert_eq!(value_for_key("humidity=40", "humidity"), "40");
    }

    #[test]
    fn test_value_for_key_missing_and_trailing_separator() {
        assert_eq!(value_for_key("value=1&", "missing"), "");
        assert_eq!(value_for_key("value=1&", "value"), "1");
        let collected: Vec<(&str, &str)> = pairs("a=1&&b=2&junk&").collect();
        assert_eq!(collected, [("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_value_keeps_equals_in_value() {
        assert_eq!(value_for_key("note=a=b", "note"), "a=b");
    }
}
