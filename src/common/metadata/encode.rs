// src/common/metadata/encode.rs

use crate::common::config::{KEY_ID, KEY_TYPE, KEY_VALUE_SEPARATOR, PAIR_SEPARATOR, SENTINEL};

use alloc::string::String;

/// Basic communication header: `?type=<kind>&id=<identifier>`.
pub fn encode_header(kind: &str, identifier: &str) -> String {
    let mut out = String::new();
    out.push(SENTINEL);
    push_pair(&mut out, KEY_TYPE, kind);
    out.push(PAIR_SEPARATOR);
    push_pair(&mut out, KEY_ID, identifier);
    out
}

/// Header followed by `&<name>=<value>` for each pair, in iteration order.
pub fn encode_record<'a, I>(kind: &str, identifier: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = encode_header(kind, identifier);
    for (name, value) in params {
        out.push(PAIR_SEPARATOR);
        push_pair(&mut out, name, value);
    }
    out
}

#[inline]
fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push(KEY_VALUE_SEPARATOR);
    out.push_str(value);
}
