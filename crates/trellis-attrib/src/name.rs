//! Splitting attribute names into a base name and trailing ids.
//!
//! `"LINECOLOR3:5"` becomes base `"LINECOLOR"` with id text `"3:5"`. The id
//! region starts at the first digit, `:`, `*` or `-`, so `"OFFSET-5"` is an
//! indexed name on classes that support ids. A name that is nothing but ids
//! (`"12"`, `"3:5"`) maps to the base name [`ID_ONLY_NAME`].
//!
//! Unparsable id components (wildcards like `"*"`) become [`INVALID_ID`]; the
//! indexed accessor decides what a wildcard means.

/// Id handed to indexed accessors when a component cannot be parsed.
pub const INVALID_ID: i32 = -10;

/// Base name used when the attribute name has no textual prefix.
pub const ID_ONLY_NAME: &str = "IDVALUE";

/// An attribute name split at the start of its id region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedName<'a> {
    pub base: &'a str,
    pub ids: &'a str,
}

#[inline]
fn is_id_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ':' | '*' | '-')
}

/// Split `name` at the first id character, or `None` if it has no id region.
pub fn split_indexed_name(name: &str) -> Option<IndexedName<'_>> {
    let pos = name.find(is_id_char)?;
    let base = if pos == 0 { ID_ONLY_NAME } else { &name[..pos] };
    Some(IndexedName {
        base,
        ids: &name[pos..],
    })
}

/// Parse a leading integer the way `sscanf("%d")` would: optional sign,
/// at least one digit, trailing text ignored.
fn parse_leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Parse a single id; anything unparsable yields [`INVALID_ID`].
pub fn parse_id(ids: &str) -> i32 {
    parse_leading_int(ids).unwrap_or(INVALID_ID)
}

/// Parse `"<id1>:<id2>"`. Each unparsable or missing component yields
/// [`INVALID_ID`] independently, so `"*:5"` is `(INVALID_ID, 5)`.
pub fn parse_id2(ids: &str) -> (i32, i32) {
    match ids.split_once(':') {
        Some((first, second)) => (parse_id(first), parse_id(second)),
        None => (parse_id(ids), INVALID_ID),
    }
}

/// Compose the stored name for a single-id attribute.
pub fn compose_id_name(base: &str, id: i32) -> String {
    if base.is_empty() || base == ID_ONLY_NAME {
        id.to_string()
    } else {
        format!("{}{}", base, id)
    }
}

/// Compose the stored name for a double-id attribute.
pub fn compose_id2_name(base: &str, id1: i32, id2: i32) -> String {
    if base.is_empty() || base == ID_ONLY_NAME {
        format!("{}:{}", id1, id2)
    } else {
        format!("{}{}:{}", base, id1, id2)
    }
}

/// Names with this prefix are private to the toolkit and bypass dispatch.
pub(crate) fn is_internal(name: &str) -> bool {
    name.starts_with("_IUP")
}
