//! Env file line parser
//!
//! Minimal parser for the `KEY=VALUE` format of the config file. It works
//! on one line at a time and never allocates; parsed keys and values borrow
//! from the input line.
//!
//! Supported:
//! - `KEY=value` and `KEY = value` (whitespace around key and value is trimmed)
//! - `KEY="quoted value"` (one pair of surrounding double quotes is removed)
//! - Blank lines and `#` comment lines
//!
//! NOT supported:
//! - Inline comments after a value
//! - Escapes inside quotes
//! - Multi-line values

/// Classification of one line of the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty or whitespace-only
    Blank,
    /// Starts with `#` after trimming
    Comment,
    /// A `KEY=VALUE` pair, key and value trimmed and value unquoted
    Entry { key: &'a str, value: &'a str },
    /// No `=`, or `=` as the first character
    Malformed,
}

/// Classify a raw line
pub fn classify(line: &str) -> Line<'_> {
    let line = line.trim();

    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('#') {
        return Line::Comment;
    }

    match split_key_value(line) {
        Some((key, value)) => Line::Entry {
            key,
            value: strip_quotes(value),
        },
        None => Line::Malformed,
    }
}

/// Split a line on its first `=`
///
/// Returns `None` if there is no `=` or it is the first character.
/// Key and value are trimmed independently; the value may be empty.
pub fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    if eq_pos == 0 {
        return None;
    }

    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();
    Some((key, value))
}

/// Remove one pair of surrounding double quotes
///
/// A lone `"` is left as-is, as is a value with only one of the two quotes.
pub fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
