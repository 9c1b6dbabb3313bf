//! IRCv3 message tag value escaping.
//!
//! Escaping is a one-way transform applied when a tag value is rendered.
//! Decoding client input is handled by whatever parses incoming lines.

use std::fmt::{Result as FmtResult, Write};

/// Escape a tag value into `f`.
///
/// Substitutions: space as `\s`, `;` as `\;`, `\` as `\\`, LF as `\n`
/// and CR as `\r`. Every other character passes through unchanged.
pub fn escape_tag_value_to(f: &mut dyn Write, value: &str) -> FmtResult {
    for c in value.chars() {
        match c {
            ' ' => f.write_str("\\s")?,
            ';' => f.write_str("\\;")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Escape a tag value into a new string.
///
/// ```
/// use slirc_clientproto::tags::escape_tag_value;
///
/// assert_eq!(escape_tag_value("hello world"), "hello\\sworld");
/// ```
pub fn escape_tag_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    // Writing into a String cannot fail.
    let _ = escape_tag_value_to(&mut escaped, value);
    escaped
}

/// Number of bytes `value` occupies once escaped.
pub(crate) fn escaped_len(value: &str) -> usize {
    value
        .bytes()
        .map(|b| match b {
            b' ' | b';' | b'\\' | b'\n' | b'\r' => 2,
            _ => 1,
        })
        .sum()
}
