//! Protocol limits and small string helpers shared by the serializers
//! and the MODE splitter.

/// Maximum length of an IRC line including the trailing CRLF, not
/// counting the tag section.
pub const MAX_LINE_LEN: usize = 512;

/// Tag data budget for client-supplied tags (IRCv3 message-tags).
pub const MAX_CLIENT_TAG_DATA: usize = 4094;

/// Tag data budget for tags the server adds.
pub const MAX_SERVER_TAG_DATA: usize = 4094;

/// Default number of mode changes carried on a single MODE line
/// (advertised as `MODES` in ISUPPORT).
pub const DEFAULT_MAX_MODES: usize = 20;

/// Longest prefix of `s` that fits in `max_bytes` and ends on a character
/// boundary.
///
/// ```
/// use slirc_clientproto::util::truncate_utf8_safe;
///
/// assert_eq!(truncate_utf8_safe("PRIVMSG #a :hi", 7), "PRIVMSG");
/// // 'é' is two bytes and is dropped whole.
/// assert_eq!(truncate_utf8_safe("café", 4), "caf");
/// ```
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    match s.char_indices().find(|&(i, c)| i + c.len_utf8() > max_bytes) {
        Some((cut, _)) => &s[..cut],
        None => s,
    }
}

/// Returns the first protocol delimiter (NUL, CR or LF) in `s`, if any.
///
/// These characters can never appear inside a rendered line.
#[inline]
pub fn find_protocol_control_char(s: &str) -> Option<char> {
    s.chars().find(|&c| matches!(c, '\0' | '\r' | '\n'))
}
