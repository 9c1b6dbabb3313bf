//! RFC 1459 line format with IRCv3 message tags.

use std::collections::hash_map::DefaultHasher;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::error::SerializeError;
use crate::message::Message;
use crate::tags::{escape_tag_value_to, escaped_len, TagSelection};
use crate::util::{
    find_protocol_control_char, truncate_utf8_safe, MAX_LINE_LEN, MAX_SERVER_TAG_DATA,
};

use super::{Serializer, SerializerId};

/// Limits applied by [`RfcSerializer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RfcConfig {
    /// Maximum line length including CRLF, not counting the tag section.
    pub max_line: usize,
    /// Maximum tag section length, not counting `@` and the separating space.
    pub max_tag_data: usize,
}

impl Default for RfcConfig {
    fn default() -> Self {
        RfcConfig {
            max_line: MAX_LINE_LEN,
            max_tag_data: MAX_SERVER_TAG_DATA,
        }
    }
}

/// Renders `[@tags ][:source ]COMMAND params\r\n`.
///
/// # Example
///
/// ```
/// use slirc_clientproto::serialize::{RfcSerializer, Serializer};
/// use slirc_clientproto::tags::TagSelection;
/// use slirc_clientproto::Message;
///
/// let msg = Message::privmsg("nick!user@host", "#rust", "Hello, world!");
/// let bytes = RfcSerializer::default()
///     .serialize(&msg, &TagSelection::none(&msg.tags()))
///     .unwrap();
/// assert_eq!(&bytes[..], b":nick!user@host PRIVMSG #rust :Hello, world!\r\n");
/// ```
///
/// Serializers built from equal [`RfcConfig`]s share an id, and so share
/// cached renderings; different limits never do.
#[derive(Clone, Debug)]
pub struct RfcSerializer {
    config: RfcConfig,
    id: SerializerId,
}

impl Default for RfcSerializer {
    fn default() -> Self {
        Self::new(RfcConfig::default())
    }
}

impl RfcSerializer {
    /// Dialect name carried by every `RfcSerializer` id.
    pub const NAME: &'static str = "rfc";

    /// Create a serializer with custom limits.
    pub fn new(config: RfcConfig) -> Self {
        let mut hasher = DefaultHasher::new();
        config.hash(&mut hasher);
        RfcSerializer {
            config,
            id: SerializerId::with_variant(Self::NAME, hasher.finish()),
        }
    }

    /// Active limits.
    pub fn config(&self) -> &RfcConfig {
        &self.config
    }

    fn write_tags(
        &self,
        out: &mut BytesMut,
        msg: &Message,
        selection: &TagSelection,
    ) -> Result<(), SerializeError> {
        let store = msg.tags();
        let mut len = selection.count().saturating_sub(1);
        for tag in selection.tags(&store) {
            check_control(tag.name())?;
            if !is_valid_tag_name(tag.name()) {
                return Err(SerializeError::InvalidTagName(tag.name().to_string()));
            }
            len += tag.name().len();
            if !tag.value().is_empty() {
                len += 1 + escaped_len(tag.value());
            }
        }
        if len > self.config.max_tag_data {
            return Err(SerializeError::TagsTooLong {
                len,
                max: self.config.max_tag_data,
            });
        }

        let mut section = String::with_capacity(len + 2);
        section.push('@');
        for (i, tag) in selection.tags(&store).enumerate() {
            if i > 0 {
                section.push(';');
            }
            section.push_str(tag.name());
            if !tag.value().is_empty() {
                section.push('=');
                escape_tag_value_to(&mut section, tag.value())
                    .map_err(|_| SerializeError::Custom("tag escape failed".into()))?;
            }
        }
        section.push(' ');
        out.put_slice(section.as_bytes());
        Ok(())
    }

    fn write_body(&self, msg: &Message) -> Result<String, SerializeError> {
        let mut body = String::with_capacity(self.config.max_line);

        if let Some(source) = msg.source() {
            check_control(source)?;
            body.push(':');
            body.push_str(source);
            body.push(' ');
        }

        check_control(msg.command())?;
        body.push_str(msg.command());

        let params = msg.params();
        if let Some((last, middle)) = params.split_last() {
            for (index, param) in middle.iter().enumerate() {
                check_control(param)?;
                if param.is_empty() || param.contains(' ') || param.starts_with(':') {
                    return Err(SerializeError::InvalidParameter {
                        index,
                        param: param.to_string(),
                    });
                }
                // Infallible for String.
                let _ = write!(body, " {}", param);
            }

            check_control(last)?;
            body.push(' ');
            if msg.force_trailing() || needs_colon_prefix(last) {
                body.push(':');
            }
            body.push_str(last);
        }

        Ok(body)
    }
}

/// Whether a final parameter must be sent in trailing form.
#[inline]
fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

/// Tag keys may not contain the tag section's own delimiters.
fn is_valid_tag_name(name: &str) -> bool {
    !name.is_empty() && !name.contains([' ', ';', '='])
}

fn check_control(s: &str) -> Result<(), SerializeError> {
    match find_protocol_control_char(s) {
        Some(c) => Err(SerializeError::IllegalControlChar(c)),
        None => Ok(()),
    }
}

impl Serializer for RfcSerializer {
    fn id(&self) -> SerializerId {
        self.id
    }

    fn serialize(&self, msg: &Message, tags: &TagSelection) -> Result<Bytes, SerializeError> {
        let mut out = BytesMut::with_capacity(self.config.max_line);

        if !tags.is_empty() {
            self.write_tags(&mut out, msg, tags)?;
        }

        let body = self.write_body(msg)?;
        let limit = self.config.max_line.saturating_sub(2);
        let kept = truncate_utf8_safe(&body, limit);
        if kept.len() < body.len() {
            debug!(
                command = msg.command(),
                len = body.len(),
                max = limit,
                "truncated oversized line"
            );
        }

        out.put_slice(kept.as_bytes());
        out.put_slice(b"\r\n");
        Ok(out.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Hooks;
    use crate::tags::ProviderId;

    fn render(msg: &Message) -> Result<String, SerializeError> {
        let selection = TagSelection::all(&msg.tags());
        let bytes = RfcSerializer::default().serialize(msg, &selection)?;
        Ok(String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_plain_lines() {
        assert_eq!(render(&Message::ping("tok")).unwrap(), "PING tok\r\n");
        assert_eq!(
            render(&Message::nick("old!u@h", "new")).unwrap(),
            ":old!u@h NICK new\r\n"
        );
        assert_eq!(
            render(&Message::invite("n!u@h", "friend", "#a")).unwrap(),
            ":n!u@h INVITE friend #a\r\n"
        );
    }

    #[test]
    fn test_forced_trailing() {
        assert_eq!(
            render(&Message::privmsg("n!u@h", "#a", "hi")).unwrap(),
            ":n!u@h PRIVMSG #a :hi\r\n"
        );
        assert_eq!(
            render(&Message::pong("irc.example.net", Some("tok"))).unwrap(),
            ":irc.example.net PONG irc.example.net :tok\r\n"
        );
    }

    #[test]
    fn test_trailing_colon_when_needed() {
        let msg = Message::new("CMD", None).with_param("a").with_param("two words");
        assert_eq!(render(&msg).unwrap(), "CMD a :two words\r\n");

        let msg = Message::new("CMD", None).with_param(":colon");
        assert_eq!(render(&msg).unwrap(), "CMD ::colon\r\n");

        let msg = Message::new("CMD", None).with_param("");
        assert_eq!(render(&msg).unwrap(), "CMD :\r\n");

        let msg = Message::new("CMD", None).with_param("word");
        assert_eq!(render(&msg).unwrap(), "CMD word\r\n");
    }

    #[test]
    fn test_invalid_middle_param() {
        for bad in ["", "a b", ":x"] {
            let msg = Message::new("CMD", None).with_param(bad).with_param("last");
            match render(&msg) {
                Err(SerializeError::InvalidParameter { index: 0, param }) => assert_eq!(param, bad),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_control_chars_rejected() {
        let msg = Message::privmsg("n!u@h", "#a", "line\r\nQUIT");
        assert!(matches!(render(&msg), Err(SerializeError::IllegalControlChar('\r'))));

        let msg = Message::new("CMD", Some("bad\0source"));
        assert!(matches!(render(&msg), Err(SerializeError::IllegalControlChar('\0'))));
    }

    #[test]
    fn test_tag_section() {
        let hooks: Hooks<()> = Hooks::new();
        let msg = Message::privmsg("n!u@h", "#a", "hi");
        msg.add_owned_tag("time", "2024-01-01T00:00:00.000Z", ProviderId::new(0), None)
            .unwrap();
        msg.add_owned_tag("+draft/flag", "", ProviderId::new(0), None).unwrap();
        msg.add_owned_tag("+note", "a b;c", ProviderId::new(0), None).unwrap();
        msg.populate(&hooks);

        assert_eq!(
            render(&msg).unwrap(),
            "@time=2024-01-01T00:00:00.000Z;+draft/flag;+note=a\\sb\\;c :n!u@h PRIVMSG #a :hi\r\n"
        );

        let none = TagSelection::none(&msg.tags());
        let bytes = RfcSerializer::default().serialize(&msg, &none).unwrap();
        assert_eq!(&bytes[..], b":n!u@h PRIVMSG #a :hi\r\n");
    }

    #[test]
    fn test_tags_too_long() {
        let msg = Message::ping("tok");
        msg.add_owned_tag("+big", "x".repeat(20), ProviderId::new(0), None)
            .unwrap();
        let serializer = RfcSerializer::new(RfcConfig {
            max_tag_data: 16,
            ..RfcConfig::default()
        });
        let err = serializer
            .serialize(&msg, &TagSelection::all(&msg.tags()))
            .unwrap_err();
        assert!(matches!(err, SerializeError::TagsTooLong { len: 25, max: 16 }));
    }

    #[test]
    fn test_truncation_keeps_crlf_and_utf8() {
        let serializer = RfcSerializer::new(RfcConfig {
            max_line: 20,
            ..RfcConfig::default()
        });
        let msg = Message::new("PRIVMSG", None)
            .with_param("#a")
            .with_param("ééééééééééé");
        let bytes = serializer.serialize(&msg, &TagSelection::none(&msg.tags())).unwrap();
        assert!(bytes.len() <= 20);
        assert!(bytes.ends_with(b"\r\n"));
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.starts_with("PRIVMSG #a :é"));
    }

    #[test]
    fn test_id_follows_config() {
        let wide = RfcSerializer::default();
        let narrow = RfcSerializer::new(RfcConfig {
            max_line: 20,
            ..RfcConfig::default()
        });
        assert_eq!(wide.id(), RfcSerializer::default().id());
        assert_eq!(wide.id().name(), RfcSerializer::NAME);
        assert_ne!(wide.id(), narrow.id());
    }

    #[test]
    fn test_narrow_limits_not_served_from_wide_cache() {
        let msg = Message::privmsg("n!u@h", "#chan", "a fairly long message body here");
        let wide = RfcSerializer::default();
        let narrow = RfcSerializer::new(RfcConfig {
            max_line: 20,
            ..RfcConfig::default()
        });

        let selection = TagSelection::none(&msg.tags());
        let long = msg.get_serialized(&wide, selection.clone()).unwrap();
        let short = msg.get_serialized(&narrow, selection).unwrap();

        assert_eq!(&long[..], b":n!u@h PRIVMSG #chan :a fairly long message body here\r\n");
        assert_eq!(&short[..], b":n!u@h PRIVMSG #ch\r\n");
        assert_eq!(msg.cached_renderings(), 2);
    }

    #[test]
    fn test_tag_name_checks() {
        assert!(is_valid_tag_name("+draft/reply"));
        assert!(is_valid_tag_name("example.com/tag"));
        for bad in ["", "a b", "a;b", "a=b"] {
            assert!(!is_valid_tag_name(bad), "{bad:?} accepted");
        }
        assert!(matches!(
            check_control("a\r\nQUIT"),
            Err(SerializeError::IllegalControlChar('\r'))
        ));
    }
}
