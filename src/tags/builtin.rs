//! Tag providers for the common IRCv3 tags.

use tracing::debug;

use crate::caps::Capability;
use crate::hooks::Verdict;
use crate::ircv3::{format_server_time, generate_msgid};
use crate::message::Message;
use crate::recipient::Recipient;
use crate::util::MAX_CLIENT_TAG_DATA;

use super::provider::{ProviderId, TagProvider};
use super::store::Tag;

fn attach(owner: ProviderId, msg: &Message, name: &str, value: String) {
    if msg.tags().contains(name) {
        return;
    }
    if let Err(e) = msg.add_owned_tag(name, value, owner, None) {
        debug!(tag = name, error = %e, "could not attach tag");
    }
}

/// Attaches a `time` tag to every message, sent to `server-time` clients.
///
/// Clients may not supply their own `time` tag.
pub struct ServerTimeTag {
    clock: Box<dyn Fn() -> String>,
}

impl ServerTimeTag {
    /// Use the system clock.
    pub fn new() -> Self {
        Self::with_clock(format_server_time)
    }

    /// Use a custom clock, returning an already formatted timestamp.
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> String + 'static,
    {
        ServerTimeTag {
            clock: Box::new(clock),
        }
    }
}

impl Default for ServerTimeTag {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Recipient + ?Sized> TagProvider<R> for ServerTimeTag {
    fn name(&self) -> &str {
        "server-time"
    }

    fn on_process_tag(&self, _origin: Option<&R>, name: &str, _value: &str) -> Verdict {
        if name == "time" {
            Verdict::Deny
        } else {
            Verdict::Passthrough
        }
    }

    fn on_populate_tags(&self, owner: ProviderId, msg: &Message) {
        attach(owner, msg, "time", (self.clock)());
    }

    fn should_send_tag(&self, recipient: &R, _tag: &Tag) -> bool {
        recipient.has_cap(&Capability::ServerTime)
    }
}

/// Attaches a unique `msgid` tag to every message.
///
/// Sent to clients with either `message-tags` or `msgid`.
#[derive(Debug, Default)]
pub struct MsgidTag;

impl<R: Recipient + ?Sized> TagProvider<R> for MsgidTag {
    fn name(&self) -> &str {
        "msgid"
    }

    fn on_process_tag(&self, _origin: Option<&R>, name: &str, _value: &str) -> Verdict {
        if name == "msgid" {
            Verdict::Deny
        } else {
            Verdict::Passthrough
        }
    }

    fn on_populate_tags(&self, owner: ProviderId, msg: &Message) {
        attach(owner, msg, "msgid", generate_msgid());
    }

    fn should_send_tag(&self, recipient: &R, _tag: &Tag) -> bool {
        recipient.has_cap(&Capability::MessageTags) || recipient.has_cap(&Capability::Msgid)
    }
}

/// Relays client-only tags (`+name`) between `message-tags` clients.
#[derive(Debug, Default)]
pub struct ClientTags;

/// Whether `name` is a well-formed client-only tag key:
/// `+` followed by an optional `vendor/` part and a key of
/// letters, digits and hyphens.
pub fn is_client_tag_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix('+') else {
        return false;
    };
    let key = match rest.rsplit_once('/') {
        Some((vendor, key)) => {
            if vendor.is_empty() || vendor.contains(char::is_whitespace) {
                return false;
            }
            key
        }
        None => rest,
    };
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl<R: Recipient + ?Sized> TagProvider<R> for ClientTags {
    fn name(&self) -> &str {
        "message-tags"
    }

    fn on_process_tag(&self, _origin: Option<&R>, name: &str, value: &str) -> Verdict {
        if !name.starts_with('+') {
            return Verdict::Passthrough;
        }
        if is_client_tag_name(name) && value.len() <= MAX_CLIENT_TAG_DATA {
            Verdict::Allow
        } else {
            Verdict::Deny
        }
    }

    fn should_send_tag(&self, recipient: &R, _tag: &Tag) -> bool {
        recipient.has_cap(&Capability::MessageTags)
    }
}
