//! IRCv3 capabilities that influence what a recipient is sent.
//!
//! The engine never negotiates capabilities itself. It only asks a
//! [`Recipient`](crate::recipient::Recipient) whether one was negotiated,
//! typically from inside a tag provider's visibility check.

use std::collections::HashSet;
use std::fmt;

/// A capability that changes the wire output for a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Capability {
    /// `server-time`: a `time` tag on every message.
    ServerTime,
    /// `message-tags`: client-only (`+`) tags and `msgid`.
    MessageTags,
    /// `msgid` without the rest of `message-tags`.
    Msgid,
    /// `extended-join`: account and realname on JOIN.
    ExtendedJoin,
    /// `account-tag`: the sender's account on every message.
    AccountTag,
    /// `multi-prefix`: every status prefix in NAMES and WHO.
    MultiPrefix,
    /// `echo-message`: a client's own messages are sent back to it.
    EchoMessage,
    /// Anything else, by name.
    Other(String),
}

impl Capability {
    /// Every capability with a dedicated variant.
    pub const KNOWN: [Capability; 7] = [
        Capability::ServerTime,
        Capability::MessageTags,
        Capability::Msgid,
        Capability::ExtendedJoin,
        Capability::AccountTag,
        Capability::MultiPrefix,
        Capability::EchoMessage,
    ];

    /// Name as sent in `CAP LS`.
    pub fn name(&self) -> &str {
        match self {
            Capability::ServerTime => "server-time",
            Capability::MessageTags => "message-tags",
            Capability::Msgid => "msgid",
            Capability::ExtendedJoin => "extended-join",
            Capability::AccountTag => "account-tag",
            Capability::MultiPrefix => "multi-prefix",
            Capability::EchoMessage => "echo-message",
            Capability::Other(name) => name,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Capability {
    /// Look up a capability by name; an `=value` suffix is ignored.
    fn from(s: &str) -> Self {
        let name = s.split_once('=').map_or(s, |(name, _)| name);
        Capability::KNOWN
            .into_iter()
            .find(|cap| cap.name() == name)
            .unwrap_or_else(|| Capability::Other(name.to_string()))
    }
}

/// The set of capabilities a client has negotiated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapSet(HashSet<Capability>);

impl CapSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a space-separated `CAP REQ` style list.
    ///
    /// Entries prefixed with `-` request removal and are skipped.
    pub fn parse(list: &str) -> Self {
        list.split_whitespace()
            .filter(|name| !name.starts_with('-'))
            .map(Capability::from)
            .collect()
    }

    /// Apply a `CAP REQ` list to an existing set: plain names are added,
    /// `-name` entries removed.
    pub fn apply(&mut self, list: &str) {
        for entry in list.split_whitespace() {
            match entry.strip_prefix('-') {
                Some(name) => {
                    self.0.remove(&Capability::from(name));
                }
                None => {
                    self.0.insert(Capability::from(entry));
                }
            }
        }
    }

    /// Add a capability. Returns false if it was already present.
    pub fn insert(&mut self, cap: Capability) -> bool {
        self.0.insert(cap)
    }

    /// Remove a capability. Returns true if it was present.
    pub fn remove(&mut self, cap: &Capability) -> bool {
        self.0.remove(cap)
    }

    /// Whether `cap` was negotiated.
    pub fn contains(&self, cap: &Capability) -> bool {
        self.0.contains(cap)
    }

    /// Number of negotiated capabilities.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was negotiated.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for CapSet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        CapSet(iter.into_iter().collect())
    }
}
