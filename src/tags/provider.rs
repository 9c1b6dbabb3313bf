use crate::hooks::Verdict;
use crate::message::Message;

use super::store::Tag;

/// Index of a tag provider inside a [`Hooks`](crate::hooks::Hooks) registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(usize);

impl ProviderId {
    pub(crate) const fn new(index: usize) -> Self {
        ProviderId(index)
    }

    /// Registration index of the provider.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A listener that owns one family of message tags.
///
/// Providers decide which incoming tags are admitted, may attach their own
/// tags once per message, and decide per recipient whether a tag they own
/// is sent.
pub trait TagProvider<R: ?Sized> {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Called for each tag offered to [`Message::add_tag`], in registry order.
    ///
    /// Return [`Verdict::Allow`] to claim the tag, [`Verdict::Deny`] to drop
    /// it, or [`Verdict::Passthrough`] to let the next provider decide.
    /// `origin` is the client the tag came from, or `None` for tags
    /// originating on the server.
    fn on_process_tag(&self, origin: Option<&R>, name: &str, value: &str) -> Verdict {
        let _ = (origin, name, value);
        Verdict::Passthrough
    }

    /// Attach tags to a message. Runs once per message, before the first
    /// recipient's tag selection is built.
    fn on_populate_tags(&self, owner: ProviderId, msg: &Message) {
        let _ = (owner, msg);
    }

    /// Whether `recipient` may see `tag`, which this provider owns.
    fn should_send_tag(&self, recipient: &R, tag: &Tag) -> bool;
}
