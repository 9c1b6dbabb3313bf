//! Broadcast events.
//!
//! An [`Event`] wraps the messages produced by one logical occurrence (a
//! JOIN, a burst of MODE lines) and hands every recipient its own list of
//! them. The base list is shared; listeners may swap messages for a
//! recipient but never change what other recipients see.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::hooks::{first_result, Hooks, Verdict};
use crate::message::{Message, MessageList};
use crate::mode::{ModeChange, ModeLimits};

/// One broadcastable occurrence.
///
/// # Example
///
/// ```
/// use slirc_clientproto::{Event, Hooks, Message};
///
/// let mut event = Event::single("JOIN", Message::join("nick!user@host", "#rust"));
/// let hooks: Hooks<()> = Hooks::new();
///
/// let list = event.messages_for(&(), &hooks);
/// assert_eq!(list.len(), 1);
/// assert!(event.is_initialized());
/// ```
#[derive(Debug)]
pub struct Event {
    name: &'static str,
    messages: MessageList,
    initialized: bool,
}

impl Event {
    /// Create an event from freshly built messages.
    pub fn new(name: &'static str, messages: Vec<Message>) -> Self {
        Self::from_shared(name, messages.into_iter().map(Rc::new).collect())
    }

    /// Create an event from messages that are already shared.
    pub fn from_shared(name: &'static str, messages: MessageList) -> Self {
        Event {
            name,
            messages,
            initialized: false,
        }
    }

    /// An event carrying one message.
    pub fn single(name: &'static str, message: Message) -> Self {
        Self::new(name, vec![message])
    }

    /// A `"MODE"` event carrying `changes`, already split into lines.
    pub fn mode(source: &str, target: &str, changes: &[ModeChange], limits: &ModeLimits) -> Self {
        Self::new("MODE", Message::mode_lines(source, target, changes, limits))
    }

    /// Event name listeners subscribe to.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The unfiltered message list.
    pub fn messages(&self) -> &[Rc<Message>] {
        &self.messages
    }

    /// Whether `on_event_init` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Messages to send to `recipient`.
    ///
    /// Runs the one-shot init hook on the first call, then the pre-send
    /// chain for this recipient. An empty list means the recipient gets
    /// nothing.
    pub fn messages_for<R: ?Sized>(&mut self, recipient: &R, hooks: &Hooks<R>) -> MessageList {
        if !self.initialized {
            for listener in hooks.listeners_for(self.name) {
                listener.on_event_init(self);
            }
            self.initialized = true;
            trace!(event = self.name, messages = self.messages.len(), "initialized event");
        }

        let mut list = self.messages.clone();
        let verdict = first_result(hooks.listeners_for(self.name), |listener| {
            listener.on_pre_event_send(recipient, self, &mut list)
        });
        if verdict == Verdict::Deny {
            debug!(event = self.name, "event denied for recipient");
            list.clear();
        }
        list
    }
}
