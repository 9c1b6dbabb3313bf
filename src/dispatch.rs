//! Broadcast fan-out.
//!
//! [`deliver`] drives one [`Event`] through a set of recipients: pre-send
//! hooks, tag population, per-recipient tag selection and the render
//! cache, in that order, handing finished lines to a caller-supplied sink.

use bytes::Bytes;
use tracing::warn;

use crate::event::Event;
use crate::hooks::Hooks;
use crate::recipient::Recipient;

/// Counters from one [`deliver`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Recipients visited.
    pub recipients: usize,
    /// Recipients for whom the event resolved to no messages.
    pub denied: usize,
    /// Recipients skipped after a serializer error.
    pub failed: usize,
    /// Lines handed to the sink.
    pub lines: usize,
}

/// Send `event` to every recipient, in order.
///
/// A serializer error stops delivery to that recipient only; lines already
/// handed to the sink for it stay sent.
///
/// # Example
///
/// ```
/// use slirc_clientproto::caps::Capability;
/// use slirc_clientproto::dispatch::deliver;
/// use slirc_clientproto::serialize::{RfcSerializer, Serializer};
/// use slirc_clientproto::{Event, Hooks, Message, Recipient};
///
/// struct Client(&'static str, RfcSerializer);
///
/// impl Recipient for Client {
///     fn nick(&self) -> Option<&str> { Some(self.0) }
///     fn has_cap(&self, _cap: &Capability) -> bool { false }
///     fn serializer(&self) -> &dyn Serializer { &self.1 }
/// }
///
/// let clients = [Client("a", RfcSerializer::default()), Client("b", RfcSerializer::default())];
/// let hooks = Hooks::new();
/// let mut event = Event::single("PRIVMSG", Message::privmsg("n!u@h", "#chan", "hi"));
///
/// let mut sent = Vec::new();
/// let report = deliver(&mut event, &clients, &hooks, |c, line| sent.push((c.0, line)));
///
/// assert_eq!(report.lines, 2);
/// assert_eq!(&sent[0].1[..], b":n!u@h PRIVMSG #chan :hi\r\n");
/// ```
pub fn deliver<'a, R, I, F>(
    event: &mut Event,
    recipients: I,
    hooks: &Hooks<R>,
    mut sink: F,
) -> DeliveryReport
where
    R: Recipient + 'a,
    I: IntoIterator<Item = &'a R>,
    F: FnMut(&R, Bytes),
{
    let mut report = DeliveryReport::default();

    for recipient in recipients {
        report.recipients += 1;

        let messages = event.messages_for(recipient, hooks);
        if messages.is_empty() {
            report.denied += 1;
            continue;
        }

        let serializer = recipient.serializer();
        for msg in &messages {
            match msg.serialize_for(recipient, serializer, hooks) {
                Ok(line) => {
                    sink(recipient, line);
                    report.lines += 1;
                }
                Err(e) => {
                    warn!(
                        event = event.name(),
                        command = msg.command(),
                        nick = recipient.nick().unwrap_or("*"),
                        error = %e,
                        "failed to serialize message; skipping recipient"
                    );
                    report.failed += 1;
                    break;
                }
            }
        }
    }

    report
}
