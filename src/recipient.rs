//! What the engine needs to know about a client it is sending to.

use crate::caps::Capability;
use crate::serialize::Serializer;

/// A connected client that can receive messages.
///
/// The user/channel data model lives outside this crate; implement this on
/// whatever represents a local connection there.
pub trait Recipient {
    /// Current nickname, once nick registration is complete.
    fn nick(&self) -> Option<&str>;

    /// Whether the client negotiated `cap`.
    fn has_cap(&self, cap: &Capability) -> bool;

    /// The wire dialect this client speaks.
    fn serializer(&self) -> &dyn Serializer;
}
