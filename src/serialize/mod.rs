//! Wire dialects.
//!
//! A [`Serializer`] turns a [`Message`] plus the subset of its tags a
//! recipient may see into the exact bytes written to that recipient's
//! socket. Each connection names its serializer through
//! [`Recipient::serializer`](crate::recipient::Recipient::serializer), and
//! the serializer's [`SerializerId`] is half of the message cache key.

mod rfc;

use bytes::Bytes;

use crate::error::SerializeError;
use crate::message::Message;
use crate::tags::TagSelection;

pub use self::rfc::{RfcConfig, RfcSerializer};

/// Identity of a wire dialect, used as part of the render cache key.
///
/// Two serializers with the same id must produce identical bytes for the
/// same message and tag selection. Serializers of one dialect whose output
/// depends on configuration carry a distinct `variant` per configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SerializerId {
    name: &'static str,
    variant: u64,
}

impl SerializerId {
    /// Create an id from a static name.
    pub const fn new(name: &'static str) -> Self {
        Self::with_variant(name, 0)
    }

    /// Create an id for one configuration of a dialect.
    pub const fn with_variant(name: &'static str, variant: u64) -> Self {
        SerializerId { name, variant }
    }

    /// The dialect name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Configuration discriminator within the dialect.
    pub fn variant(&self) -> u64 {
        self.variant
    }
}

/// Renders messages for one wire dialect.
pub trait Serializer {
    /// Cache identity of this dialect.
    fn id(&self) -> SerializerId;

    /// Render `msg` including only the tags in `tags`, with line terminator.
    ///
    /// # Errors
    ///
    /// Any [`SerializeError`]; the caller does not cache failures.
    fn serialize(&self, msg: &Message, tags: &TagSelection) -> Result<Bytes, SerializeError>;
}
