//! IRCv3 message tags: storage, per-recipient selection and providers.

pub mod builtin;
mod escape;
mod provider;
mod selection;
mod store;

pub use self::builtin::{ClientTags, MsgidTag, ServerTimeTag};
pub use self::escape::{escape_tag_value, escape_tag_value_to};
pub(crate) use self::escape::escaped_len;
pub use self::provider::{ProviderId, TagProvider};
pub use self::selection::TagSelection;
pub use self::store::{Opaque, Tag, TagStore};
