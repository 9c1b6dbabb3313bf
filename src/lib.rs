//! # slirc-clientproto
//!
//! The client-facing half of an IRC server's protocol layer: turning "a
//! thing that happened" into the exact bytes each connected client
//! receives.
//!
//! ## Features
//!
//! - Messages that render once per distinct client profile, not once per
//!   client, with a per-message render cache
//! - IRCv3 message tags with pluggable providers deciding admission,
//!   population and per-recipient visibility
//! - Broadcast events with per-recipient filtering hooks
//! - MODE line splitting that respects line and per-line change limits
//! - Numeric replies addressed to registered and unregistered clients
//! - Optional Tokio codec for writing rendered lines to a socket
//!
//! Everything here is single-threaded: messages share state through
//! `Rc`/`RefCell`, so none of these types are `Send`. Run one engine per
//! event loop.

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ```rust
//! use slirc_clientproto::caps::{CapSet, Capability};
//! use slirc_clientproto::dispatch::deliver;
//! use slirc_clientproto::serialize::{RfcSerializer, Serializer};
//! use slirc_clientproto::tags::ServerTimeTag;
//! use slirc_clientproto::{Event, Hooks, Message, Recipient};
//!
//! struct Client {
//!     nick: String,
//!     caps: CapSet,
//!     serializer: RfcSerializer,
//! }
//!
//! impl Recipient for Client {
//!     fn nick(&self) -> Option<&str> {
//!         Some(&self.nick)
//!     }
//!     fn has_cap(&self, cap: &Capability) -> bool {
//!         self.caps.contains(cap)
//!     }
//!     fn serializer(&self) -> &dyn Serializer {
//!         &self.serializer
//!     }
//! }
//!
//! let mut hooks = Hooks::new();
//! hooks.add_tag_provider(ServerTimeTag::with_clock(|| "2024-01-01T00:00:00.000Z".into()));
//!
//! let clients = [
//!     Client { nick: "old".into(), caps: CapSet::new(), serializer: RfcSerializer::default() },
//!     Client {
//!         nick: "new".into(),
//!         caps: CapSet::parse("server-time"),
//!         serializer: RfcSerializer::default(),
//!     },
//! ];
//!
//! let mut event = Event::single("PRIVMSG", Message::privmsg("n!u@h", "#rust", "hi"));
//! let mut out = Vec::new();
//! deliver(&mut event, &clients, &hooks, |c, line| out.push((c.nick.clone(), line)));
//!
//! assert_eq!(&out[0].1[..], b":n!u@h PRIVMSG #rust :hi\r\n");
//! assert_eq!(
//!     &out[1].1[..],
//!     b"@time=2024-01-01T00:00:00.000Z :n!u@h PRIVMSG #rust :hi\r\n"
//! );
//! ```

pub mod caps;
#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub mod codec;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod hooks;
pub mod ircv3;
pub mod message;
pub mod mode;
pub mod recipient;
pub mod serialize;
pub mod tags;
pub mod util;

pub use self::caps::{CapSet, Capability};
#[cfg(feature = "tokio")]
pub use self::codec::LineCodec;
pub use self::dispatch::{deliver, DeliveryReport};
pub use self::error::{ModeParseError, ProtocolError, SerializeError, TagError};
pub use self::event::Event;
pub use self::hooks::{EventListener, Hooks, Verdict};
pub use self::ircv3::{format_server_time, format_timestamp_millis, generate_msgid};
pub use self::message::{codes, Message, MessageList, Numeric, SerializeKey};
pub use self::mode::{
    encode_mode_text, mode_params, split_mode_changes, ModeChange, ModeChangeList, ModeLimits,
    ModeLine,
};
pub use self::recipient::Recipient;
pub use self::serialize::{RfcConfig, RfcSerializer, Serializer, SerializerId};
pub use self::tags::{escape_tag_value, ProviderId, Tag, TagProvider, TagSelection, TagStore};
