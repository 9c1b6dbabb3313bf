//! Fuzz target for the RFC serializer
//!
//! Builds a message from arbitrary source and parameters and renders it.
//! Rendering may fail with a typed error but must never panic, and every
//! successful line must be CRLF-terminated valid UTF-8 within the limit.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_clientproto::serialize::{RfcSerializer, Serializer};
use slirc_clientproto::{Message, TagSelection};
use std::str;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = str::from_utf8(data) else {
        return;
    };
    if input.len() > 4096 {
        return;
    }

    let mut fields = input.split('\u{1}');
    let Some(source) = fields.next() else {
        return;
    };
    let mut msg = Message::new("PRIVMSG", (!source.is_empty()).then_some(source));
    for param in fields {
        msg.push_param(param);
    }

    let serializer = RfcSerializer::default();
    if let Ok(bytes) = serializer.serialize(&msg, &TagSelection::none(&msg.tags())) {
        assert!(bytes.ends_with(b"\r\n"));
        assert!(bytes.len() <= serializer.config().max_line);
        assert!(str::from_utf8(&bytes).is_ok());
    }
});
