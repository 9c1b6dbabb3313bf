//! Numeric replies.
//!
//! A numeric is addressed to one client: its first parameter is that
//! client's nickname, or `*` while the connection has not completed nick
//! registration. That placeholder is what lets error replies reach
//! connections that do not have a nickname yet.

use std::rc::Rc;

use crate::recipient::Recipient;

use super::Message;

/// Well-known numeric codes.
#[allow(missing_docs)]
pub mod codes {
    pub const RPL_WELCOME: u16 = 1;
    pub const RPL_YOURHOST: u16 = 2;
    pub const RPL_CREATED: u16 = 3;
    pub const RPL_MYINFO: u16 = 4;
    pub const RPL_ISUPPORT: u16 = 5;
    pub const RPL_UMODEIS: u16 = 221;
    pub const RPL_CHANNELMODEIS: u16 = 324;
    pub const RPL_NOTOPIC: u16 = 331;
    pub const RPL_TOPIC: u16 = 332;
    pub const RPL_INVITING: u16 = 341;
    pub const RPL_NAMREPLY: u16 = 353;
    pub const RPL_ENDOFNAMES: u16 = 366;
    pub const RPL_BANLIST: u16 = 367;
    pub const RPL_ENDOFBANLIST: u16 = 368;
    pub const ERR_NOSUCHNICK: u16 = 401;
    pub const ERR_NOSUCHCHANNEL: u16 = 403;
    pub const ERR_CANNOTSENDTOCHAN: u16 = 404;
    pub const ERR_UNKNOWNCOMMAND: u16 = 421;
    pub const ERR_ERRONEUSNICKNAME: u16 = 432;
    pub const ERR_NICKNAMEINUSE: u16 = 433;
    pub const ERR_NOTONCHANNEL: u16 = 442;
    pub const ERR_NOTREGISTERED: u16 = 451;
    pub const ERR_NEEDMOREPARAMS: u16 = 461;
    pub const ERR_CHANOPRIVSNEEDED: u16 = 482;
}

/// A numeric reply before it is addressed to a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Numeric {
    code: u16,
    params: Vec<Rc<str>>,
    source: Option<Rc<str>>,
}

impl Numeric {
    /// Create a numeric with no parameters.
    pub fn new(code: u16) -> Self {
        Numeric {
            code,
            params: Vec::new(),
            source: None,
        }
    }

    /// Append a parameter (after the implicit target).
    pub fn push(&mut self, param: impl Into<Rc<str>>) -> &mut Self {
        self.params.push(param.into());
        self
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with_param(mut self, param: impl Into<Rc<str>>) -> Self {
        self.push(param);
        self
    }

    /// Send from `source` instead of the local server name.
    #[must_use]
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(Rc::from(source));
        self
    }

    /// Numeric code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Parameters, not including the target.
    pub fn params(&self) -> &[Rc<str>] {
        &self.params
    }

    /// Overridden source, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl Message {
    /// Address `numeric` to `recipient`, sent from `server` unless the
    /// numeric overrides its source.
    pub fn numeric<R: Recipient + ?Sized>(
        server: &str,
        numeric: &Numeric,
        recipient: &R,
    ) -> Message {
        let source = numeric.source().unwrap_or(server);
        let mut msg = Message::new(format!("{:03}", numeric.code()), Some(source));
        msg.push_param(recipient.nick().unwrap_or("*"));
        for p in numeric.params() {
            msg.push_param(p.clone());
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::Capability;
    use crate::serialize::{RfcSerializer, Serializer};

    struct Conn {
        nick: Option<&'static str>,
        serializer: RfcSerializer,
    }

    impl Recipient for Conn {
        fn nick(&self) -> Option<&str> {
            self.nick
        }

        fn has_cap(&self, _cap: &Capability) -> bool {
            false
        }

        fn serializer(&self) -> &dyn Serializer {
            &self.serializer
        }
    }

    fn conn(nick: Option<&'static str>) -> Conn {
        Conn {
            nick,
            serializer: RfcSerializer::default(),
        }
    }

    #[test]
    fn test_code_is_zero_padded() {
        let msg = Message::numeric("irc.example.net", &Numeric::new(5), &conn(Some("alice")));
        assert_eq!(msg.command(), "005");
        let msg = Message::numeric("irc.example.net", &Numeric::new(999), &conn(Some("alice")));
        assert_eq!(msg.command(), "999");
        let welcome = Numeric::new(codes::RPL_WELCOME);
        let msg = Message::numeric("irc.example.net", &welcome, &conn(None));
        assert_eq!(msg.command(), "001");
    }

    #[test]
    fn test_target_is_nick_or_placeholder() {
        let num = Numeric::new(codes::ERR_NOTREGISTERED).with_param("You have not registered");

        let msg = Message::numeric("irc.example.net", &num, &conn(None));
        assert_eq!(&*msg.params()[0], "*");

        let msg = Message::numeric("irc.example.net", &num, &conn(Some("alice")));
        assert_eq!(&*msg.params()[0], "alice");
        assert_eq!(&*msg.params()[1], "You have not registered");
        assert_eq!(msg.source(), Some("irc.example.net"));
    }

    #[test]
    fn test_source_override() {
        let num = Numeric::new(codes::RPL_TOPIC)
            .with_param("#chan")
            .with_param("hello")
            .with_source("remote.example.net");
        let msg = Message::numeric("irc.example.net", &num, &conn(Some("bob")));
        assert_eq!(msg.source(), Some("remote.example.net"));
        assert_eq!(msg.params().len(), 3);
    }
}
