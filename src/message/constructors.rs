//! Constructors for the message shapes a server sends to clients.
//!
//! Each constructor only decides parameter order and presence; all of them
//! produce a plain [`Message`].

use std::ops::Range;

use crate::mode::{encode_mode_text, mode_params, split_mode_changes, ModeChange, ModeLimits};

use super::Message;

impl Message {
    fn chat(command: &str, source: &str, status: Option<char>, target: &str, text: &str) -> Self {
        let mut msg = Message::new(command, Some(source));
        match status {
            Some(prefix) => msg.push_param(format!("{prefix}{target}")),
            None => msg.push_param(target),
        };
        msg.push_param(text).set_force_trailing(true);
        msg
    }

    /// `:source PRIVMSG target :text`
    #[must_use]
    pub fn privmsg(source: &str, target: &str, text: &str) -> Self {
        Self::chat("PRIVMSG", source, None, target, text)
    }

    /// `:source PRIVMSG @#chan :text`, addressed to members holding at
    /// least the rank `status` stands for.
    #[must_use]
    pub fn privmsg_status(source: &str, status: char, target: &str, text: &str) -> Self {
        Self::chat("PRIVMSG", source, Some(status), target, text)
    }

    /// `:source NOTICE target :text`
    #[must_use]
    pub fn notice(source: &str, target: &str, text: &str) -> Self {
        Self::chat("NOTICE", source, None, target, text)
    }

    /// `:source NOTICE @#chan :text`
    #[must_use]
    pub fn notice_status(source: &str, status: char, target: &str, text: &str) -> Self {
        Self::chat("NOTICE", source, Some(status), target, text)
    }

    /// `:source JOIN #chan`
    #[must_use]
    pub fn join(source: &str, channel: &str) -> Self {
        Message::new("JOIN", Some(source)).with_param(channel)
    }

    /// `:source JOIN #chan account :realname` for `extended-join` clients.
    ///
    /// A missing account is sent as `*`.
    #[must_use]
    pub fn join_extended(
        source: &str,
        channel: &str,
        account: Option<&str>,
        realname: &str,
    ) -> Self {
        let mut msg = Message::join(source, channel);
        msg.push_param(account.unwrap_or("*")).push_param(realname);
        msg.set_force_trailing(true);
        msg
    }

    /// `:source PART #chan [:reason]`; an empty reason is omitted.
    #[must_use]
    pub fn part(source: &str, channel: &str, reason: &str) -> Self {
        let mut msg = Message::new("PART", Some(source)).with_param(channel);
        if !reason.is_empty() {
            msg.push_param(reason).set_force_trailing(true);
        }
        msg
    }

    /// `:source KICK #chan nick :reason`; an empty reason becomes the
    /// kicked nickname.
    #[must_use]
    pub fn kick(source: &str, channel: &str, nick: &str, reason: &str) -> Self {
        let reason = if reason.is_empty() { nick } else { reason };
        let mut msg = Message::new("KICK", Some(source))
            .with_param(channel)
            .with_param(nick)
            .with_param(reason);
        msg.set_force_trailing(true);
        msg
    }

    /// `:source QUIT [:reason]`; an empty reason is omitted.
    #[must_use]
    pub fn quit(source: &str, reason: &str) -> Self {
        let mut msg = Message::new("QUIT", Some(source));
        if !reason.is_empty() {
            msg.push_param(reason).set_force_trailing(true);
        }
        msg
    }

    /// `:source NICK newnick`
    #[must_use]
    pub fn nick(source: &str, new_nick: &str) -> Self {
        Message::new("NICK", Some(source)).with_param(new_nick)
    }

    /// `:source TOPIC #chan :topic`
    #[must_use]
    pub fn topic(source: &str, channel: &str, topic: &str) -> Self {
        let mut msg = Message::new("TOPIC", Some(source))
            .with_param(channel)
            .with_param(topic);
        msg.set_force_trailing(true);
        msg
    }

    /// `:source INVITE nick #chan`
    #[must_use]
    pub fn invite(source: &str, nick: &str, channel: &str) -> Self {
        Message::new("INVITE", Some(source))
            .with_param(nick)
            .with_param(channel)
    }

    /// `PING token`
    #[must_use]
    pub fn ping(token: &str) -> Self {
        Message::new("PING", None).with_param(token)
    }

    /// `:server PONG server [:token]`
    #[must_use]
    pub fn pong(server: &str, token: Option<&str>) -> Self {
        let mut msg = Message::new("PONG", Some(server)).with_param(server);
        if let Some(token) = token {
            msg.push_param(token).set_force_trailing(true);
        }
        msg
    }

    /// `ERROR :text`
    #[must_use]
    pub fn error(text: &str) -> Self {
        let mut msg = Message::new("ERROR", None).with_param(text);
        msg.set_force_trailing(true);
        msg
    }

    /// One MODE line carrying as many of `changes[start..]` as fit in
    /// `max_len` bytes of mode text.
    ///
    /// Returns the line and the index of the first change it did not carry.
    pub fn mode(
        source: &str,
        target: &str,
        changes: &[ModeChange],
        start: usize,
        max_len: usize,
    ) -> (Self, usize) {
        let (letters, resume) = encode_mode_text(changes, start, max_len);
        let msg = Message::mode_line(source, target, &letters, changes, start..resume);
        (msg, resume)
    }

    /// Every MODE line needed to carry `changes` within `limits`, in order.
    pub fn mode_lines(
        source: &str,
        target: &str,
        changes: &[ModeChange],
        limits: &ModeLimits,
    ) -> Vec<Self> {
        split_mode_changes(changes, limits)
            .into_iter()
            .map(|line| Message::mode_line(source, target, &line.letters, changes, line.range))
            .collect()
    }

    /// A MODE line from already encoded letters and the range of changes
    /// they describe.
    pub(crate) fn mode_line(
        source: &str,
        target: &str,
        letters: &str,
        changes: &[ModeChange],
        range: Range<usize>,
    ) -> Self {
        let mut msg = Message::new("MODE", Some(source))
            .with_param(target)
            .with_param(letters);
        for param in mode_params(&changes[range]) {
            msg.push_param(param);
        }
        msg
    }
}
