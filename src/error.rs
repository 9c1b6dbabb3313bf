//! Error types for the client protocol engine.
//!
//! Only genuinely malformed input is an error here. Policy outcomes such as
//! a provider denying a tag, a listener denying an event for one recipient,
//! or a MODE line being split are normal results and never surface as
//! errors.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error from an underlying sink.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A rendered line exceeded the framing limit.
    #[error("message too long: {actual} bytes (max {limit})")]
    MessageTooLong {
        /// Length of the line.
        actual: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// A rendered line did not end with CRLF.
    #[error("line is not CRLF-terminated")]
    UnterminatedLine,

    /// A tag could not be attached to a message.
    #[error("tag error: {0}")]
    Tag(#[from] TagError),

    /// A message could not be rendered for a recipient.
    #[error("serialize error: {0}")]
    Serialize(#[from] SerializeError),

    /// Failed to parse a mode string.
    #[error("invalid mode string: {string}")]
    InvalidModeString {
        /// The raw mode string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: ModeParseError,
    },
}

/// Hard failures when attaching a tag to a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TagError {
    /// Tag names must be non-empty.
    #[error("tag name is empty")]
    EmptyName,

    /// Tag names may not contain NUL, CR, LF, space, `;` or `=`.
    #[error("invalid tag name: {0:?}")]
    InvalidName(String),

    /// A tag with this name is already present on the message.
    #[error("tag already exists: {0}")]
    Duplicate(String),

    /// The message has finished its population phase.
    #[error("message tags are frozen after population")]
    Frozen,
}

/// Failures raised by a [`Serializer`](crate::serialize::Serializer).
///
/// A failed render is never cached, so the next request for the same
/// recipient profile retries the serializer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// I/O error while writing into the output buffer.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The rendered tag section exceeded the allowed size.
    #[error("tag data too long: {len} bytes (max {max})")]
    TagsTooLong {
        /// Rendered tag section length.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A non-final parameter cannot be represented on the wire.
    #[error("invalid parameter {index}: {param:?}")]
    InvalidParameter {
        /// Position of the parameter.
        index: usize,
        /// The offending parameter.
        param: String,
    },

    /// A line delimiter or NUL appeared inside the message.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// A selected tag's name contains a tag section delimiter.
    #[error("invalid tag name: {0:?}")]
    InvalidTagName(String),

    /// Serializer-specific failure.
    #[error("{0}")]
    Custom(String),
}

/// Errors encountered when parsing mode strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModeParseError {
    /// Mode string did not start with `+` or `-`.
    #[error("missing mode modifier")]
    MissingModeModifier,

    /// A mode that takes a parameter had none left.
    #[error("mode '{0}' requires a parameter")]
    MissingParameter(char),

    /// More parameters were supplied than the modes consumed.
    #[error("unused parameters provided for mode string")]
    UnusedParameters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SerializeError::TagsTooLong { len: 5000, max: 4094 };
        assert_eq!(format!("{}", err), "tag data too long: 5000 bytes (max 4094)");

        assert_eq!(format!("{}", TagError::EmptyName), "tag name is empty");
        assert_eq!(
            format!("{}", TagError::Duplicate("time".into())),
            "tag already exists: time"
        );
        assert_eq!(
            TagError::InvalidName("a b".into()).to_string(),
            "invalid tag name: \"a b\""
        );
    }

    #[test]
    fn test_error_source_chaining() {
        let mode_err = ModeParseError::MissingParameter('o');
        let err = ProtocolError::InvalidModeString {
            string: "+o".to_string(),
            cause: mode_err.clone(),
        };

        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), mode_err.to_string());
    }

    #[test]
    fn test_framing_errors_display() {
        let err = ProtocolError::MessageTooLong { actual: 600, limit: 512 };
        assert_eq!(err.to_string(), "message too long: 600 bytes (max 512)");

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert!(matches!(ProtocolError::from(io_err), ProtocolError::Io(_)));
    }

    #[test]
    fn test_error_conversion() {
        let protocol_err: ProtocolError = TagError::Frozen.into();
        assert!(matches!(protocol_err, ProtocolError::Tag(TagError::Frozen)));

        let io_err = std::io::Error::new(std::io::ErrorKind::WriteZero, "short write");
        let ser_err: SerializeError = io_err.into();
        let protocol_err: ProtocolError = ser_err.into();
        match protocol_err {
            ProtocolError::Serialize(SerializeError::Io(_)) => {}
            _ => panic!("Expected Serialize(Io) variant"),
        }
    }
}
