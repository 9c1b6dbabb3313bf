//! Tokio framing for rendered lines.
//!
//! [`deliver`](crate::dispatch::deliver) produces finished, CRLF-terminated
//! [`Bytes`]. `LineCodec` lets those be fed straight into a
//! [`FramedWrite`](tokio_util::codec::FramedWrite) over a socket, checking
//! each frame on the way out.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Encoder;

use crate::error::{ProtocolError, Result};
use crate::util::{MAX_LINE_LEN, MAX_SERVER_TAG_DATA};

/// Longest line an [`RfcSerializer`](crate::serialize::RfcSerializer) with
/// default limits can emit: a full tag section (`@`, data, space) plus a
/// 512-byte body.
pub const DEFAULT_MAX_WIRE_LEN: usize = MAX_SERVER_TAG_DATA + 2 + MAX_LINE_LEN;

/// Encoder for pre-serialized lines.
#[derive(Clone, Copy, Debug)]
pub struct LineCodec {
    max_len: usize,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec accepting lines up to [`DEFAULT_MAX_WIRE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_WIRE_LEN)
    }

    /// Create a codec with a custom line limit (including CRLF).
    pub fn with_max_len(max_len: usize) -> Self {
        LineCodec { max_len }
    }

    /// Configured line limit.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Encoder<Bytes> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: Bytes, dst: &mut BytesMut) -> Result<()> {
        if line.len() > self.max_len {
            return Err(ProtocolError::MessageTooLong {
                actual: line.len(),
                limit: self.max_len,
            });
        }
        if !line.ends_with(b"\r\n") {
            return Err(ProtocolError::UnterminatedLine);
        }

        dst.extend_from_slice(&line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::SinkExt;
    use tokio_util::codec::FramedWrite;

    #[test]
    fn test_rejects_unterminated() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        let err = codec
            .encode(Bytes::from_static(b"PING x"), &mut buf)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::UnterminatedLine));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_rejects_oversized() {
        let mut codec = LineCodec::with_max_len(8);
        let mut buf = BytesMut::new();
        let err = codec
            .encode(Bytes::from_static(b"PING long\r\n"), &mut buf)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::MessageTooLong { actual: 11, limit: 8 }));
    }

    #[tokio::test]
    async fn test_framed_write() {
        let mut framed = FramedWrite::new(Vec::new(), LineCodec::new());
        framed.send(Bytes::from_static(b"PING a\r\n")).await.unwrap();
        framed.send(Bytes::from_static(b"PING b\r\n")).await.unwrap();
        assert_eq!(framed.get_ref().as_slice(), b"PING a\r\nPING b\r\n");
    }
}
