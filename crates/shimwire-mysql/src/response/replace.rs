//! Query substitution.
//!
//! Rather than answering the client, the proxy rewrites the client's
//! request and forwards it to the backend in place of the original.

use shimwire_core::{ProtocolError, Result};

use crate::config::EncoderConfig;
use crate::protocol::PacketHeader;

/// Header plus command byte kept from the original request.
const REQUEST_PREFIX_LEN: usize = PacketHeader::SIZE + 1;

/// Largest payload the two rewritten length bytes can describe.
const MAX_REWRITTEN_PAYLOAD: usize = 0xFFFF;

/// A client request whose statement text is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReplacementResponse {
    query: String,
    original_request: Vec<u8>,
}

impl QueryReplacementResponse {
    /// Prepare a rewrite of `original_request` carrying `query`.
    ///
    /// Fails when the original request is shorter than a header plus a
    /// command byte.
    pub fn new(query: impl Into<String>, original_request: impl Into<Vec<u8>>) -> Result<Self> {
        let original_request = original_request.into();
        if original_request.len() < REQUEST_PREFIX_LEN {
            return Err(ProtocolError::malformed(
                format!(
                    "original request has {} bytes, need at least {}",
                    original_request.len(),
                    REQUEST_PREFIX_LEN
                ),
                &original_request,
            )
            .into());
        }
        Ok(Self {
            query: query.into(),
            original_request,
        })
    }

    /// The replacement statement text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The request being rewritten.
    pub fn original_request(&self) -> &[u8] {
        &self.original_request
    }

    /// Build the rewritten request.
    ///
    /// Sequence id, command byte and the third length byte are copied
    /// from the original; only the two low length bytes are recomputed.
    /// A payload of 65536 bytes or more therefore leaves a stale high
    /// length byte, which fails the build under
    /// [`LengthOverflow::Reject`](crate::LengthOverflow::Reject).
    pub fn packet(&self, config: &EncoderConfig) -> Result<Vec<u8>> {
        let mut packet = Vec::with_capacity(REQUEST_PREFIX_LEN + self.query.len());
        packet.extend_from_slice(&self.original_request[..REQUEST_PREFIX_LEN]);
        packet.extend_from_slice(self.query.as_bytes());

        let payload_len = packet.len() - PacketHeader::SIZE;
        if payload_len > MAX_REWRITTEN_PAYLOAD {
            if config.overflow.is_reject() {
                return Err(ProtocolError::length_overflow(format!(
                    "rewritten request payload of {payload_len} bytes does not fit two length bytes"
                ))
                .into());
            }
            tracing::warn!(payload_len, "Rewritten request length wraps");
        }

        let len_bytes = payload_len.to_le_bytes();
        packet[0] = len_bytes[0];
        packet[1] = len_bytes[1];

        tracing::debug!(
            command = packet[PacketHeader::SIZE],
            payload_len,
            "Rewrote client request"
        );

        Ok(packet)
    }
}
