//! Synthesized ERR packets.

use std::fmt;

use shimwire_core::{ProtocolError, Result};

use crate::config::EncoderConfig;
use crate::protocol::{ERR_MARKER, MAX_PACKET_SIZE, PacketSequence, PacketWriter};

/// Bytes before the message in an ERR payload: marker and error code.
const ERR_PREFIX_LEN: usize = 3;

/// An error reported to the client as if the server had rejected the query.
///
/// The packet carries no SQL state, only the marker, the code and the
/// message. It is always the single packet of its response, sequence 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
}

impl ErrorResponse {
    /// Create an error response.
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Build the ERR packet.
    ///
    /// With `max_error_message_len` set, longer messages are cut on a
    /// character boundary. A payload too large for the 3-byte length field
    /// fails under [`LengthOverflow::Reject`](crate::LengthOverflow::Reject)
    /// and otherwise keeps the low 24 bits of its length.
    pub fn packet(&self, config: &EncoderConfig) -> Result<Vec<u8>> {
        let message = match config.max_error_message_len {
            Some(max) => truncate_on_char_boundary(&self.message, max),
            None => self.message.as_str(),
        };
        if message.len() < self.message.len() {
            tracing::warn!(
                code = self.code,
                original = self.message.len(),
                truncated = message.len(),
                "Truncated error message"
            );
        }

        let payload_len = message.len() + ERR_PREFIX_LEN;
        if payload_len > MAX_PACKET_SIZE {
            if config.overflow.is_reject() {
                return Err(ProtocolError::length_overflow(format!(
                    "error payload of {payload_len} bytes exceeds the maximum packet size"
                ))
                .into());
            }
            tracing::warn!(payload_len, "Error payload exceeds packet size, length wraps");
        }

        let mut writer = PacketWriter::with_capacity(payload_len);
        writer.write_u8(ERR_MARKER);
        writer.write_u16_le(self.code);
        writer.write_bytes(message.as_bytes());

        Ok(PacketSequence::new().frame(writer.as_bytes()))
    }
}

fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ErrorResponse {}

impl From<ErrorResponse> for shimwire_core::Error {
    fn from(err: ErrorResponse) -> Self {
        shimwire_core::Error::Custom(format!("MySQL error {}: {}", err.code, err.message))
    }
}
