//! MySQL packet writing utilities.
//!
//! This module provides the payload writer used by the response builders
//! and the per-response sequence counter that frames payloads into packets.

#![allow(clippy::cast_possible_truncation)]

use shimwire_core::{ProtocolError, Result};

use crate::protocol::{MAX_SHORT_LENENC_LEN, PacketHeader};

/// A writer for MySQL protocol data.
#[derive(Debug, Default)]
pub struct PacketWriter {
    buffer: Vec<u8>,
}

impl PacketWriter {
    /// Create a new writer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create a new writer with specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get the buffer as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Write a u16 (little-endian).
    pub fn write_u16_le(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a u32 (little-endian).
    pub fn write_u32_le(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a string with the short length prefix used by synthesized
    /// result sets.
    ///
    /// - up to 251 bytes: one length byte
    /// - longer: `0xFC` followed by the low two bytes of the length
    ///
    /// Strings longer than 65535 bytes cannot be described by this form.
    /// Their length silently wraps to its low 16 bits and the client will
    /// misread the packet; use [`Self::try_write_short_lenenc_string`] to
    /// reject them instead.
    pub fn write_short_lenenc_string(&mut self, s: &str) {
        let len = s.len();
        if len <= 251 {
            self.write_u8(len as u8);
        } else {
            if len > MAX_SHORT_LENENC_LEN {
                tracing::warn!(len, "length-encoded string exceeds 65535 bytes, length wraps");
            }
            self.write_u8(0xFC);
            self.write_u16_le(len as u16);
        }
        self.buffer.extend_from_slice(s.as_bytes());
    }

    /// Like [`Self::write_short_lenenc_string`], but fails instead of
    /// wrapping when the string is longer than 65535 bytes.
    ///
    /// Nothing is written on failure.
    pub fn try_write_short_lenenc_string(&mut self, s: &str) -> Result<()> {
        if s.len() > MAX_SHORT_LENENC_LEN {
            return Err(ProtocolError::length_overflow(format!(
                "string of {} bytes does not fit a 2-byte length prefix (max {})",
                s.len(),
                MAX_SHORT_LENENC_LEN
            ))
            .into());
        }
        self.write_short_lenenc_string(s);
        Ok(())
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }
}

/// Sequence counter for the packets of one response.
///
/// Starts at 0; each framed packet takes the next id, so the first packet
/// of a response carries sequence 1. Ids wrap after 255.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PacketSequence {
    counter: u8,
}

impl PacketSequence {
    /// Create a counter at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the counter so the next packet is sequence 1 again.
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Sequence id of the most recently framed packet (0 if none).
    pub fn current(&self) -> u8 {
        self.counter
    }

    /// Frame `payload` as the next packet and return the packet bytes.
    pub fn frame(&mut self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(PacketHeader::SIZE + payload.len());
        self.frame_into(&mut out, payload);
        out
    }

    /// Frame `payload` as the next packet, appending it to `out`.
    pub fn frame_into(&mut self, out: &mut Vec<u8>, payload: &[u8]) {
        self.counter = self.counter.wrapping_add(1);
        let header = PacketHeader {
            payload_length: payload.len() as u32,
            sequence_id: self.counter,
        };
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(payload);
    }
}
