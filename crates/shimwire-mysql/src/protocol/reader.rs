//! MySQL packet reading utilities.
//!
//! A small reader for the packets this crate produces. It is used to
//! verify synthesized responses and to inspect them before they are
//! logged; it is not a general server-response decoder.

#![allow(clippy::cast_possible_truncation)]

use shimwire_core::{ProtocolError, Result};

use crate::protocol::{
    ColumnDefinition, EOF_MARKER, ERR_MARKER, EofPacket, ErrPacket, PacketHeader,
};

/// A reader for MySQL protocol data.
#[derive(Debug)]
pub struct PacketReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    /// Create a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Get remaining bytes in the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if we've reached the end of the data.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = self.data.get(self.pos)?;
        self.pos += 1;
        Some(*byte)
    }

    /// Read a u16 (little-endian).
    pub fn read_u16_le(&mut self) -> Option<u16> {
        let bytes = self.read_bytes(2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a u32 (little-endian).
    pub fn read_u32_le(&mut self) -> Option<u32> {
        let bytes = self.read_bytes(4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a length prefix in the short form the encoder writes.
    ///
    /// - 0x00-0xFB: 1-byte value
    /// - 0xFC: 2-byte value follows
    ///
    /// A length of exactly 251 is written as a bare `0xFB` byte, so it is
    /// read back as a value here rather than as the NULL marker a real
    /// server would mean by it. The 3- and 8-byte forms are never produced
    /// and are rejected.
    pub fn read_lenenc_int(&mut self) -> Option<u64> {
        let first = self.read_u8()?;
        match first {
            0x00..=0xFB => Some(u64::from(first)),
            0xFC => self.read_u16_le().map(u64::from),
            _ => None,
        }
    }

    /// Read a length-encoded string.
    pub fn read_lenenc_string(&mut self) -> Option<String> {
        let len = self.read_lenenc_int()? as usize;
        let bytes = self.read_bytes(len)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read remaining data as a string.
    pub fn read_rest_string(&mut self) -> String {
        String::from_utf8_lossy(self.read_rest()).into_owned()
    }

    /// Read a fixed number of bytes.
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.remaining() < len {
            return None;
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Some(bytes)
    }

    /// Read remaining bytes.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos.min(self.data.len())..];
        self.pos = self.data.len();
        rest
    }

    /// Read a packet header from raw bytes.
    pub fn read_packet_header(&mut self) -> Option<PacketHeader> {
        let bytes = self.read_bytes(PacketHeader::SIZE)?;
        let mut header_bytes = [0u8; 4];
        header_bytes.copy_from_slice(bytes);
        Some(PacketHeader::from_bytes(&header_bytes))
    }

    /// Parse a synthesized ERR packet from the current position.
    ///
    /// ERR packet format:
    /// - 0xFF header
    /// - error_code: 2 bytes
    /// - error_message: rest of packet
    pub fn parse_err_packet(&mut self) -> Option<ErrPacket> {
        if self.read_u8()? != ERR_MARKER {
            return None;
        }
        let error_code = self.read_u16_le()?;
        let error_message = self.read_rest_string();

        Some(ErrPacket {
            error_code,
            error_message,
        })
    }

    /// Parse a column definition packet from the current position.
    pub fn parse_column_definition(&mut self) -> Option<ColumnDefinition> {
        let catalog = self.read_lenenc_string()?;
        let schema = self.read_lenenc_string()?;
        let table = self.read_lenenc_string()?;
        let org_table = self.read_lenenc_string()?;
        let name = self.read_lenenc_string()?;
        let org_name = self.read_lenenc_string()?;

        let _fixed_len = self.read_lenenc_int()?;

        let charset = self.read_u16_le()?;
        let column_length = self.read_u32_le()?;
        let column_type = self.read_u8()?;
        let flags = self.read_u16_le()?;
        let decimals = self.read_u8()?;
        // filler
        self.read_bytes(2)?;

        Some(ColumnDefinition {
            catalog,
            schema,
            table,
            org_table,
            name,
            org_name,
            charset,
            column_length,
            column_type,
            flags,
            decimals,
        })
    }

    /// Parse an EOF packet from the current position.
    ///
    /// EOF packet format:
    /// - 0xFE header
    /// - warnings: 2 bytes
    /// - status_flags: 2 bytes
    pub fn parse_eof_packet(&mut self) -> Option<EofPacket> {
        if self.read_u8()? != EOF_MARKER {
            return None;
        }
        let warnings = self.read_u16_le()?;
        let status_flags = self.read_u16_le()?;

        Some(EofPacket {
            warnings,
            status_flags,
        })
    }
}

/// One framed packet split out of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub sequence_id: u8,
    pub payload: Vec<u8>,
}

/// Split a run of framed packets into `(sequence id, payload)` pairs.
pub fn split_packets(data: &[u8]) -> Result<Vec<Packet>> {
    let mut reader = PacketReader::new(data);
    let mut packets = Vec::new();

    while !reader.is_empty() {
        let header = reader.read_packet_header().ok_or_else(|| {
            ProtocolError::malformed(
                format!(
                    "truncated packet header: {} trailing bytes",
                    reader.remaining()
                ),
                data,
            )
        })?;
        let payload = reader
            .read_bytes(header.payload_length as usize)
            .ok_or_else(|| {
                ProtocolError::malformed(
                    format!(
                        "packet {} declares {} payload bytes, {} available",
                        header.sequence_id,
                        header.payload_length,
                        reader.remaining()
                    ),
                    data,
                )
            })?;
        packets.push(Packet {
            sequence_id: header.sequence_id,
            payload: payload.to_vec(),
        });
    }

    Ok(packets)
}
