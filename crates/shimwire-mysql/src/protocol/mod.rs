//! MySQL wire protocol primitives.
//!
//! MySQL packets have a 4-byte header:
//! - 3 bytes: payload length (little-endian)
//! - 1 byte: sequence number
//!
//! Every synthesized response is a run of such packets whose sequence
//! numbers start at 1 (the client's command was sequence 0).

pub mod reader;
pub mod writer;

pub use reader::{Packet, PacketReader, split_packets};
pub use writer::{PacketSequence, PacketWriter};

/// Maximum payload size for a single MySQL packet (2^24 - 1 bytes).
pub const MAX_PACKET_SIZE: usize = 0xFF_FF_FF;

/// Largest length the short (`0xFC` + 2 bytes) length-encoded form can carry.
pub const MAX_SHORT_LENENC_LEN: usize = 0xFFFF;

/// First payload byte of an ERR packet.
pub const ERR_MARKER: u8 = 0xFF;

/// First payload byte of an EOF packet (and of the OK packet that replaces
/// it under `CLIENT_DEPRECATE_EOF`).
pub const EOF_MARKER: u8 = 0xFE;

/// MySQL capability flags (client and server) that affect synthesized
/// responses.
pub mod capabilities {
    pub const CLIENT_PROTOCOL_41: u32 = 1 << 9;
    pub const CLIENT_TRANSACTIONS: u32 = 1 << 13;
    pub const CLIENT_DEPRECATE_EOF: u32 = 1 << 24;
}

/// MySQL character set codes.
pub mod charset {
    pub const UTF8_GENERAL_CI: u8 = 33;
}

/// Column type codes used in column definition packets.
pub mod column_type {
    pub const MYSQL_TYPE_BLOB: u8 = 0xFC;
}

/// Column definition flag bits.
pub mod column_flags {
    pub const BLOB_FLAG: u16 = 0x0010;
}

/// A MySQL packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Payload length (3 bytes, max 16MB - 1)
    pub payload_length: u32,
    /// Sequence number (wraps at 255)
    pub sequence_id: u8,
}

impl PacketHeader {
    /// Total header size in bytes.
    pub const SIZE: usize = 4;

    /// Parse a packet header from 4 bytes.
    pub fn from_bytes(bytes: &[u8; 4]) -> Self {
        let payload_length =
            u32::from(bytes[0]) | (u32::from(bytes[1]) << 8) | (u32::from(bytes[2]) << 16);
        let sequence_id = bytes[3];
        Self {
            payload_length,
            sequence_id,
        }
    }

    /// Encode the header to 4 bytes.
    ///
    /// Only the low 24 bits of `payload_length` are kept.
    pub fn to_bytes(&self) -> [u8; 4] {
        [
            (self.payload_length & 0xFF) as u8,
            ((self.payload_length >> 8) & 0xFF) as u8,
            ((self.payload_length >> 16) & 0xFF) as u8,
            self.sequence_id,
        ]
    }
}

/// Parsed Error packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrPacket {
    /// Error code
    pub error_code: u16,
    /// Error message
    pub error_message: String,
}

/// Length of the fixed-size block that follows the names in a column
/// definition (charset, length, type, flags, decimals, filler).
pub const COLUMN_FIXED_FIELDS_LEN: u8 = 0x0C;

/// A column definition (Protocol::ColumnDefinition41).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Catalog name (always "def")
    pub catalog: String,
    /// Schema (database) name
    pub schema: String,
    /// Table name (or alias)
    pub table: String,
    /// Original table name
    pub org_table: String,
    /// Column name (or alias)
    pub name: String,
    /// Original column name
    pub org_name: String,
    /// Character set number
    pub charset: u16,
    /// Maximum column length
    pub column_length: u32,
    /// Column type
    pub column_type: u8,
    /// Column flags
    pub flags: u16,
    /// Number of decimals
    pub decimals: u8,
}

/// Parsed EOF packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EofPacket {
    /// Number of warnings
    pub warnings: u16,
    /// Server status flags
    pub status_flags: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_header_roundtrip() {
        let header = PacketHeader {
            payload_length: 0x0012_3456,
            sequence_id: 7,
        };
        let bytes = header.to_bytes();
        assert_eq!(PacketHeader::from_bytes(&bytes), header);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn test_packet_header_max_size() {
        let header = PacketHeader {
            payload_length: MAX_PACKET_SIZE as u32,
            sequence_id: 255,
        };
        assert_eq!(header.to_bytes(), [0xFF, 0xFF, 0xFF, 255]);
    }
}
