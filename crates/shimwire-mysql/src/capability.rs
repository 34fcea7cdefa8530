//! Negotiated capability view.
//!
//! The handshake (outside this crate) leaves each connection with the
//! flags advertised by the client and by the server. A feature is usable
//! only when both sides advertised it.

use serde::{Deserialize, Serialize};

use crate::protocol::capabilities::{CLIENT_DEPRECATE_EOF, CLIENT_TRANSACTIONS};

/// Protocol version sent by every MySQL server since 3.21.
pub const PROTOCOL_VERSION_10: u8 = 10;

/// Capability flags negotiated on one client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityInfo {
    /// Handshake protocol version
    pub protocol_version: u8,
    /// Flags from the client's HandshakeResponse41
    pub client_flags: u32,
    /// Flags from the server's HandshakeV10
    pub server_flags: u32,
}

impl Default for CapabilityInfo {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION_10,
            client_flags: 0,
            server_flags: 0,
        }
    }
}

impl CapabilityInfo {
    /// Create a capability record from both sides' flags.
    pub const fn new(protocol_version: u8, client_flags: u32, server_flags: u32) -> Self {
        Self {
            protocol_version,
            client_flags,
            server_flags,
        }
    }

    /// Check whether `flag` was advertised by both client and server.
    pub const fn both_support(&self, flag: u32) -> bool {
        (self.client_flags & flag) != 0 && (self.server_flags & flag) != 0
    }

    /// Result sets end with an OK marker instead of EOF packets.
    pub const fn supports_deprecate_eof(&self) -> bool {
        self.both_support(CLIENT_DEPRECATE_EOF)
    }

    /// Both sides understand transaction status flags.
    ///
    /// Older proxy encoders tested `CLIENT_DEPRECATE_EOF` here, which made
    /// this an alias of [`Self::supports_deprecate_eof`]. This checks
    /// `CLIENT_TRANSACTIONS`.
    pub const fn supports_transactions(&self) -> bool {
        self.both_support(CLIENT_TRANSACTIONS)
    }
}
