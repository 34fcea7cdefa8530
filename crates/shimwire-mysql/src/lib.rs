//! Synthesized MySQL responses for shimwire.
//!
//! A proxy in front of MySQL sometimes answers a query itself: it rejects
//! it, returns a small result set, acknowledges it, or swaps the statement
//! before forwarding. This crate builds the bytes for those cases:
//!
//! - ERR packets
//! - two-column key/value result sets
//! - a bare acknowledgement
//! - rewritten COM_QUERY requests
//!
//! # MySQL Protocol Overview
//!
//! MySQL uses a packet-based protocol with:
//! - 3-byte payload length + 1-byte sequence number header
//! - Request/response pairing via sequence numbers
//! - Result-set terminators that depend on `CLIENT_DEPRECATE_EOF`
//!
//! # Example
//!
//! ```rust,ignore
//! use shimwire_mysql::{CapabilityInfo, CustomResponse, EncoderConfig};
//!
//! let caps = CapabilityInfo::new(10, client_flags, server_flags);
//! let resp = CustomResponse::rows([("version", "1.0"), ("role", "replica")]);
//!
//! let bytes = resp.packet(&caps, &EncoderConfig::default())?;
//! socket.write_all(&bytes)?;
//! ```

pub mod capability;
pub mod config;
pub mod protocol;
pub mod response;

pub use capability::CapabilityInfo;
pub use config::{EncoderConfig, LengthOverflow};
pub use response::{
    CustomResponse, ErrorResponse, KeyValue, KeyValueRowsResponse, OkResponse,
    QueryReplacementResponse,
};
