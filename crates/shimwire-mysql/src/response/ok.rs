//! Generic acknowledgement.

use crate::protocol::PacketSequence;
use crate::response::DEPRECATE_EOF_OK;

/// A bare success reply: `05 00 00 01 FE 00 00 22 00`.
///
/// The reply is the same for every connection; it does not consult the
/// negotiated capabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OkResponse;

impl OkResponse {
    pub fn new() -> Self {
        Self
    }

    /// Build the acknowledgement packet.
    pub fn packet(&self) -> Vec<u8> {
        PacketSequence::new().frame(&DEPRECATE_EOF_OK)
    }
}
