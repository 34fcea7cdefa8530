//! Responses a proxy can send without contacting a backend.
//!
//! Each variant builds ready-to-write bytes from its own fields, the
//! connection's negotiated [`CapabilityInfo`] and the [`EncoderConfig`].
//! Nothing is shared between builds: every call starts its own packet
//! sequence, so responses can be built on any thread.

pub mod column;
pub mod error;
pub mod ok;
pub mod replace;
pub mod rows;

pub use column::column_definition;
pub use error::ErrorResponse;
pub use ok::OkResponse;
pub use replace::QueryReplacementResponse;
pub use rows::{KeyValue, KeyValueRowsResponse};

use shimwire_core::Result;

use crate::capability::CapabilityInfo;
use crate::config::EncoderConfig;
use crate::protocol::EOF_MARKER;

/// End-of-metadata and end-of-rows marker for clients that still expect
/// EOF packets.
pub const LEGACY_EOF: [u8; 7] = [EOF_MARKER, 0x00, 0x00, 0x22, 0x00, 0x00, 0x00];

/// End-of-rows marker under `CLIENT_DEPRECATE_EOF`, also the payload of
/// the standalone acknowledgement.
pub const DEPRECATE_EOF_OK: [u8; 5] = [EOF_MARKER, 0x00, 0x00, 0x22, 0x00];

/// A synthesized reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomResponse {
    Error(ErrorResponse),
    Rows(KeyValueRowsResponse),
    Ok(OkResponse),
    ReplaceQuery(QueryReplacementResponse),
}

impl CustomResponse {
    /// An ERR packet with `message` and `code`.
    pub fn error(message: impl Into<String>, code: u16) -> Self {
        CustomResponse::Error(ErrorResponse::new(message, code))
    }

    /// A key/value result set.
    pub fn rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<KeyValue>,
    {
        CustomResponse::Rows(KeyValueRowsResponse::new(rows))
    }

    /// A bare acknowledgement.
    pub fn ok() -> Self {
        CustomResponse::Ok(OkResponse)
    }

    /// A rewrite of `original_request` carrying `query`.
    pub fn replace_query(
        query: impl Into<String>,
        original_request: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        QueryReplacementResponse::new(query, original_request).map(CustomResponse::ReplaceQuery)
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CustomResponse::Error(_) => "error",
            CustomResponse::Rows(_) => "rows",
            CustomResponse::Ok(_) => "ok",
            CustomResponse::ReplaceQuery(_) => "replace_query",
        }
    }

    /// Is this response an error reported to the client?
    pub fn is_error(&self) -> bool {
        matches!(self, CustomResponse::Error(_))
    }

    /// The error carried by this response, if any.
    pub fn as_error(&self) -> Option<&ErrorResponse> {
        match self {
            CustomResponse::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Is this a rewritten request for the backend rather than a reply
    /// for the client?
    pub fn is_request(&self) -> bool {
        matches!(self, CustomResponse::ReplaceQuery(_))
    }

    /// Build the bytes to write.
    #[tracing::instrument(level = "trace", skip_all, fields(kind = self.kind()))]
    pub fn packet(&self, caps: &CapabilityInfo, config: &EncoderConfig) -> Result<Vec<u8>> {
        let bytes = match self {
            CustomResponse::Error(err) => err.packet(config)?,
            CustomResponse::Rows(rows) => rows.packet(caps, config)?,
            CustomResponse::Ok(ok) => ok.packet(),
            CustomResponse::ReplaceQuery(replace) => replace.packet(config)?,
        };
        tracing::trace!(len = bytes.len(), "Built custom response");
        Ok(bytes)
    }
}

impl From<ErrorResponse> for CustomResponse {
    fn from(err: ErrorResponse) -> Self {
        CustomResponse::Error(err)
    }
}

impl From<KeyValueRowsResponse> for CustomResponse {
    fn from(rows: KeyValueRowsResponse) -> Self {
        CustomResponse::Rows(rows)
    }
}

impl From<QueryReplacementResponse> for CustomResponse {
    fn from(replace: QueryReplacementResponse) -> Self {
        CustomResponse::ReplaceQuery(replace)
    }
}
