//! Synthesized two-column key/value result sets.
//!
//! Packet order follows the text-protocol COM_QUERY response:
//!
//! 1. column count (always 2)
//! 2. column definitions for `Key` and `Value`
//! 3. EOF, unless the connection negotiated `CLIENT_DEPRECATE_EOF`
//! 4. one row packet per key/value pair
//! 5. EOF, or the shorter OK marker under `CLIENT_DEPRECATE_EOF`

use shimwire_core::Result;

use crate::capability::CapabilityInfo;
use crate::config::EncoderConfig;
use crate::protocol::{PacketSequence, PacketWriter};
use crate::response::column::{column_definition, write_lenenc};
use crate::response::{DEPRECATE_EOF_OK, LEGACY_EOF};

/// Names of the two synthesized columns.
pub const KEY_COLUMN: &str = "Key";
pub const VALUE_COLUMN: &str = "Value";

/// One row of a key/value result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for KeyValue {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// A result set with `Key` and `Value` columns; rows keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueRowsResponse {
    pub rows: Vec<KeyValue>,
}

impl KeyValueRowsResponse {
    /// Create a response from `(key, value)` pairs.
    pub fn new<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<KeyValue>,
    {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a row.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.rows.push(KeyValue::new(key, value));
    }

    /// Number of packets [`Self::packet`] emits for the given capabilities.
    pub fn packet_count(&self, caps: &CapabilityInfo) -> usize {
        let framing = if caps.supports_deprecate_eof() { 4 } else { 5 };
        framing + self.rows.len()
    }

    /// Build the full result set.
    ///
    /// Sequence ids restart at 1 on every call. The configured schema and
    /// table names are checked with [`EncoderConfig::validate`] first.
    pub fn packet(&self, caps: &CapabilityInfo, config: &EncoderConfig) -> Result<Vec<u8>> {
        config.validate()?;

        let mut seq = PacketSequence::new();
        let mut out = Vec::with_capacity(128 + 16 * self.rows.len());
        let deprecate_eof = caps.supports_deprecate_eof();

        seq.frame_into(&mut out, &[2]);

        for column in [KEY_COLUMN, VALUE_COLUMN] {
            out.extend(column_definition(
                &mut seq,
                &config.schema,
                &config.table,
                column,
                config.overflow,
            )?);
        }

        if !deprecate_eof {
            seq.frame_into(&mut out, &LEGACY_EOF);
        }

        for row in &self.rows {
            let mut writer = PacketWriter::with_capacity(6 + row.key.len() + row.value.len());
            write_lenenc(&mut writer, &row.key, config.overflow)?;
            write_lenenc(&mut writer, &row.value, config.overflow)?;
            seq.frame_into(&mut out, writer.as_bytes());
        }

        if deprecate_eof {
            seq.frame_into(&mut out, &DEPRECATE_EOF_OK);
        } else {
            seq.frame_into(&mut out, &LEGACY_EOF);
        }

        tracing::trace!(
            rows = self.rows.len(),
            packets = seq.current(),
            deprecate_eof,
            "Built key/value result set"
        );

        Ok(out)
    }
}
