//! Encoder configuration.
//!
//! Controls the names shown in synthesized result-set metadata and what
//! happens when a value is too long for the field the wire format gives it.

use serde::{Deserialize, Serialize};
use shimwire_core::{ConfigError, Result};

use crate::protocol::MAX_SHORT_LENENC_LEN;

/// What to do when a length does not fit its wire field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthOverflow {
    /// Keep only the low bytes of the length, as MySQL proxies
    /// traditionally do. The client will misparse the packet.
    #[default]
    Wrap,
    /// Fail the build with a protocol error.
    Reject,
}

impl LengthOverflow {
    /// Check if overflowing values should fail the build.
    pub const fn is_reject(self) -> bool {
        matches!(self, LengthOverflow::Reject)
    }
}

/// Configuration shared by all responses built for a proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Schema name reported in column definitions
    pub schema: String,
    /// Table name reported in column definitions
    pub table: String,
    /// Overflow policy for length fields
    pub overflow: LengthOverflow,
    /// Truncate error messages longer than this many bytes
    pub max_error_message_len: Option<usize>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            schema: "BC".to_string(),
            table: "CustomResponse".to_string(),
            overflow: LengthOverflow::default(),
            max_error_message_len: None,
        }
    }
}

impl EncoderConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema name.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the table name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the overflow policy.
    pub fn overflow(mut self, policy: LengthOverflow) -> Self {
        self.overflow = policy;
        self
    }

    /// Cap the byte length of error messages.
    pub fn max_error_message_len(mut self, max: usize) -> Self {
        self.max_error_message_len = Some(max);
        self
    }

    /// Check that the configured names can be written into column
    /// definitions.
    ///
    /// Under [`LengthOverflow::Reject`], a schema or table name longer than
    /// 65535 bytes can never be encoded and is reported as a configuration
    /// error. Under [`LengthOverflow::Wrap`] every name is accepted.
    pub fn validate(&self) -> Result<()> {
        if !self.overflow.is_reject() {
            return Ok(());
        }
        for (field, name) in [("schema", &self.schema), ("table", &self.table)] {
            if name.len() > MAX_SHORT_LENENC_LEN {
                return Err(ConfigError::new(format!(
                    "{field} name of {} bytes exceeds {MAX_SHORT_LENENC_LEN}",
                    name.len()
                ))
                .into());
            }
        }
        Ok(())
    }
}
