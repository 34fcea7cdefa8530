//! Error types for shimwire operations.

use std::fmt;

/// The primary error type for all shimwire operations.
#[derive(Debug)]
pub enum Error {
    /// Protocol errors (wire-level limits, malformed input bytes)
    Protocol(ProtocolError),
    /// Configuration errors
    Config(ConfigError),
    /// Custom error with message
    Custom(String),
}

#[derive(Debug)]
pub struct ProtocolError {
    pub kind: ProtocolErrorKind,
    pub message: String,
    pub raw_data: Option<Vec<u8>>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolErrorKind {
    /// A value does not fit the field reserved for it on the wire
    LengthOverflow,
    /// Input bytes are too short or otherwise not a valid packet
    Malformed,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProtocolError {
    /// Create a length overflow error.
    pub fn length_overflow(message: impl Into<String>) -> Self {
        Self {
            kind: ProtocolErrorKind::LengthOverflow,
            message: message.into(),
            raw_data: None,
            source: None,
        }
    }

    /// Create a malformed-input error, keeping the offending bytes.
    pub fn malformed(message: impl Into<String>, raw_data: &[u8]) -> Self {
        Self {
            kind: ProtocolErrorKind::Malformed,
            message: message.into(),
            raw_data: Some(raw_data.to_vec()),
            source: None,
        }
    }
}

impl ConfigError {
    /// Create a configuration error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl Error {
    /// Was the encoder configured with values it cannot encode?
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Did a value exceed a wire-level length limit?
    pub fn is_length_overflow(&self) -> bool {
        matches!(
            self,
            Error::Protocol(ProtocolError {
                kind: ProtocolErrorKind::LengthOverflow,
                ..
            })
        )
    }

    /// Was the input not a well-formed packet?
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::Protocol(ProtocolError {
                kind: ProtocolErrorKind::Malformed,
                ..
            })
        )
    }

    /// Raw bytes attached to a protocol error, if any.
    pub fn raw_data(&self) -> Option<&[u8]> {
        match self {
            Error::Protocol(p) => p.raw_data.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Protocol(e) => write!(f, "Protocol error: {}", e.message),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Protocol(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Custom(_) => None,
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ProtocolError> for Error {
    fn from(err: ProtocolError) -> Self {
        Error::Protocol(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Result type alias for shimwire operations.
pub type Result<T> = std::result::Result<T, Error>;
