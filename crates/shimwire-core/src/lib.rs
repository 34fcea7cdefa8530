//! Core types for shimwire.
//!
//! This crate provides the error taxonomy shared by the wire-protocol
//! encoders:
//!
//! - `Error` with protocol and configuration variants
//! - `Result` alias used across the workspace

pub mod error;

pub use error::{ConfigError, Error, ProtocolError, ProtocolErrorKind, Result};
