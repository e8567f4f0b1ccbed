//! Error types for pattern compilation, construction, and encode/decode.

use std::path::PathBuf;

/// Errors surfaced by this crate.
///
/// Construction-time errors abort building an [`crate::Encoding`] before any
/// state is shared with a caller; per-call errors are returned before any
/// partial output is emitted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("pattern failed to compile: {message} (source: {pattern_source})")]
    InvalidPattern {
        pattern_source: String,
        message: String,
    },

    #[error("id {id} occurs in both the rank table and the special-token table")]
    OverlappingIds { id: u32 },

    #[error("artifact at {path} parsed to zero entries")]
    EmptyModel { path: PathBuf },

    #[error("artifact at {path} is malformed: {reason}")]
    InvalidModel { path: PathBuf, reason: String },

    #[error("config at {path} is not valid JSON: {reason}")]
    InvalidJson { path: PathBuf, reason: String },

    #[error("special-token section is malformed: {reason}")]
    InvalidSpecialTokens { reason: String },

    #[error("decode input {value} is not a valid token id")]
    InvalidId { value: i64 },

    #[error("id {id} is not present in either decoder table")]
    UnknownId { id: u32 },

    #[error("no valid token sequence covers bytes at offset {offset}: {bytes:?}")]
    UnencodableBytes { offset: usize, bytes: Vec<u8> },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
