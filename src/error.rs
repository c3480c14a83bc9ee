/*!
error module defines the error types used in rov.
*/
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RovError {
    /// A prefix or ASN string could not be parsed.
    ///
    /// ## Occurs during:
    ///  - Parsing of a CIDR string on [`check`](crate::Rov::check)
    ///  - Normalization of a ROA row or JSON object during a load
    #[error("parse error: {0}")]
    ParseError(String),

    /// A ROA record is semantically invalid: its max length is shorter than
    /// its own prefix. Loaders log and skip such records instead of aborting
    /// the batch.
    #[error("rejected ROA for {prefix}: max length {max_length} shorter than prefix")]
    RejectedRecord { prefix: String, max_length: u8 },

    /// The shape of an input file could not be recognized as a JSON export
    /// or a registry CSV archive. Aborts that file's load only.
    #[error("unsupported ROA file format: {0}")]
    UnsupportedFormat(String),

    /// A general IO error triggered while reading a source file.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// Reading a local or remote source through oneio failed.
    #[error(transparent)]
    OneIoError(#[from] oneio::OneIoError),

    /// A JSON export document could not be deserialized at the document
    /// level. Individual malformed objects inside a well-formed document are
    /// skipped instead.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

impl From<ipnet::AddrParseError> for RovError {
    fn from(value: ipnet::AddrParseError) -> Self {
        RovError::ParseError(value.to_string())
    }
}
