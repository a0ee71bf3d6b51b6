//! Errors raised while loading tables or rewriting a packet.
//!
//! None of these ever ends a connection: the pipeline turns a rewrite error
//! into a dropped packet plus a diagnostic.

use mc_rewind_proto::{FieldType, ProtoError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("decode error: {0}")]
    Proto(#[from] ProtoError),

    #[error("expected a {0:?} field")]
    MissingField(FieldType),

    #[error("mapping table parse error: {0}")]
    TableFormat(#[from] serde_json::Error),

    #[error("mapping table {table}: key {key:?} is not an integer id")]
    TableKey { table: &'static str, key: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
