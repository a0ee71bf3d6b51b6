//! Stateful 1.14 → 1.13.2 clientbound packet rewriting.
//!
//! A [`Protocol`] holds the per-packet-id remapping rules and the shared,
//! read-only mapping tables. Each connection owns one [`ConnectionContext`]
//! (entity tracker, position cache, world state) and feeds packets through
//! [`Protocol::process`] in arrival order.

pub mod context;
pub mod diagnostics;
pub mod enchantment;
pub mod entity;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod position;
pub mod protocol;
pub mod remapper;
pub mod tables;
pub mod tracker;

pub use context::{ConnectionContext, Dimension};
pub use diagnostics::{DiagnosticsSink, RecordingSink, TracingSink};
pub use error::RewriteError;
pub use pipeline::{Protocol, Unregistered};
pub use protocol::protocol_1_13_2_to_1_14;
pub use remapper::{BlockItemRemapper, TableRemapper};
pub use tables::MappingTables;
