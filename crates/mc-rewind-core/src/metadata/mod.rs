//! Entity metadata rewriting.

pub mod rewriter;
pub mod rules_1_14;

pub use rewriter::{ListOutcome, MetaContext, MetaFilter, MetaOutcome, MetadataRewriter};
pub use rules_1_14::metadata_rewriter_1_14;
