//! Varuna RAG — bounded-size context serialization.
//!
//! Formats top-ranked search results and their immediate relationships
//! into a token-budgeted text block that grounds an external text
//! generator in verified facts.

pub mod context;

pub use context::{estimate_tokens, ContextBuilder, RagContext, SAFETY_FOOTER};
