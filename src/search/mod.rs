//! Similarity search for portfolio entries
//!
//! `Collection` is the persistent index; `Embedder` turns text into the
//! vectors it ranks by.

pub mod collection;
pub mod embedding;

pub use collection::{Collection, Metadata, QueryResult};
pub use embedding::{cosine_similarity, Embedder, HarmonicEmbedder};
