//! Embedding similarity scoring

mod cache;
mod embedding;

pub use cache::{Aggregation, SimilarityCache, SimilarityMatrix};
pub use embedding::{Embedder, EmbeddingError, EmbeddingTable, cosine_similarity};
