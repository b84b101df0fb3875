//! Embedding generation
//!
//! The index consumes embeddings; it does not care where they come from.
//! [`Embedder`] is the seam a real model client plugs into. [`MockEmbedder`]
//! is the deterministic stand-in used for development and tests: the same
//! text always produces the same vector, and blank text maps to the zero
//! vector.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Default embedding width, matching common text-embedding models
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;

/// Embedding errors
#[derive(Error, Debug)]
pub enum EmbedError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failure reported by an embedding provider
    #[error("Provider error: {0}")]
    ProviderError(String),
}

pub type EmbedResult<T> = Result<T, EmbedError>;

/// Turns text into fixed-width vectors
pub trait Embedder {
    /// Width of every vector this embedder produces
    fn dimension(&self) -> usize;

    /// Embed one text
    fn embed(&self, text: &str) -> EmbedResult<Vec<f32>>;

    /// Embed a batch of texts; the default embeds one at a time
    fn embed_batch(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Deterministic pseudo-random embedder
///
/// The trimmed text seeds an RNG, so equal texts embed identically across
/// runs and platforms. The vectors carry no semantic signal; they exist so
/// the surrounding machinery can be exercised without a model.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    /// Create a mock embedder producing vectors of the given width
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIMENSION)
    }
}

impl Embedder for MockEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> EmbedResult<Vec<f32>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(vec![0.0; self.dimension]);
        }

        let mut hasher = FxHasher::default();
        text.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());

        Ok((0..self.dimension)
            .map(|_| rng.gen_range(-1.0f32..1.0))
            .collect())
    }
}
