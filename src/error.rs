use thiserror::Error;

/// Failures surfaced by the course retrieval pipeline.
///
/// `StoreUnavailable` and `EmbeddingUnavailable` sit on the mandatory path and
/// reach the caller. `Generation` is only ever produced by the summarization
/// adapter and is replaced with fallback text before a response is built.
#[derive(Debug, Error)]
pub enum CourseError {
    /// The backing course store could not be read or written
    #[error("course store unavailable: {0}")]
    StoreUnavailable(String),

    /// The embedding encoder failed, timed out, or returned vectors of the wrong shape
    #[error("embedding service unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Text generation failed
    #[error("text generation failed: {0}")]
    Generation(String),
}

impl CourseError {
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(err.to_string())
    }

    pub fn embedding(err: impl std::fmt::Display) -> Self {
        Self::EmbeddingUnavailable(err.to_string())
    }

    pub fn generation(err: impl std::fmt::Display) -> Self {
        Self::Generation(err.to_string())
    }
}
