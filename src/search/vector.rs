use crate::catalog::chunk::Chunk;
use crate::error::CourseError;
use crate::llm::embeddings::Encoder;

/// Flat (exhaustive) L2 index. Position `i` is the `i`-th vector added,
/// which by construction is the `i`-th chunk of the batch it was built from.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

/// A single search result: index position and Euclidean distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

impl SearchIndex {
    /// Build from precomputed vectors; every vector must have length `dim`.
    pub fn from_vectors(dim: usize, vectors: Vec<Vec<f32>>) -> Result<Self, CourseError> {
        if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
            return Err(CourseError::embedding(format!(
                "vector {i} has dimension {}, expected {dim}",
                v.len()
            )));
        }
        Ok(Self { dim, vectors })
    }

    /// Encode every chunk in one batch and index the results.
    pub async fn build(encoder: &dyn Encoder, chunks: &[Chunk]) -> Result<Self, CourseError> {
        let dim = encoder.dimension();
        if chunks.is_empty() {
            return Self::from_vectors(dim, Vec::new());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = encoder.encode(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(CourseError::embedding(format!(
                "encoder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        Self::from_vectors(dim, vectors)
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Ephemeral index over the given positions, in the order given.
    /// Position `j` of the result corresponds to `positions[j]` here.
    /// Out-of-range positions are skipped.
    pub fn subset(&self, positions: &[usize]) -> SearchIndex {
        SearchIndex {
            dim: self.dim,
            vectors: positions
                .iter()
                .filter_map(|&p| self.vectors.get(p).cloned())
                .collect(),
        }
    }

    /// Exact k-nearest search by Euclidean distance.
    ///
    /// Returns `min(k, len)` neighbors in non-decreasing distance order; ties keep
    /// insertion order. An empty index (or `k == 0`) yields no results.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, CourseError> {
        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dim {
            return Err(CourseError::embedding(format!(
                "query vector has dimension {}, index expects {}",
                query.len(),
                self.dim
            )));
        }

        let mut scored: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| Neighbor {
                position,
                distance: euclidean_distance(query, v),
            })
            .collect();

        // Stable sort: equal distances stay in index order
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k);
        Ok(scored)
    }
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
