//! Similarity computation and top-K ranking.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0. The full formula (dot product over
/// the product of norms) is used even though cached vectors are already
/// unit-normalized, so un-normalized inputs don't silently bias scores.
/// Zero-magnitude vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

/// A ranked similarity match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    /// Id of the matched document.
    pub id: String,

    /// Cosine similarity against the query.
    pub score: f32,
}

/// Rank candidates against a query vector and keep the top K.
///
/// Results come back in non-increasing score order; exact ties keep the
/// candidates' input order (the sort is stable). The returned list has
/// length `min(k, candidates.len())`.
///
/// An empty candidate set is an [`EmbeddingError::EmptyCorpus`] error, never
/// an empty success: callers must treat it as "no retrieval possible".
pub fn rank_top_k(
    query: &[f32],
    candidates: &[(String, Embedding)],
    k: usize,
) -> Result<Vec<RankedResult>> {
    if candidates.is_empty() {
        return Err(EmbeddingError::EmptyCorpus);
    }

    let mut scored: Vec<(OrderedFloat<f32>, &str)> = Vec::with_capacity(candidates.len());
    for (id, embedding) in candidates {
        let score = cosine_similarity(query, embedding)?;
        scored.push((OrderedFloat(score), id.as_str()));
    }

    // Stable descending sort: ties keep corpus enumeration order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(scored
        .into_iter()
        .take(k)
        .map(|(score, id)| RankedResult {
            id: id.to_string(),
            score: score.0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn candidates(pairs: &[(&str, &[f32])]) -> Vec<(String, Embedding)> {
        pairs
            .iter()
            .map(|(id, v)| (id.to_string(), v.to_vec()))
            .collect()
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_unnormalized_inputs() {
        // Same direction, different magnitudes: still 1.0.
        let sim = cosine_similarity(&[2.0, 0.0], &[5.0, 0.0]).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap();
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        assert!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_rank_orders_descending() {
        let candidates = candidates(&[
            ("far", &[0.0, 1.0, 0.0]),
            ("near", &[1.0, 0.0, 0.0]),
            ("mid", &[0.7, 0.7, 0.0]),
        ]);

        let results = rank_top_k(&[1.0, 0.0, 0.0], &candidates, 3).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_rank_truncates_to_k() {
        let candidates = candidates(&[
            ("a", &[1.0, 0.0]),
            ("b", &[0.9, 0.1]),
            ("c", &[0.0, 1.0]),
        ]);

        let results = rank_top_k(&[1.0, 0.0], &candidates, 2).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_rank_k_larger_than_corpus_returns_all_once() {
        let candidates = candidates(&[("a", &[1.0, 0.0]), ("b", &[0.0, 1.0])]);

        let results = rank_top_k(&[1.0, 1.0], &candidates, 10).unwrap();
        let mut ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        // "second" and "first" score identically against the query.
        let candidates = candidates(&[
            ("first", &[1.0, 0.0]),
            ("second", &[1.0, 0.0]),
            ("third", &[0.0, 1.0]),
        ]);

        let results = rank_top_k(&[1.0, 0.0], &candidates, 3).unwrap();
        assert_eq!(results[0].id, "first");
        assert_eq!(results[1].id, "second");
    }

    #[test]
    fn test_rank_empty_candidates_is_an_error() {
        let err = rank_top_k(&[1.0, 0.0], &[], 3).unwrap_err();
        assert!(matches!(err, EmbeddingError::EmptyCorpus));
    }
}
