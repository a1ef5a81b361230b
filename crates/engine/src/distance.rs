//! Similarity functions for exact vector search
//!
//! All scores are "higher = more similar". L2 distance is mapped through
//! `1 / (1 + d)` so every metric ranks the same way. Vectors are used as-is,
//! with no implicit normalization.

use zvec_core::MetricType;

/// Compute the similarity score between two vectors of equal length
///
/// `MetricType::Undefined` scores as L2.
pub fn compute_similarity(a: &[f32], b: &[f32], metric: MetricType) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "dimension mismatch in similarity");

    match metric {
        MetricType::Cosine => cosine_similarity(a, b),
        MetricType::Ip => dot_product(a, b),
        MetricType::L2 | MetricType::Undefined => euclidean_similarity(a, b),
    }
}

/// dot(a,b) / (||a|| * ||b||), 0.0 when either norm is zero
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot = dot_product(a, b);
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn euclidean_similarity(a: &[f32], b: &[f32]) -> f32 {
    1.0 / (1.0 + euclidean_distance(a, b))
}

fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}
