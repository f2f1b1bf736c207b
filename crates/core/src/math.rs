//! Vector math shared by the scoring code.
//!
//! Zero-magnitude inputs never divide: any similarity involving a zero
//! vector is reported as `0.0`.

/// Dot product of two equal-length slices.
///
/// Returns `None` when the lengths differ.
pub fn dot_product(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }
    Some(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Euclidean (L2) magnitude of a vector
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity from a precomputed dot product and magnitudes.
///
/// The result is clamped to `[-1.0, 1.0]` to absorb rounding, and a negative
/// zero is folded into `0.0` so equal scores compare equal under a total order.
pub fn cosine_from_parts(dot: f32, norm_a: f32, norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    if similarity == 0.0 {
        0.0
    } else {
        similarity
    }
}

/// Cosine similarity of two equal-length slices.
///
/// Returns `None` when the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    let dot = dot_product(a, b)?;
    Some(cosine_from_parts(dot, l2_norm(a), l2_norm(b)))
}
