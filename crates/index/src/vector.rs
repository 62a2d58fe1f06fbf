//! Vector math for the flat index.

use std::cmp::Ordering;

/// L2 norm, accumulated and returned in f64.
///
/// The norm of finite f32 components can exceed `f32::MAX`, so it is never
/// narrowed back to f32.
pub fn l2_norm(v: &[f32]) -> f64 {
    v.iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

/// Scale `v` to unit L2 norm in place.
///
/// A zero vector is left unchanged (treated as norm 1), so it scores 0.0
/// against everything instead of producing NaN.
pub fn normalize(v: &mut [f32]) {
    let norm = l2_norm(v);
    if norm == 0.0 {
        return;
    }
    for x in v.iter_mut() {
        *x = (f64::from(*x) / norm) as f32;
    }
}

/// Inner product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Keep the `k` best `(position, score)` pairs, best first.
///
/// Higher score wins; equal scores go to the lower position.
pub fn select_top_k(mut scored: Vec<(usize, f32)>, k: usize) -> Vec<(usize, f32)> {
    let k = k.min(scored.len());
    if k == 0 {
        return Vec::new();
    }

    if k < scored.len() {
        scored.select_nth_unstable_by(k - 1, rank);
        scored.truncate(k);
    }
    scored.sort_unstable_by(rank);
    scored
}

fn rank(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(&b.0))
}
