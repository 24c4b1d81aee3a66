//! Uniform sampling without replacement.
//!
//! Used for proxy answer selection and for picking which parent nameserver
//! to ask during a delegation walk. The returned order is random on every
//! call; simple clients take the first answer, so order spreads their load.

use fastrand::Rng;

/// `k` distinct indices from `0..n` in random order.
///
/// Every k-subset is equally likely and so is every ordering of it.
/// `k` is clamped to `n`.
pub fn sample(n: usize, k: usize) -> Vec<usize> {
    sample_with(&mut Rng::new(), n, k)
}

/// [`sample`] driven by a caller-supplied generator.
pub fn sample_with(rng: &mut Rng, n: usize, k: usize) -> Vec<usize> {
    let k = k.min(n);
    let mut indices: Vec<usize> = (0..n).collect();

    // Partial Fisher-Yates: positions 0..k end up holding a uniform k-permutation.
    for i in 0..k {
        let j = rng.usize(i..n);
        indices.swap(i, j);
    }

    indices.truncate(k);
    indices
}

/// One element chosen uniformly, or `None` for an empty slice.
pub fn pick_one<T>(items: &[T]) -> Option<&T> {
    sample(items.len(), 1).first().map(|&i| &items[i])
}
