//! Move encodings: turning a velocity vector into a new permutation.
//!
//! The velocity arithmetic in the update engine only produces a signal;
//! how that signal becomes a discrete move lives here, behind
//! [`MoveEncoding`], so the two can change independently.
//!
//! # Encodings
//!
//! - [`PositionalSwap`]: sequential swaps `i <-> floor(|v[i]|) mod N`
//! - [`SegmentReversal`]: sequential reversals of `[i, j]` with the same
//!   index derivation (2-opt style)

/// Derives a candidate order from the current order and velocity.
///
/// Implementations must return an order of the same length. The caller
/// validates the result with [`is_permutation`] and discards invalid
/// candidates, so a faulty encoding cannot corrupt swarm state.
pub trait MoveEncoding: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Produces the candidate order. `velocity.len() == order.len()`.
    fn derive(&self, order: &[usize], velocity: &[f64]) -> Vec<usize>;
}

/// Maps a velocity component to a position index in `0..n`.
///
/// `f64 -> usize` casts saturate, so infinite magnitudes map to
/// `usize::MAX % n` and NaN maps to 0.
///
/// # Panics
/// Panics if `n == 0`.
#[inline]
pub fn swap_index(v: f64, n: usize) -> usize {
    (v.abs().floor() as usize) % n
}

/// Swaps each slot `i` with slot `floor(|v[i]|) mod N`, in order, on a copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalSwap;

impl MoveEncoding for PositionalSwap {
    fn name(&self) -> &'static str {
        "positional-swap"
    }

    fn derive(&self, order: &[usize], velocity: &[f64]) -> Vec<usize> {
        let n = order.len();
        let mut candidate = order.to_vec();
        for (i, &v) in velocity.iter().enumerate().take(n) {
            candidate.swap(i, swap_index(v, n));
        }
        candidate
    }
}

/// Reverses the segment between slot `i` and slot `floor(|v[i]|) mod N`,
/// for each `i` in order, on a copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentReversal;

impl MoveEncoding for SegmentReversal {
    fn name(&self) -> &'static str {
        "segment-reversal"
    }

    fn derive(&self, order: &[usize], velocity: &[f64]) -> Vec<usize> {
        let n = order.len();
        let mut candidate = order.to_vec();
        for (i, &v) in velocity.iter().enumerate().take(n) {
            let j = swap_index(v, n);
            let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
            candidate[lo..=hi].reverse();
        }
        candidate
    }
}

/// Returns `true` iff `order` contains every id in `0..n` exactly once.
pub fn is_permutation(order: &[usize], n: usize) -> bool {
    if order.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &id in order {
        if id >= n || seen[id] {
            return false;
        }
        seen[id] = true;
    }
    true
}

/// Describes why `order` is not a permutation of `0..n`, if it isn't.
pub(crate) fn permutation_defect(order: &[usize], n: usize) -> Option<String> {
    if order.len() != n {
        return Some(format!("length {} != {n}", order.len()));
    }
    let mut seen = vec![false; n];
    for (pos, &id) in order.iter().enumerate() {
        if id >= n {
            return Some(format!("id {id} at position {pos} out of range"));
        }
        if seen[id] {
            return Some(format!("id {id} repeated at position {pos}"));
        }
        seen[id] = true;
    }
    None
}
