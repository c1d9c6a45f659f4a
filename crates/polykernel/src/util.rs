//! Small utilities: combinations and tolerant point dedup.

use std::collections::VecDeque;

use crate::cfg::GeomCfg;
use crate::linalg::Vector;
use crate::numeric::Field;

/// k-combinations of items (lexicographic in positions).
pub(crate) fn combinations<T: Copy>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k > n || k == 0 {
        return Vec::new();
    }
    let mut idxs: Vec<usize> = (0..k).collect();
    let mut out = Vec::new();
    loop {
        out.push(idxs.iter().map(|&i| items[i]).collect());
        // Rightmost position that can still advance.
        let Some(i) = (0..k).rev().find(|&i| idxs[i] != i + n - k) else {
            break;
        };
        idxs[i] += 1;
        for j in i + 1..k {
            idxs[j] = idxs[j - 1] + 1;
        }
    }
    out
}

/// Indices of pairwise tolerance-distinct representatives of `points`.
///
/// Points are visited in exact lexicographic order and each is compared only
/// with already kept points whose first coordinate is within `eps`; the first
/// visited point of a cluster survives. Output is sorted by index.
///
/// Tolerant equality is not transitive: a chain `a ≈ b ≈ c` with `a ≉ c` keeps
/// `a` and `c`. No coordinate hashing is involved, so the result does not
/// depend on where the points fall relative to a grid.
pub(crate) fn dedup_indices<T: Field>(points: &[Vector<T>], cfg: &GeomCfg<T>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| points[a].lex_cmp_exact(&points[b]));
    let mut window: VecDeque<usize> = VecDeque::new();
    let mut kept = Vec::with_capacity(points.len());
    for i in order {
        let p = &points[i];
        if p.dim() > 0 {
            while let Some(&front) = window.front() {
                if cfg.lt(&points[front][0], &p[0]) {
                    window.pop_front();
                } else {
                    break;
                }
            }
        }
        if window.iter().any(|&j| cfg.eq_vec(&points[j], p)) {
            continue;
        }
        window.push_back(i);
        kept.push(i);
    }
    kept.sort_unstable();
    kept
}

/// Whether every element of sorted `a` occurs in sorted `b`.
pub(crate) fn is_sorted_subset(a: &[usize], b: &[usize]) -> bool {
    let mut it = b.iter();
    a.iter().all(|x| it.any(|y| y == x))
}
