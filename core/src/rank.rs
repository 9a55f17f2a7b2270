//! Similarity scoring and top-N selection.
//!
//! Scores are dot products of unit vectors (cosine similarity). Results are
//! ordered by descending score, ties broken by ascending document id, so the
//! output is fully deterministic whether the scan runs on one thread or many.

use crate::index::VectorStore;
use crate::vector::SparseVector;
use crate::DocId;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f32,
}

// Greater means better: higher score first, then lower doc id.
impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score).then_with(|| other.doc_id.cmp(&self.doc_id))
    }
}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl PartialEq for ScoredDoc {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for ScoredDoc {}

/// Keep the `n` best candidates, best first.
pub fn select_top<I>(candidates: I, n: usize) -> Vec<ScoredDoc>
where
    I: IntoIterator<Item = ScoredDoc>,
{
    if n == 0 {
        return Vec::new();
    }
    // Min-heap of size n: O(len log n)
    let mut heap: BinaryHeap<Reverse<ScoredDoc>> = BinaryHeap::new();
    for c in candidates {
        if heap.len() < n {
            heap.push(Reverse(c));
        } else if let Some(Reverse(worst)) = heap.peek() {
            if c > *worst {
                heap.pop();
                heap.push(Reverse(c));
            }
        }
    }
    let mut top: Vec<ScoredDoc> = heap.into_iter().map(|Reverse(c)| c).collect();
    top.sort_unstable_by(|a, b| b.cmp(a));
    top
}

/// Score `query` against every stored vector and return the top `n`.
///
/// `n` larger than the corpus returns every document; `n == 0` returns nothing.
/// A zero query vector scores 0 everywhere, which yields document-id order.
pub fn rank(query: &SparseVector, store: &VectorStore, n: usize) -> Vec<ScoredDoc> {
    let scores = store.iter().map(|(doc_id, v)| ScoredDoc { doc_id, score: query.dot(v) });
    select_top(scores, n)
}

/// Same results as [`rank`], with the scan spread over the rayon pool.
pub fn rank_parallel(query: &SparseVector, store: &VectorStore, n: usize) -> Vec<ScoredDoc> {
    if n == 0 {
        return Vec::new();
    }
    let scores: Vec<ScoredDoc> = store
        .vectors()
        .par_iter()
        .enumerate()
        .map(|(i, v)| ScoredDoc { doc_id: i as DocId, score: query.dot(v) })
        .collect();
    select_top(scores, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sd(doc_id: DocId, score: f32) -> ScoredDoc { ScoredDoc { doc_id, score } }

    #[test]
    fn orders_by_score_then_doc_id() {
        let top = select_top(vec![sd(0, 0.5), sd(1, 0.9), sd(2, 0.5), sd(3, 0.1)], 10);
        let ids: Vec<DocId> = top.iter().map(|c| c.doc_id).collect();
        assert_eq!(ids, vec![1, 0, 2, 3]);
    }

    #[test]
    fn truncates_to_n() {
        let top = select_top(vec![sd(0, 0.1), sd(1, 0.2), sd(2, 0.3)], 2);
        let ids: Vec<DocId> = top.iter().map(|c| c.doc_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn ties_keep_lowest_doc_ids_when_truncating() {
        let top = select_top((0..10).rev().map(|i| sd(i, 0.0)), 3);
        let ids: Vec<DocId> = top.iter().map(|c| c.doc_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn zero_n_is_empty() {
        assert!(select_top(vec![sd(0, 1.0)], 0).is_empty());
    }
}
