use crate::TermId;
use serde::{Deserialize, Serialize};

/// Sparse weight vector keyed by [`TermId`].
///
/// Entries are kept sorted by term id and never hold a weight of exactly zero;
/// absent ids have an implicit weight of 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    pub fn new() -> Self { Self::default() }

    /// Build from `(term_id, weight)` pairs with unique ids. Zero weights are dropped.
    pub fn from_entries(mut entries: Vec<(TermId, f32)>) -> Self {
        entries.retain(|&(_, w)| w != 0.0);
        entries.sort_unstable_by_key(|&(id, _)| id);
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0), "duplicate term id");
        Self { entries }
    }

    pub fn get(&self, id: TermId) -> f32 {
        match self.entries.binary_search_by_key(&id, |&(t, _)| t) {
            Ok(pos) => self.entries[pos].1,
            Err(_) => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, f32)> + '_ { self.entries.iter().copied() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Euclidean norm.
    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt()
    }

    /// Scale to unit length. A zero vector is left untouched.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm == 0.0 { return; }
        for (_, w) in self.entries.iter_mut() {
            *w /= norm;
        }
    }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let (a, b) = (&self.entries, &other.entries);
        let mut sum = 0.0f32;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_zero_weights_and_sorts() {
        let v = SparseVector::from_entries(vec![(5, 1.0), (1, 0.0), (2, 3.0)]);
        let entries: Vec<_> = v.iter().collect();
        assert_eq!(entries, vec![(2, 3.0), (5, 1.0)]);
        assert_eq!(v.get(1), 0.0);
        assert_eq!(v.get(5), 1.0);
    }

    #[test]
    fn normalize_gives_unit_norm() {
        let mut v = SparseVector::from_entries(vec![(0, 3.0), (1, 4.0)]);
        v.normalize();
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!((v.get(0) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn normalize_skips_zero_vector() {
        let mut v = SparseVector::new();
        v.normalize();
        assert!(v.is_empty());
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn dot_only_counts_shared_ids() {
        let a = SparseVector::from_entries(vec![(0, 1.0), (2, 2.0), (7, 1.0)]);
        let b = SparseVector::from_entries(vec![(2, 0.5), (3, 9.0), (7, 4.0)]);
        assert_eq!(a.dot(&b), 5.0);
        assert_eq!(a.dot(&SparseVector::new()), 0.0);
    }
}
