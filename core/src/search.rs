use crate::index::{term_counts, weigh, Document, Index};
use crate::rank::{rank, rank_parallel, ScoredDoc};
use crate::vector::SparseVector;
use crate::DocId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    pub doc_id: DocId,
    pub label: &'a str,
    pub text: &'a str,
    pub score: f32,
}

impl Index {
    /// Weight a query with the stored IDF table. Terms outside the vocabulary
    /// are ignored; the vocabulary is never extended.
    pub fn query_vector(&self, query: &str) -> SparseVector {
        let terms = self.tokenizer().tokenize(query);
        weigh(term_counts(self.vocabulary(), &terms), self.store())
    }

    /// Top `n` documents for `query`, best first. Always succeeds.
    pub fn search(&self, query: &str, n: usize) -> Vec<SearchHit<'_>> {
        let start = std::time::Instant::now();
        let q = self.query_vector(query);
        let hits = self.resolve(rank(&q, self.store(), n));
        tracing::debug!(query_terms = q.len(), n, hits = hits.len(), took_us = start.elapsed().as_micros() as u64, "search");
        hits
    }

    /// [`Index::search`] with a parallel similarity scan; returns identical results.
    pub fn search_parallel(&self, query: &str, n: usize) -> Vec<SearchHit<'_>> {
        let start = std::time::Instant::now();
        let q = self.query_vector(query);
        let hits = self.resolve(rank_parallel(&q, self.store(), n));
        tracing::debug!(query_terms = q.len(), n, hits = hits.len(), took_us = start.elapsed().as_micros() as u64, "parallel search");
        hits
    }

    fn resolve(&self, ranked: Vec<ScoredDoc>) -> Vec<SearchHit<'_>> {
        ranked
            .into_iter()
            .filter_map(|s| {
                let doc: &Document = self.document(s.doc_id)?;
                Some(SearchHit { doc_id: s.doc_id, label: &doc.label, text: &doc.text, score: s.score })
            })
            .collect()
    }
}

/// Free-function form of [`Index::search`].
pub fn search<'a>(index: &'a Index, query: &str, n: usize) -> Vec<SearchHit<'a>> {
    index.search(query, n)
}

#[cfg(test)]
mod tests {
    use crate::{build_index, Document};

    #[test]
    fn query_vector_ignores_unknown_terms() {
        let index = build_index(vec![Document::new("X", "hello world")]).unwrap();
        assert!(index.query_vector("zzz nonexistent").is_empty());
        let q = index.query_vector("hello zzz");
        assert_eq!(q.len(), 1);
        assert!((q.norm() - 1.0).abs() < 1e-6);
        assert_eq!(index.vocabulary().len(), 2);
    }

    #[test]
    fn hits_carry_label_and_text() {
        let index = build_index(vec![Document::new("X", "hello world"), Document::new("Y", "goodbye")]).unwrap();
        let hits = index.search("goodbye", 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc_id, 1);
        assert_eq!(hits[0].label, "Y");
        assert_eq!(hits[0].text, "goodbye");
    }
}
