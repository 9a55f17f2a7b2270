use crate::tokenizer::Tokenizer;
use crate::vector::SparseVector;
use crate::vocab::Vocabulary;
use crate::{DocId, Error, Result, TermId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Category or title shown to callers.
    pub label: String,
    pub text: String,
}

impl Document {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self { label: label.into(), text: text.into() }
    }
}

/// IDF weights and unit-normalized document vectors, indexed by position.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    idf: Vec<f32>,
    vectors: Vec<SparseVector>,
}

impl VectorStore {
    /// IDF weight of `id`, or 0.0 for ids outside the vocabulary.
    pub fn idf(&self, id: TermId) -> f32 { self.idf.get(id as usize).copied().unwrap_or(0.0) }

    pub fn vector(&self, doc_id: DocId) -> Option<&SparseVector> { self.vectors.get(doc_id as usize) }

    /// Document vectors in ascending document index.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &SparseVector)> + '_ {
        self.vectors.iter().enumerate().map(|(i, v)| (i as DocId, v))
    }

    pub(crate) fn vectors(&self) -> &[SparseVector] { &self.vectors }

    pub fn len(&self) -> usize { self.vectors.len() }

    pub fn is_empty(&self) -> bool { self.vectors.is_empty() }
}

/// Smoothed inverse document frequency: `ln((1 + n) / (1 + df)) + 1`.
/// Always positive, and finite when a term occurs in every document.
pub fn idf(num_docs: usize, doc_freq: u32) -> f32 {
    ((1.0 + num_docs as f32) / (1.0 + doc_freq as f32)).ln() + 1.0
}

/// Raw term counts for the terms known to `vocab`; unknown terms are ignored.
pub(crate) fn term_counts(vocab: &Vocabulary, terms: &[String]) -> Vec<(TermId, u32)> {
    let mut counts: HashMap<TermId, u32> = HashMap::new();
    for term in terms {
        if let Some(tid) = vocab.get(term) {
            *counts.entry(tid).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}

/// TF x IDF, then L2-normalized. Corpus and query vectors both go through here.
pub(crate) fn weigh(counts: Vec<(TermId, u32)>, store: &VectorStore) -> SparseVector {
    let entries = counts.into_iter().map(|(tid, tf)| (tid, tf as f32 * store.idf(tid))).collect();
    let mut vector = SparseVector::from_entries(entries);
    vector.normalize();
    vector
}

/// Immutable search index over a fixed corpus.
///
/// Owns the documents, the tokenizer policy used to build it, the vocabulary
/// and the vector store. Safe to share across threads for concurrent queries.
#[derive(Debug, Clone)]
pub struct Index {
    tokenizer: Tokenizer,
    vocabulary: Vocabulary,
    store: VectorStore,
    documents: Vec<Document>,
}

impl Index {
    /// Build the index in one pass. Document ids follow the input order.
    pub fn build(documents: Vec<Document>, tokenizer: Tokenizer) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let start = std::time::Instant::now();

        let term_seqs: Vec<Vec<String>> = documents.par_iter().map(|d| tokenizer.tokenize(&d.text)).collect();
        let vocabulary = Vocabulary::build(&term_seqs);

        let doc_counts: Vec<Vec<(TermId, u32)>> = term_seqs.iter().map(|terms| term_counts(&vocabulary, terms)).collect();
        let mut df: Vec<u32> = vec![0; vocabulary.len()];
        for counts in &doc_counts {
            for &(tid, _) in counts {
                df[tid as usize] += 1;
            }
        }

        let num_docs = documents.len();
        let mut store = VectorStore { idf: df.iter().map(|&d| idf(num_docs, d)).collect(), vectors: Vec::new() };
        let vectors: Vec<SparseVector> = doc_counts.into_iter().map(|counts| weigh(counts, &store)).collect();
        store.vectors = vectors;

        let empty_docs = store.vectors.iter().filter(|v| v.is_empty()).count();
        if empty_docs > 0 {
            tracing::warn!(empty_docs, "documents without any recognized terms");
        }
        tracing::info!(num_docs, num_terms = vocabulary.len(), took_ms = start.elapsed().as_millis() as u64, "built index");

        Ok(Self { tokenizer, vocabulary, store, documents })
    }

    pub fn tokenizer(&self) -> &Tokenizer { &self.tokenizer }

    pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }

    pub fn store(&self) -> &VectorStore { &self.store }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> { self.documents.get(doc_id as usize) }

    pub fn vector(&self, doc_id: DocId) -> Option<&SparseVector> { self.store.vector(doc_id) }

    /// IDF of a normalized term, 0.0 if it is not in the vocabulary.
    pub fn idf(&self, term: &str) -> f32 {
        self.vocabulary.get(term).map(|tid| self.store.idf(tid)).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}

/// Build an index with the default tokenizer policy.
pub fn build_index(documents: Vec<Document>) -> Result<Index> {
    Index::build(documents, Tokenizer::default())
}
