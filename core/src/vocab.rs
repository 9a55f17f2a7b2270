use crate::TermId;
use std::collections::HashMap;

/// Bijective term <-> id mapping. Ids are dense and assigned in first-encounter
/// order, so the same corpus in the same order always yields the same numbering.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl Vocabulary {
    /// Build from per-document term sequences, documents in ascending index.
    pub fn build<'a, I, D>(docs: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = &'a String>,
    {
        let mut vocab = Self::default();
        for terms in docs {
            for term in terms {
                vocab.intern(term);
            }
        }
        vocab
    }

    fn intern(&mut self, term: &str) -> TermId {
        if let Some(&id) = self.ids.get(term) {
            return id;
        }
        let id = self.terms.len() as TermId;
        self.ids.insert(term.to_string(), id);
        self.terms.push(term.to_string());
        id
    }

    pub fn get(&self, term: &str) -> Option<TermId> { self.ids.get(term).copied() }

    pub fn term(&self, id: TermId) -> Option<&str> { self.terms.get(id as usize).map(String::as_str) }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Terms in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, &str)> + '_ {
        self.terms.iter().enumerate().map(|(i, t)| (i as TermId, t.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seqs(docs: &[&str]) -> Vec<Vec<String>> {
        docs.iter().map(|d| d.split_whitespace().map(str::to_string).collect()).collect()
    }

    #[test]
    fn assigns_ids_in_first_encounter_order() {
        let docs = seqs(&["the cat sat", "the dog sat", "birds fly"]);
        let vocab = Vocabulary::build(&docs);
        let terms: Vec<&str> = vocab.iter().map(|(_, t)| t).collect();
        assert_eq!(terms, vec!["the", "cat", "sat", "dog", "birds", "fly"]);
        assert_eq!(vocab.get("dog"), Some(3));
        assert_eq!(vocab.term(4), Some("birds"));
        assert_eq!(vocab.get("zzz"), None);
    }

    #[test]
    fn numbering_is_deterministic() {
        let docs = seqs(&["b a c a", "d b e"]);
        let a = Vocabulary::build(&docs);
        let b = Vocabulary::build(&docs);
        let ids_a: Vec<_> = a.iter().map(|(i, t)| (i, t.to_string())).collect();
        let ids_b: Vec<_> = b.iter().map(|(i, t)| (i, t.to_string())).collect();
        assert_eq!(ids_a, ids_b);
        assert_eq!(a.len(), 5);
    }
}
