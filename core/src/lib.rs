pub mod corpus;
pub mod error;
pub mod index;
pub mod rank;
pub mod search;
pub mod tokenizer;
pub mod vector;
pub mod vocab;

pub type TermId = u32;
pub type DocId = u32;

pub use error::{Error, Result};
pub use index::{build_index, Document, Index, VectorStore};
pub use rank::{rank, ScoredDoc};
pub use search::{search, SearchHit};
pub use tokenizer::{Tokenizer, TokenizerConfig};
pub use vector::SparseVector;
pub use vocab::Vocabulary;
