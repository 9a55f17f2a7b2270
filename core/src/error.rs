/// Failures raised while building an [`Index`](crate::Index).
///
/// Querying never fails: empty queries, unknown terms and oversized result
/// counts all produce ordinary results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No documents were supplied, so no vocabulary can be formed.
    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,
}

pub type Result<T> = std::result::Result<T, Error>;
