use crate::models::TreeError;
use crate::services::ports::StoreError;
use compact_str::CompactString;

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("selection crosses incompatible structure")]
    StructuralConflict,
    #[error("no occurrence of {word:?} found")]
    NotFound { word: CompactString },
    #[error("persistence failed: {0}")]
    PersistenceFailure(#[from] StoreError),
    #[error("empty selection or word")]
    EmptyInput,
    #[error("{word:?} is already highlighted")]
    AlreadyHighlighted { word: CompactString },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl HighlightError {
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::StructuralConflict)
    }
}
