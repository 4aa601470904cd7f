use std::path::PathBuf;

use matlib::SortError;
use sortio::{ReadError, WriteError};
use thiserror::Error;

/// Why a single batch item failed
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("sequence {id} is empty")]
    Empty { id: String },

    #[error("cannot infer a size label from {}", path.display())]
    Unlabeled { path: PathBuf },

    #[error("{} would overwrite the outputs of {}", path.display(), first.display())]
    DuplicateOutput { path: PathBuf, first: PathBuf },

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch aborted at {id}: {source}")]
    Aborted {
        id: String,
        #[source]
        source: ItemError,
    },
}
