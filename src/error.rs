use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while building a [`WordTrie`](crate::trie::WordTrie) from a word list.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The word list does not exist at the given location.
    #[error("word list not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O fault while opening or reading the word list.
    #[error("error reading word list: {0}")]
    Read(#[from] io::Error),
}
