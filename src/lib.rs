//! Generator for 5x5 mini crosswords in which every row and every column
//! is a dictionary word.
//!
//! A [`WordTrie`] is loaded once, a seed word goes into the top row of a
//! [`Grid`], and a [`Solver`] fills the remaining rows depth first.
//!
//! ```
//! use mini_cw::{generate_puzzle, WordTrie};
//!
//! let dictionary: WordTrie = [
//!     "CLASS", "LUNCH", "INNER", "MAINE", "BREED",
//!     "CLIMB", "LUNAR", "ANNIE", "SCENE", "SHRED",
//! ]
//! .iter()
//! .collect();
//!
//! let grid = generate_puzzle("CLASS", &dictionary).unwrap();
//! assert_eq!(grid.get_column(0), "CLIMB");
//! ```

pub mod automaton;
pub mod error;
pub mod generator;
pub mod grid;
pub mod trie;

#[cfg(test)]
mod test_words;

pub use error::DictionaryError;
pub use generator::{
    generate_all_puzzles, generate_next_word_candidates, generate_puzzle,
    par_generate_all_puzzles, Legality, Parameters, Solver,
};
pub use grid::{Cell, Direction, Grid, WordPosition, GRID_SIZE};
pub use trie::{TrieStats, WordTrie};
