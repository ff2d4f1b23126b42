use std::{collections::HashSet, fmt};

use log::trace;

use crate::trie::{normalize, WordTrie};

/// Width and height of every grid.
pub const GRID_SIZE: usize = 5;
/// Rendered in place of cells without a letter.
pub const EMPTY_MARKER: char = '.';
/// Rendered (and read back in rows and columns) for blocked cells.
pub const BLOCK_MARKER: char = '#';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Across,
    Down,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Always an uppercase ASCII letter.
    Letter(u8),
    Block,
}

impl Cell {
    fn push_to(self, out: &mut String) {
        match self {
            Cell::Empty => {}
            Cell::Letter(byte) => out.push(byte as char),
            Cell::Block => out.push(BLOCK_MARKER),
        }
    }

    fn display_char(self) -> char {
        match self {
            Cell::Empty => EMPTY_MARKER,
            Cell::Letter(byte) => byte as char,
            Cell::Block => BLOCK_MARKER,
        }
    }
}

/// A run of at least two consecutive letters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordPosition {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub word: String,
}

/// A 5x5 letter grid filled one row at a time, top to bottom.
///
/// Grids are plain `Copy` values: every search branch forks its parent by
/// copying it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Grid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `words` into consecutive rows starting at row 0.
    pub fn from_rows<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut grid = Self::new();
        for (row, word) in words.into_iter().take(GRID_SIZE).enumerate() {
            grid.place_word(word.as_ref(), row);
        }
        grid
    }

    /// The cell at `(row, col)`; anything outside the grid reads as empty.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or_default()
    }

    /// Writes an uppercased letter. Coordinates outside the grid and
    /// non-ASCII letters are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, letter: char) {
        if row < GRID_SIZE && col < GRID_SIZE && letter.is_ascii() {
            self.cells[row][col] = Cell::Letter(letter.to_ascii_uppercase() as u8);
        }
    }

    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Cell::Empty
    }

    pub fn is_block(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Cell::Block
    }

    pub fn set_block(&mut self, row: usize, col: usize) {
        if row < GRID_SIZE && col < GRID_SIZE {
            self.cells[row][col] = Cell::Block;
        }
    }

    /// Removes every letter, keeping blocked cells.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            if let Cell::Letter(_) = cell {
                *cell = Cell::Empty;
            }
        }
    }

    /// Writes the letters of `word` into `row` without any validation.
    ///
    /// Letters past the fifth are dropped; a shorter word leaves the rest of
    /// the row as it was.
    pub fn place_word(&mut self, word: &str, row: usize) {
        for (col, letter) in normalize(word).chars().take(GRID_SIZE).enumerate() {
            self.set_cell(row, col, letter);
        }
    }

    /// Letters of `row`, left to right. Empty cells contribute nothing.
    pub fn row(&self, row: usize) -> String {
        let mut out = String::with_capacity(GRID_SIZE);
        for col in 0..GRID_SIZE {
            self.cell(row, col).push_to(&mut out);
        }
        out
    }

    /// Letters of `col`, top to bottom. Empty cells contribute nothing, so
    /// while rows are filled in order this is the column's current prefix.
    pub fn get_column(&self, col: usize) -> String {
        let mut out = String::with_capacity(GRID_SIZE);
        for row in 0..GRID_SIZE {
            self.cell(row, col).push_to(&mut out);
        }
        out
    }

    /// The lowest row with no content at all, or `None` once every row has
    /// been started.
    pub fn first_empty_row(&self) -> Option<usize> {
        self.cells
            .iter()
            .position(|row| row.iter().all(|cell| *cell == Cell::Empty))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| *cell != Cell::Empty)
    }

    /// Rows made up entirely of letters.
    pub fn acrosses(&self) -> Vec<String> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cells)| cells.iter().all(|cell| matches!(cell, Cell::Letter(_))))
            .map(|(row, _)| self.row(row))
            .collect()
    }

    /// Checks whether `word` can go into `row` while keeping every column
    /// completable.
    ///
    /// For each column the existing letters plus the word's letter must
    /// prefix at least one dictionary word that is not already one of the
    /// grid's complete rows.
    ///
    /// `row` must be the grid's first empty row: the column prefixes are read
    /// from the filled rows regardless of its value, so any other row gives
    /// meaningless answers.
    pub fn can_place_word(&self, word: &str, row: usize, dictionary: &WordTrie) -> bool {
        let word = normalize(word);
        if !word.is_ascii() || word.len() < GRID_SIZE {
            return false;
        }

        let acrosses: HashSet<String> = self.acrosses().into_iter().collect();
        let letters = word.as_bytes();

        let legal = (0..GRID_SIZE).all(|col| {
            let mut prefix = self.get_column(col);
            prefix.push(letters[col] as char);

            dictionary
                .words_with_prefix(&prefix)
                .iter()
                .any(|down| !acrosses.contains(down.as_str()))
        });

        trace!("can place {} in row {}: {}", word, row, legal);
        legal
    }

    /// Every run of two or more letters, across runs first (row by row), then
    /// down runs (column by column).
    pub fn get_word_positions(&self) -> Vec<WordPosition> {
        let mut positions = Vec::new();

        for row in 0..GRID_SIZE {
            self.collect_runs(
                (0..GRID_SIZE).map(|col| (row, col)),
                Direction::Across,
                &mut positions,
            );
        }
        for col in 0..GRID_SIZE {
            self.collect_runs(
                (0..GRID_SIZE).map(|row| (row, col)),
                Direction::Down,
                &mut positions,
            );
        }

        positions
    }

    fn collect_runs<I>(&self, line: I, direction: Direction, positions: &mut Vec<WordPosition>)
    where
        I: Iterator<Item = (usize, usize)>,
    {
        let mut current: Option<WordPosition> = None;

        for (row, col) in line {
            match self.cell(row, col) {
                Cell::Letter(byte) => current
                    .get_or_insert_with(|| WordPosition {
                        row,
                        col,
                        direction,
                        word: String::new(),
                    })
                    .word
                    .push(byte as char),
                Cell::Empty | Cell::Block => {
                    if let Some(finished) = current.take() {
                        if finished.word.len() > 1 {
                            positions.push(finished);
                        }
                    }
                }
            }
        }

        if let Some(finished) = current {
            if finished.word.len() > 1 {
                positions.push(finished);
            }
        }
    }

    /// A full grid in which every across and down run is a dictionary word.
    pub fn is_solved(&self, dictionary: &WordTrie) -> bool {
        self.is_full()
            && self
                .get_word_positions()
                .iter()
                .all(|position| dictionary.contains(&position.word))
    }

    /// Human readable rendering with row and column indices.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..GRID_SIZE {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        writeln!(f, "  {}", "-".repeat(GRID_SIZE * 2 - 1))?;

        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{}|", row)?;
            for (col, cell) in cells.iter().enumerate() {
                if col != 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", cell.display_char())?;
            }
            if row != GRID_SIZE - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
