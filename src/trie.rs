use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    iter::FromIterator,
    path::Path,
};

use fst::Automaton;
use log::{debug, info};
use nanorand::{Rng, WyRand};
use ustr::Ustr;
use vec_map::VecMap;

use crate::{
    automaton::{slots_from_pattern, Length, SlotPattern},
    error::DictionaryError,
};

/// Trims surrounding whitespace and uppercases, the form every stored word
/// and every query is compared in.
pub fn normalize(word: &str) -> String {
    word.trim().to_uppercase()
}

#[derive(Default, Clone, Debug)]
struct TrieNode {
    children: BTreeMap<u8, TrieNode>,
    // Some(word) marks a terminal node; the word equals the path from the root.
    word: Option<Ustr>,
}

impl TrieNode {
    fn collect(&self, words: &mut BTreeSet<Ustr>) {
        if let Some(word) = self.word {
            words.insert(word);
        }
        for child in self.children.values() {
            child.collect(words);
        }
    }

    fn search<A: Automaton>(&self, aut: &A, state: &A::State, words: &mut BTreeSet<Ustr>) {
        if let Some(word) = self.word {
            if aut.is_match(state) {
                words.insert(word);
            }
        }
        for (&byte, child) in &self.children {
            let next = aut.accept(state, byte);
            if aut.can_match(&next) {
                child.search(aut, &next, words);
            }
        }
    }

    fn count_nodes(&self) -> usize {
        1 + self
            .children
            .values()
            .map(TrieNode::count_nodes)
            .sum::<usize>()
    }

    fn max_depth(&self) -> usize {
        self.children
            .values()
            .map(|child| 1 + child.max_depth())
            .max()
            .unwrap_or(0)
    }

    fn count_lengths(&self, lengths: &mut VecMap<usize>) {
        if let Some(word) = self.word {
            *lengths.entry(word.chars().count()).or_insert(0) += 1;
        }
        for child in self.children.values() {
            child.count_lengths(lengths);
        }
    }
}

/// Prefix tree over uppercase words, answering exact, prefix and fixed-length
/// pattern queries.
///
/// The trie is built up front and only read while puzzles are generated, so
/// it can be shared freely between search threads.
#[derive(Default, Clone, Debug)]
pub struct WordTrie {
    root: TrieNode,
    word_count: usize,
}

impl WordTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a newline-delimited word list. Blank lines are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => DictionaryError::NotFound {
                path: path.to_path_buf(),
                source,
            },
            _ => DictionaryError::Read(source),
        })?;

        let trie = Self::from_reader(BufReader::new(file))?;
        info!("Loaded {} words from {}", trie.len(), path.display());
        Ok(trie)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DictionaryError> {
        let mut trie = Self::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                trie.insert(&line);
            }
        }
        Ok(trie)
    }

    /// Stores `word` in normalized form. Empty input is ignored and inserting
    /// a word twice leaves the trie unchanged.
    pub fn insert(&mut self, word: &str) {
        let word = normalize(word);
        if word.is_empty() {
            return;
        }

        let mut node = &mut self.root;
        for byte in word.bytes() {
            node = node.children.entry(byte).or_default();
        }

        if node.word.is_none() {
            self.word_count += 1;
            node.word = Some(Ustr::from(word.as_str()));
        }
    }

    fn find_node(&self, prefix: &str) -> Option<&TrieNode> {
        prefix
            .bytes()
            .try_fold(&self.root, |node, byte| node.children.get(&byte))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.find_node(&normalize(word))
            .map_or(false, |node| node.word.is_some())
    }

    /// True if at least one stored word starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.find_node(&normalize(prefix)).is_some()
    }

    /// Every stored word starting with `prefix`, of any length. The empty
    /// prefix yields the whole dictionary.
    pub fn words_with_prefix(&self, prefix: &str) -> BTreeSet<Ustr> {
        let mut words = BTreeSet::new();
        if let Some(node) = self.find_node(&normalize(prefix)) {
            node.collect(&mut words);
        }
        words
    }

    /// Words of exactly the pattern's length whose characters match it
    /// position by position; `wildcard` matches any single character.
    ///
    /// ```
    /// use mini_cw::trie::WordTrie;
    ///
    /// let trie: WordTrie = ["APPLE", "APPLY", "APRON"].iter().collect();
    /// let words = trie.words_with_pattern("ap?le", '?');
    /// assert_eq!(words.len(), 1);
    /// ```
    pub fn words_with_pattern(&self, pattern: &str, wildcard: char) -> BTreeSet<Ustr> {
        let slots = slots_from_pattern(&normalize(pattern), wildcard);
        self.search(&SlotPattern::new(&slots))
    }

    /// Stored words of exactly `length` characters.
    pub fn words_by_length(&self, length: usize) -> BTreeSet<Ustr> {
        self.search(&Length::new(length))
    }

    /// Walks the trie under `aut`, pruning every branch the automaton can no
    /// longer match, and returns the stored words it accepts.
    pub fn search<A: Automaton>(&self, aut: &A) -> BTreeSet<Ustr> {
        let mut words = BTreeSet::new();
        let start = aut.start();
        if aut.can_match(&start) {
            self.root.search(aut, &start, &mut words);
        }
        words
    }

    /// Picks a stored word of the given length uniformly at random.
    pub fn random_word(&self, length: usize, rng: &mut WyRand) -> Option<Ustr> {
        let words: Vec<Ustr> = self.words_by_length(length).into_iter().collect();
        if words.is_empty() {
            debug!("no words of length {} to choose from", length);
            return None;
        }
        Some(words[rng.generate_range(0..words.len())])
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn stats(&self) -> TrieStats {
        let mut words_by_length = VecMap::new();
        self.root.count_lengths(&mut words_by_length);

        TrieStats {
            total_words: self.word_count,
            total_nodes: self.root.count_nodes(),
            max_depth: self.root.max_depth(),
            words_by_length,
        }
    }
}

impl<S: AsRef<str>> Extend<S> for WordTrie {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for word in iter {
            self.insert(word.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for WordTrie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trie = WordTrie::new();
        trie.extend(iter);
        trie
    }
}

/// Diagnostic counts describing the shape of a [`WordTrie`].
#[derive(Debug, Clone)]
pub struct TrieStats {
    pub total_words: usize,
    /// Includes the root.
    pub total_nodes: usize,
    /// Longest path in bytes.
    pub max_depth: usize,
    /// Word length in characters -> number of words of that length.
    pub words_by_length: VecMap<usize>,
}

impl fmt::Display for TrieStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total words: {}", self.total_words)?;
        writeln!(f, "Total nodes: {}", self.total_nodes)?;
        writeln!(f, "Max depth: {}", self.max_depth)?;
        writeln!(f, "Words by length:")?;
        for (length, count) in self.words_by_length.iter() {
            writeln!(f, "  {} letters: {} words", length, count)?;
        }
        Ok(())
    }
}
