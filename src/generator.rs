use std::collections::BTreeSet;

use byte_set::ByteSet;
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use ustr::Ustr;

use crate::{
    automaton::{Slot, SlotPattern},
    grid::{Grid, GRID_SIZE},
    trie::WordTrie,
};

/// Which checks a candidate word must pass before its grid joins the frontier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Legality {
    /// Candidates must also pass [`Grid::can_place_word`].
    #[default]
    Full,
    /// Trust the candidate generator alone. Grids found this way may repeat a
    /// row word as a column word.
    CandidatesOnly,
}

#[derive(Clone, Debug, Default)]
pub struct Parameters {
    /// Applies to all-solution searches; single-solution searches always use
    /// [`Legality::Full`].
    pub legality: Legality,
    /// Upper bound on the number of grids expanded by one [`Solver`]. The
    /// search stops with whatever it found once the bound is reached.
    pub max_expansions: Option<usize>,
}

impl Parameters {
    pub fn new(legality: Legality, max_expansions: Option<usize>) -> Self {
        Self {
            legality,
            max_expansions,
        }
    }
}

/// Words that could fill `row` of `grid` without closing off any column.
///
/// For every column, the letters that dictionary words sharing the column's
/// prefix carry at position `row` are gathered; the row words with one of
/// those letters at that column endorse the column. A candidate must be
/// endorsed by all five columns. The result is sorted.
pub fn generate_next_word_candidates(grid: &Grid, row: usize, dictionary: &WordTrie) -> Vec<Ustr> {
    let mut candidates: Option<BTreeSet<Ustr>> = None;

    for col in 0..GRID_SIZE {
        let column = grid.get_column(col);

        let mut letters = ByteSet::new();
        for word in dictionary.words_with_prefix(&column) {
            // grid cells only hold ASCII letters
            if let Some(letter) = word.chars().nth(row).filter(char::is_ascii) {
                letters.insert(letter as u8);
            }
        }

        let endorsed = if letters.is_empty() {
            BTreeSet::new()
        } else {
            let mut slots = vec![Slot::Any; GRID_SIZE];
            slots[col] = Slot::OneOf(letters);
            dictionary.search(&SlotPattern::new(&slots))
        };

        let remaining = match candidates {
            None => endorsed,
            Some(previous) => previous.intersection(&endorsed).copied().collect(),
        };

        if remaining.is_empty() {
            trace!("column {} ({:?}) leaves no candidates for row {}", col, column, row);
            return Vec::new();
        }
        candidates = Some(remaining);
    }

    let candidates: Vec<Ustr> = candidates.unwrap_or_default().into_iter().collect();
    trace!("row {} candidates: {:?}", row, candidates);
    candidates
}

/// Depth-first search over row-by-row completions of a seeded grid.
///
/// The frontier is a stack of independent grids; the most recently pushed
/// grid is expanded first. As an iterator the solver yields every complete
/// grid, filtered according to [`Parameters::legality`].
pub struct Solver<'a> {
    parameters: &'a Parameters,
    dictionary: &'a WordTrie,
    frontier: Vec<Grid>,
    expansions: usize,
}

impl<'a> Solver<'a> {
    /// Starts from an empty grid with `seed_word` in row 0.
    pub fn new(parameters: &'a Parameters, dictionary: &'a WordTrie, seed_word: &str) -> Self {
        let mut grid = Grid::new();
        grid.place_word(seed_word, 0);
        Self::from_grid(parameters, dictionary, grid)
    }

    /// Continues from an arbitrary partially filled grid.
    pub fn from_grid(parameters: &'a Parameters, dictionary: &'a WordTrie, grid: Grid) -> Self {
        Self {
            parameters,
            dictionary,
            frontier: vec![grid],
            expansions: 0,
        }
    }

    /// Number of grids expanded so far.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    fn budget_exhausted(&self) -> bool {
        self.parameters
            .max_expansions
            .map_or(false, |max| self.expansions >= max)
    }

    fn next_solution(&mut self, legality: Legality) -> Option<Grid> {
        while let Some(grid) = self.frontier.pop() {
            let row = match grid.first_empty_row() {
                Some(row) => row,
                None => return Some(grid),
            };

            if self.budget_exhausted() {
                warn!(
                    "stopping search after {} expansions with {} grids unexplored",
                    self.expansions,
                    self.frontier.len() + 1
                );
                self.frontier.clear();
                return None;
            }
            self.expansions += 1;

            let candidates = generate_next_word_candidates(&grid, row, self.dictionary);
            debug!(
                "expanding row {} of {:?}: {} candidates",
                row,
                grid.row(0),
                candidates.len()
            );

            for word in candidates {
                if legality == Legality::Full && !grid.can_place_word(&word, row, self.dictionary) {
                    continue;
                }
                let mut child = grid;
                child.place_word(&word, row);
                self.frontier.push(child);
            }
        }
        None
    }

    /// The first complete grid reached, checking every placement fully.
    pub fn solve_first(mut self) -> Option<Grid> {
        let solution = self.next_solution(Legality::Full);
        if solution.is_some() {
            info!("found a puzzle after {} expansions", self.expansions);
        }
        solution
    }

    /// Every complete grid, in the order the search reaches them.
    pub fn solve_all(self) -> Vec<Grid> {
        let solutions: Vec<Grid> = self.collect();
        info!("found {} puzzles", solutions.len());
        solutions
    }
}

impl<'a> Iterator for Solver<'a> {
    type Item = Grid;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_solution(self.parameters.legality)
    }
}

/// First puzzle found with `seed_word` as the top row, or `None` if the seed
/// cannot be completed.
pub fn generate_puzzle(seed_word: &str, dictionary: &WordTrie) -> Option<Grid> {
    Solver::new(&Parameters::default(), dictionary, seed_word).solve_first()
}

/// Every puzzle with `seed_word` as the top row.
pub fn generate_all_puzzles(seed_word: &str, dictionary: &WordTrie) -> Vec<Grid> {
    Solver::new(&Parameters::default(), dictionary, seed_word).solve_all()
}

/// Same grids, in the same order, as a sequential [`Solver`], with the
/// subtree below each second-row candidate explored on the rayon pool.
///
/// `max_expansions` bounds each subtree separately.
pub fn par_generate_all_puzzles(
    seed_word: &str,
    dictionary: &WordTrie,
    parameters: &Parameters,
) -> Vec<Grid> {
    let mut root = Grid::new();
    root.place_word(seed_word, 0);

    let row = match root.first_empty_row() {
        Some(row) => row,
        None => return vec![root],
    };

    let children: Vec<Grid> = generate_next_word_candidates(&root, row, dictionary)
        .into_iter()
        .filter(|word| {
            parameters.legality == Legality::CandidatesOnly
                || root.can_place_word(word, row, dictionary)
        })
        .map(|word| {
            let mut child = root;
            child.place_word(&word, row);
            child
        })
        .collect();
    debug!("searching {} subtrees in parallel", children.len());

    // the sequential stack explores the last pushed child first
    let solutions: Vec<Grid> = children
        .into_par_iter()
        .rev()
        .flat_map_iter(|child| Solver::from_grid(parameters, dictionary, child).collect::<Vec<_>>())
        .collect();
    info!("found {} puzzles", solutions.len());
    solutions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_words::{
        class_square, class_square_with_alternative, heart_square, CLASS_COLUMNS, CLASS_ROWS,
        HEART_SQUARE,
    };

    fn words(words: &[Ustr]) -> Vec<&str> {
        words.iter().map(|w| w.as_str()).collect()
    }

    #[test]
    fn candidates_follow_columns() {
        let dict = class_square();
        let mut grid = Grid::new();
        grid.place_word("CLASS", 0);

        assert_eq!(words(&generate_next_word_candidates(&grid, 1, &dict)), vec!["LUNCH"]);

        grid.place_word("LUNCH", 1);
        assert_eq!(words(&generate_next_word_candidates(&grid, 2, &dict)), vec!["INNER"]);

        let grid = Grid::from_rows(&CLASS_ROWS[..4]);
        let alternatives = class_square_with_alternative();
        let candidates = generate_next_word_candidates(&grid, 4, &alternatives);
        let mut found = words(&candidates);
        found.sort_unstable();
        assert_eq!(found, vec!["BREED", "BRETD"]);
    }

    #[test]
    fn candidates_empty_when_column_is_dead() {
        let dict: WordTrie = ["APPLE", "APPLY", "APRON"].iter().collect();
        let grid = Grid::from_rows(["APPLE"]);
        assert!(generate_next_word_candidates(&grid, 1, &dict).is_empty());
    }

    #[test]
    fn non_ascii_words_do_not_disturb_candidates() {
        let mut dict = class_square();
        dict.extend(["CÉLAS", "LUÑCH"]);
        let grid = Grid::from_rows(["CLASS"]);

        assert_eq!(words(&generate_next_word_candidates(&grid, 1, &dict)), vec!["LUNCH"]);
        assert_eq!(generate_all_puzzles("CLASS", &dict), vec![Grid::from_rows(CLASS_ROWS)]);
    }

    #[test]
    fn candidates_for_empty_grid() {
        let dict = class_square();
        // only words spelled entirely with first letters of dictionary words
        let found = generate_next_word_candidates(&Grid::new(), 0, &dict);
        assert_eq!(words(&found), vec!["CLASS", "CLIMB"]);
    }

    #[test]
    fn generate_puzzle_finds_square() {
        let dict = class_square();
        let grid = generate_puzzle("class", &dict).unwrap();

        assert_eq!(grid, Grid::from_rows(CLASS_ROWS));
        assert!(grid.is_solved(&dict));
        for (col, down) in CLASS_COLUMNS.iter().enumerate() {
            assert_eq!(grid.get_column(col), *down);
        }
        println!("{}", grid);
    }

    #[test]
    fn generate_puzzle_without_completion() {
        let dict: WordTrie = ["APPLE", "APPLY", "APRON"].iter().collect();
        assert_eq!(generate_puzzle("APPLE", &dict), None);
        assert!(generate_all_puzzles("APPLE", &dict).is_empty());
    }

    #[test]
    fn generate_all_counts_grids() {
        let dict = class_square();
        assert_eq!(generate_all_puzzles("CLASS", &dict), vec![Grid::from_rows(CLASS_ROWS)]);

        let dict = class_square_with_alternative();
        let grids = generate_all_puzzles("CLASS", &dict);
        assert_eq!(grids.len(), 2);
        for grid in &grids {
            assert!(grid.is_solved(&dict));
            assert_eq!(grid.row(0), "CLASS");
        }
        let mut last_rows: Vec<String> = grids.iter().map(|g| g.row(4)).collect();
        last_rows.sort();
        assert_eq!(last_rows, vec!["BREED", "BRETD"]);

        let first = generate_puzzle("CLASS", &dict).unwrap();
        assert!(grids.contains(&first));
    }

    #[test]
    fn transposed_seed() {
        let dict = class_square();
        let grids = generate_all_puzzles("CLIMB", &dict);
        assert_eq!(grids, vec![Grid::from_rows(CLASS_COLUMNS)]);
    }

    #[test]
    fn empty_seed_searches_from_scratch() {
        let dict = class_square();
        let parameters = Parameters::default();
        let grids = Solver::new(&parameters, &dict, "").solve_all();

        assert_eq!(grids.len(), 2);
        assert!(grids.contains(&Grid::from_rows(CLASS_ROWS)));
        assert!(grids.contains(&Grid::from_rows(CLASS_COLUMNS)));
    }

    #[test]
    fn legality_modes_differ_on_symmetric_square() {
        let dict = heart_square();

        // every column repeats a row, so the full check rejects the square
        assert!(generate_all_puzzles("HEART", &dict).is_empty());
        assert_eq!(generate_puzzle("HEART", &dict), None);

        let parameters = Parameters::new(Legality::CandidatesOnly, None);
        let grids = Solver::new(&parameters, &dict, "HEART").solve_all();
        assert_eq!(grids, vec![Grid::from_rows(HEART_SQUARE)]);
        assert!(grids[0].is_solved(&dict));

        // the single-solution search ignores the legality parameter
        assert_eq!(Solver::new(&parameters, &dict, "HEART").solve_first(), None);
    }

    #[test]
    fn expansion_budget() {
        let dict = class_square();

        let parameters = Parameters::new(Legality::Full, Some(3));
        assert_eq!(Solver::new(&parameters, &dict, "CLASS").solve_first(), None);

        let parameters = Parameters::new(Legality::Full, Some(4));
        let mut solver = Solver::new(&parameters, &dict, "CLASS");
        assert!(solver.next().is_some());
        assert_eq!(solver.expansions(), 4);

        let parameters = Parameters::new(Legality::Full, Some(0));
        assert!(Solver::new(&parameters, &dict, "CLASS").solve_all().is_empty());
    }

    #[test]
    fn solver_iterates_lazily() {
        let dict = class_square_with_alternative();
        let parameters = Parameters::default();
        let mut solver = Solver::new(&parameters, &dict, "CLASS");

        assert!(solver.next().is_some());
        assert!(solver.next().is_some());
        assert_eq!(solver.next(), None);
        assert_eq!(solver.next(), None);
    }

    #[test]
    fn from_grid_continues_partial_grid() {
        let dict = class_square();
        let parameters = Parameters::default();
        let grid = Grid::from_rows(&CLASS_ROWS[..3]);

        let grids: Vec<Grid> = Solver::from_grid(&parameters, &dict, grid).collect();
        assert_eq!(grids, vec![Grid::from_rows(CLASS_ROWS)]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let dict = class_square_with_alternative();
        let parameters = Parameters::default();

        let sequential = Solver::new(&parameters, &dict, "CLASS").solve_all();
        let parallel = par_generate_all_puzzles("CLASS", &dict, &parameters);
        assert_eq!(sequential, parallel);

        let unchecked = Parameters::new(Legality::CandidatesOnly, None);
        let heart = heart_square();
        assert_eq!(
            par_generate_all_puzzles("HEART", &heart, &unchecked),
            Solver::new(&unchecked, &heart, "HEART").solve_all()
        );

        assert!(par_generate_all_puzzles("APRON", &dict, &parameters).is_empty());
    }
}
