//! Word lists shared by the unit tests.

use crate::trie::WordTrie;

/// Rows of a grid whose columns read CLIMB, LUNAR, ANNIE, SCENE, SHRED.
pub const CLASS_ROWS: [&str; 5] = ["CLASS", "LUNCH", "INNER", "MAINE", "BREED"];
pub const CLASS_COLUMNS: [&str; 5] = ["CLIMB", "LUNAR", "ANNIE", "SCENE", "SHRED"];

/// Rows and columns of this square are the same five words.
pub const HEART_SQUARE: [&str; 5] = ["HEART", "EMBER", "ABUSE", "RESIN", "TREND"];

/// Exactly one grid can be built from these ten words with CLASS on top.
pub fn class_square() -> WordTrie {
    CLASS_ROWS.iter().chain(CLASS_COLUMNS.iter()).collect()
}

/// The CLASS square plus an alternative last row: BRETD, with SCENT as the
/// fourth column.
pub fn class_square_with_alternative() -> WordTrie {
    let mut trie = class_square();
    trie.extend(["SCENT", "BRETD"]);
    trie
}

pub fn heart_square() -> WordTrie {
    HEART_SQUARE.iter().collect()
}
