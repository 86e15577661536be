use std::fmt;
use std::hash::BuildHasher;

use hash_table::ProbingHashTable;

use crate::grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    HorizontalForward,
    HorizontalBackward,
    VerticalDown,
    VerticalUp,
    DiagonalTopRight,
    DiagonalBottomRight,
    DiagonalTopLeft,
    DiagonalBottomLeft,
}

impl Direction {
    /// Scan order.
    pub const ALL: [Direction; 8] = [
        Direction::HorizontalForward,
        Direction::HorizontalBackward,
        Direction::VerticalDown,
        Direction::VerticalUp,
        Direction::DiagonalTopRight,
        Direction::DiagonalBottomRight,
        Direction::DiagonalTopLeft,
        Direction::DiagonalBottomLeft,
    ];

    /// `(row, col)` step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::HorizontalForward => (0, 1),
            Direction::HorizontalBackward => (0, -1),
            Direction::VerticalDown => (1, 0),
            Direction::VerticalUp => (-1, 0),
            Direction::DiagonalTopRight => (-1, 1),
            Direction::DiagonalBottomRight => (1, 1),
            Direction::DiagonalTopLeft => (-1, -1),
            Direction::DiagonalBottomLeft => (1, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::HorizontalForward => "horizontally forward",
            Direction::HorizontalBackward => "horizontally backward",
            Direction::VerticalDown => "vertically down",
            Direction::VerticalUp => "vertically up",
            Direction::DiagonalTopRight => "diagonally top-right",
            Direction::DiagonalBottomRight => "diagonally bottom-right",
            Direction::DiagonalTopLeft => "diagonally top-left",
            Direction::DiagonalBottomLeft => "diagonally bottom-left",
        };
        f.write_str(name)
    }
}

/// A dictionary word read from `(row, col)`.
///
/// `direction` is `None` for a single-letter word matched on its own cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Finding {
    pub word: String,
    pub row: usize,
    pub col: usize,
    pub direction: Option<Direction>,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Some(direction) => write!(
                f,
                "Found \"{}\" {} at ({},{})",
                self.word, direction, self.row, self.col
            ),
            None => write!(f, "Found \"{}\" at ({},{})", self.word, self.row, self.col),
        }
    }
}

/// Collects every word of `words` that can be read from `grid`.
///
/// See [`find_with`].
pub fn find<S: BuildHasher>(
    grid: &Grid,
    words: &ProbingHashTable<String, S>,
    prefixes: &ProbingHashTable<String, S>,
    pruning: bool,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    find_with(grid, words, prefixes, pruning, |finding| findings.push(finding));
    findings
}

/// Reads rays of letters in all eight directions from every cell and passes each
/// dictionary word met on the way to `sink`.
///
/// With `pruning`, a ray stops as soon as its letters are not in `prefixes`. That
/// only holds up when `prefixes` contains every prefix of every word in `words`.
/// Both tables are only read.
pub fn find_with<S, F>(
    grid: &Grid,
    words: &ProbingHashTable<String, S>,
    prefixes: &ProbingHashTable<String, S>,
    pruning: bool,
    mut sink: F,
) where
    S: BuildHasher,
    F: FnMut(Finding),
{
    let mut ray = String::new();

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let Some(start) = grid.get(row, col) else {
                continue;
            };

            ray.clear();
            ray.push(start);
            if words.contains(ray.as_str()) {
                sink(Finding {
                    word: ray.clone(),
                    row,
                    col,
                    direction: None,
                });
            }

            for direction in Direction::ALL {
                let (row_step, col_step) = direction.delta();
                ray.truncate(start.len_utf8());

                let (mut r, mut c) = (row, col);
                loop {
                    let (Some(next_r), Some(next_c)) =
                        (r.checked_add_signed(row_step), c.checked_add_signed(col_step))
                    else {
                        break;
                    };
                    let Some(letter) = grid.get(next_r, next_c) else {
                        break;
                    };
                    (r, c) = (next_r, next_c);

                    ray.push(letter);
                    if pruning && !prefixes.contains(ray.as_str()) {
                        break;
                    }
                    if words.contains(ray.as_str()) {
                        sink(Finding {
                            word: ray.clone(),
                            row,
                            col,
                            direction: Some(direction),
                        });
                    }
                }
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::dictionary::Dictionary;
    use proptest::prelude::*;

    fn grid_strategy() -> impl Strategy<Value = Grid> {
        (0usize..6, 0usize..6).prop_flat_map(|(rows, cols)| {
            proptest::collection::vec(proptest::char::range('a', 'c'), rows * cols)
                .prop_map(move |cells| Grid::new(rows, cols, cells).unwrap())
        })
    }

    proptest! {
        #[test]
        fn test_pruning_finds_the_same_words(
            grid in grid_strategy(),
            words in proptest::collection::vec(proptest::string::string_regex("[a-c]{1,4}").unwrap(), 1..30),
        ) {
            let mut dictionary = Dictionary::new();
            for word in &words {
                dictionary.insert_word(word).unwrap();
            }

            let mut plain = find(&grid, dictionary.words(), dictionary.prefixes(), false);
            let mut pruned = find(&grid, dictionary.words(), dictionary.prefixes(), true);
            plain.sort();
            pruned.sort();
            prop_assert_eq!(plain, pruned);
        }
    }
}
