pub mod dictionary;
pub mod grid;
pub mod search;

pub use dictionary::{Dictionary, DictionaryError};
pub use grid::{parse_dimension, Grid, GridError};
pub use search::{find, find_with, Direction, Finding};
