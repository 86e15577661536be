mod error;
mod prime;
mod probing_hash_table;

pub use error::TableError;
pub use prime::{is_prime, next_prime};
pub use probing_hash_table::{Iter, ProbingHashTable, DEFAULT_CAPACITY};
