use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::thread;

use crossbeam::channel::{bounded, Sender};
use hash_table::{ProbingHashTable, TableError};
use thiserror::Error;

const QUEUE_SIZE: usize = 1024;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("can not read dictionary: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("dictionary reader thread panicked")]
    ReaderPanicked,
}

/// Dictionary words plus every prefix of every word.
///
/// The prefix table lets a grid scan stop a ray as soon as the letters read
/// so far can not start any word.
#[derive(Debug, Default)]
pub struct Dictionary {
    words: ProbingHashTable<String>,
    prefixes: ProbingHashTable<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `word` and all of its non-empty prefixes. Empty words are ignored.
    pub fn insert_word(&mut self, word: &str) -> Result<(), TableError> {
        if word.is_empty() {
            return Ok(());
        }

        for (end, ch) in word.char_indices() {
            self.prefixes.insert(word[..end + ch.len_utf8()].to_string())?;
        }
        self.words.insert(word.to_string())?;
        Ok(())
    }

    /// Loads one word per line.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DictionaryError> {
        let mut dictionary = Self::new();
        for line in reader.lines() {
            dictionary.insert_word(&line?)?;
        }
        Ok(dictionary)
    }

    /// Loads one word per line from `path`.
    ///
    /// A reader thread streams the lines over a bounded channel, the tables are
    /// filled on the calling thread.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let file = File::open(path)?;
        let (tx, rx) = bounded::<String>(QUEUE_SIZE);

        let producer_thread = thread::spawn(move || producer(tx, BufReader::new(file)));

        let mut dictionary = Self::new();
        let mut result = Ok(());
        while let Ok(line) = rx.recv() {
            if let Err(err) = dictionary.insert_word(&line) {
                result = Err(err);
                break;
            }
        }
        // unblocks the producer if we stopped early
        drop(rx);

        producer_thread
            .join()
            .map_err(|_| DictionaryError::ReaderPanicked)??;
        result?;

        Ok(dictionary)
    }

    pub fn words(&self) -> &ProbingHashTable<String> {
        &self.words
    }

    pub fn prefixes(&self) -> &ProbingHashTable<String> {
        &self.prefixes
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn is_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }
}

fn producer<R: BufRead>(tx: Sender<String>, reader: R) -> io::Result<()> {
    for line in reader.lines() {
        if tx.send(line?).is_err() {
            // consumer dropped
            break;
        }
    }

    Ok(())
}
