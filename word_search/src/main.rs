use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use word_search::{find_with, parse_dimension, Dictionary, Grid};

#[derive(Parser)]
#[command(name = "word_search", about = "Finds dictionary words in a random letter grid", version)]
struct Cli {
    /// One word per line
    #[arg(long, default_value = "dictionary.txt")]
    dictionary: PathBuf,
    /// Asked on stdin when omitted
    #[arg(long)]
    rows: Option<usize>,
    /// Asked on stdin when omitted
    #[arg(long)]
    cols: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Only print the grid and the timings
    #[arg(long)]
    quiet: bool,
}

fn prompt_dimension(lines: &mut impl BufRead, question: &str) -> Result<usize, Box<dyn Error>> {
    println!("{question}");
    io::stdout().flush()?;

    let mut line = String::new();
    lines.read_line(&mut line)?;
    Ok(parse_dimension(&line)?)
}

fn timed<F: FnOnce()>(scan: F) -> Duration {
    let start = Instant::now();
    scan();
    start.elapsed()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let dictionary = Dictionary::from_file(&cli.dictionary)?;
    eprintln!(
        "Loaded {} words, {} prefixes",
        dictionary.words().len(),
        dictionary.prefixes().len()
    );

    let mut stdin = io::stdin().lock();
    let rows = match cli.rows {
        Some(rows) => rows,
        None => prompt_dimension(&mut stdin, "Enter total number of rows of grid: ")?,
    };
    let cols = match cli.cols {
        Some(cols) => cols,
        None => prompt_dimension(&mut stdin, "Enter total number of columns of grid: ")?,
    };

    let grid = match cli.seed {
        Some(seed) => Grid::random(rows, cols, &mut StdRng::seed_from_u64(seed))?,
        None => Grid::random(rows, cols, &mut rand::thread_rng())?,
    };
    print!("{grid}");

    let quiet = cli.quiet;
    let mut found = 0;
    let normal = timed(|| {
        find_with(&grid, dictionary.words(), dictionary.prefixes(), false, |finding| {
            found += 1;
            if !quiet {
                println!("{finding}");
            }
        })
    });

    let mut found_with_prefixes = 0;
    let enhanced = timed(|| {
        find_with(&grid, dictionary.words(), dictionary.prefixes(), true, |_| {
            found_with_prefixes += 1
        })
    });

    if found != found_with_prefixes {
        eprintln!("Prefix scan found {found_with_prefixes} words, plain scan found {found}");
    }

    println!(
        "Elapsed time for normal hashing: {} nanoseconds or {} milliseconds.",
        normal.as_nanos(),
        normal.as_millis()
    );
    println!(
        "Elapsed time for enhanced prefix hashing: {} nanoseconds or {} milliseconds.",
        enhanced.as_nanos(),
        enhanced.as_millis()
    );

    Ok(())
}
