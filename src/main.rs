use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use env_logger::Env;
use log::error;
use mini_cw::{
    generate_next_word_candidates, par_generate_all_puzzles, Grid, Legality, Parameters, Solver,
    WordTrie, GRID_SIZE,
};
use nanorand::WyRand;

/// Generate 5x5 mini crosswords from a word list.
#[derive(Parser, Debug)]
#[command(name = "mini-cw", version)]
struct Args {
    /// Word list, one word per line
    words: PathBuf,

    /// Top row of the puzzle; a random five letter word when omitted
    seed: Option<String>,

    /// Seed for choosing the random top row
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Print every puzzle instead of the first one found
    #[arg(short, long)]
    all: bool,

    /// Search subtrees on all cores (implies --all)
    #[arg(short, long)]
    parallel: bool,

    /// Skip the column check on candidates when listing all puzzles
    #[arg(long)]
    unchecked: bool,

    /// Give up after expanding this many grids
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print dictionary statistics
    #[arg(long)]
    stats: bool,

    /// Print the candidates for the second row and stop
    #[arg(long)]
    candidates: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let dictionary = match WordTrie::load(&args.words) {
        Ok(dictionary) => dictionary,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.stats {
        print!("{}", dictionary.stats());
    }

    let seed = match args.seed {
        Some(seed) => seed.trim().to_uppercase(),
        None => {
            let mut rng = args.rng_seed.map_or_else(WyRand::new, WyRand::new_seed);
            match dictionary.random_word(GRID_SIZE, &mut rng) {
                Some(word) => word.to_string(),
                None => {
                    error!("no {} letter words to seed the puzzle with", GRID_SIZE);
                    return ExitCode::FAILURE;
                }
            }
        }
    };
    println!("Using seed word: {}", seed);

    if args.candidates {
        let grid = Grid::from_rows([&seed]);
        let candidates = generate_next_word_candidates(&grid, 1, &dictionary);
        println!("{}", grid);
        println!(
            "{}",
            candidates
                .iter()
                .map(|w| w.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        );
        return ExitCode::SUCCESS;
    }

    let legality = if args.unchecked {
        Legality::CandidatesOnly
    } else {
        Legality::Full
    };
    let parameters = Parameters::new(legality, args.limit);

    if args.all || args.parallel {
        let grids = if args.parallel {
            par_generate_all_puzzles(&seed, &dictionary, &parameters)
        } else {
            Solver::new(&parameters, &dictionary, &seed).solve_all()
        };

        if grids.is_empty() {
            println!("Could not generate any puzzle starting with {}", seed);
            return ExitCode::FAILURE;
        }
        println!("Generated {} puzzles", grids.len());
        for grid in grids {
            println!("\n{}", grid);
        }
    } else {
        match Solver::new(&parameters, &dictionary, &seed).solve_first() {
            Some(grid) => println!("{}", grid),
            None => {
                println!("Could not generate a puzzle starting with {}", seed);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
