use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::time::Instant;
use wordfall_solver::{Grid, Solver, Trie};

const USAGE: &str = "usage: solve <wordfile> [<gridfile> | random <rows> <cols> <seed>]";

const TEST_GRID: &[&str] = &[
    "  lo  ", //
    " .Eta ", //
    "rinsed", //
    "Stone.", //
    "quartz", //
];

fn read_grid(args: &[String]) -> Result<Grid> {
    match args {
        [] => Ok(Grid::from_strings(TEST_GRID)?),
        [random, rows, cols, seed] if random == "random" => {
            Ok(Grid::random(rows.parse()?, cols.parse()?, seed.parse()?))
        }
        [gridfile] => {
            let text = fs::read_to_string(gridfile)
                .with_context(|| format!("could not read grid {}", gridfile))?;
            let rows: Vec<&str> = text.lines().filter(|row| !row.is_empty()).collect();
            Ok(Grid::from_strings(&rows)?)
        }
        _ => anyhow::bail!(USAGE),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let wordfile = args.first().context(USAGE)?;

    let t0 = Instant::now();
    let trie = if wordfile.ends_with(".trie") {
        Trie::from_serialized_file(wordfile)?
    } else {
        Trie::from_file(wordfile)?
    };
    println!("Load {} took {:?}", trie, t0.elapsed());

    let grid = read_grid(&args[1..])?;
    println!("{}\n", grid);

    let t0 = Instant::now();
    let mut solver = Solver::new(&trie, grid);
    let words = solver.playable_words();
    println!("{} playable words in {:?}", words.len(), t0.elapsed());
    for (word, score) in words.iter().take(10) {
        println!("  {:>12} {}", word, score);
    }

    let t0 = Instant::now();
    let score = solver.solve_greedily()?;
    println!("\nSolved in {:?}", t0.elapsed());
    for play in solver.solution() {
        println!("  {}", play.path);
    }
    println!(
        "{} words, {} points, {} bonus, final score {}",
        solver.solution().len(),
        solver.score(),
        solver.grid().score_bonuses(),
        score
    );
    println!("{}", solver.grid());
    Ok(())
}
