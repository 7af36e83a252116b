use criterion::{criterion_group, criterion_main, Criterion};
use wordfall_solver::{Grid, Solver, Trie};

const WORDS: &[&str] = &[
    "ace", "act", "aid", "aim", "air", "ale", "and", "ant", "ape", "arc", "are", "art", "ash",
    "ate", "dare", "date", "dean", "dear", "den", "dire", "dirt", "dot", "ear", "earn", "east",
    "eat", "end", "era", "idea", "inert", "inn", "into", "iron", "last", "late", "lean", "lent",
    "lid", "line", "lint", "lion", "list", "load", "loan", "lost", "near", "neat", "nest", "net",
    "nit", "node", "nose", "note", "oat", "odd", "one", "ore", "rain", "rant", "rate", "read",
    "rent", "rest", "ride", "riot", "road", "rode", "rose", "rot", "said", "salt", "sand", "sane",
    "sea", "seal", "seat", "send", "sent", "side", "silt", "sit", "site", "slate", "slot", "snore",
    "soar", "sore", "star", "stare", "stone", "store", "tan", "tea", "tear", "ten", "tend", "tie",
    "tin", "toe", "ton", "tone", "torn", "trade", "train", "tree", "trend",
];

fn bench_fill_word_cache(c: &mut Criterion, name: &str, rows: usize, cols: usize) {
    let trie = Trie::from_words(WORDS).unwrap();
    let grid = Grid::random(rows, cols, 42);
    c.bench_function(&format!("solver.fill_word_cache.{}", name), |b| {
        b.iter(|| {
            let mut solver = Solver::new(&trie, grid.clone());
            solver.fill_word_cache();
            solver.word_cache().len()
        })
    });
}

fn bench_solve_greedily(c: &mut Criterion, name: &str, rows: usize, cols: usize) {
    let trie = Trie::from_words(WORDS).unwrap();
    let mut solver = Solver::new(&trie, Grid::random(rows, cols, 42));
    c.bench_function(&format!("solver.solve_greedily.{}", name), |b| {
        b.iter(|| {
            solver.reset();
            solver.solve_greedily().unwrap()
        })
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    bench_fill_word_cache(c, "small", 5, 5);
    bench_solve_greedily(c, "small", 5, 5);
}

fn slow_benchmarks(c: &mut Criterion) {
    bench_fill_word_cache(c, "large", 10, 8);
    bench_solve_greedily(c, "large", 10, 8);
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(60);
    targets = criterion_benchmark
}

criterion_group! {
    name = slow;
    config = Criterion::default()
        .sample_size(10);
    targets = slow_benchmarks
}

criterion_main!(benches, slow);
