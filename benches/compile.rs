//! Benchmarks for pattern compilation and DFA matching.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use minre::compile;

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_literal_chain", |b| {
        b.iter(|| compile(black_box("abcdefghij")).unwrap())
    });

    c.bench_function("compile_alternation_star", |b| {
        b.iter(|| compile(black_box("(a|b|c|d)*e")).unwrap())
    });

    // wildcards force the full printable-ASCII alphabet through subset
    // construction and minimization
    c.bench_function("compile_wildcard", |b| {
        b.iter(|| compile(black_box("a.*b")).unwrap())
    });

    c.bench_function("compile_nested_groups", |b| {
        b.iter(|| compile(black_box("((a|b)+(c|d)?)*e")).unwrap())
    });
}

fn bench_accepts(c: &mut Criterion) {
    let dfa = compile("(a|b)*c").unwrap();
    let long_match = "ab".repeat(4096) + "c";
    let long_miss = "ab".repeat(4096) + "d";

    c.bench_function("accepts_long_match", |b| {
        b.iter(|| dfa.accepts(black_box(&long_match)))
    });

    c.bench_function("accepts_long_miss", |b| {
        b.iter(|| dfa.accepts(black_box(&long_miss)))
    });

    let wild = compile(".*z").unwrap();
    let printable = "The quick brown fox jumps over the lazy dog. ".repeat(64) + "z";
    c.bench_function("accepts_wildcard", |b| {
        b.iter(|| wild.accepts(black_box(&printable)))
    });
}

criterion_group!(benches, bench_compile, bench_accepts);
criterion_main!(benches);
