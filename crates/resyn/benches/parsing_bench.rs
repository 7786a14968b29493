use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn clean_source(functions: usize) -> String {
    let mut source = String::new();
    for i in 0..functions {
        source.push_str(&format!(
            "public function f{i}() returns int {{ int x = {i} + 2 * 3; int y = x < {i}; }} "
        ));
    }
    source
}

fn broken_source(functions: usize) -> String {
    // Every function is missing its '{' and one ';'.
    let mut source = String::new();
    for i in 0..functions {
        source.push_str(&format!("function f{i}() int x = {i} ; x = x + 1 }} "));
    }
    source
}

fn bench_clean_parse(c: &mut Criterion) {
    let small = clean_source(10);
    let large = clean_source(200);

    c.bench_function("parse_clean_10_functions", |b| {
        b.iter(|| resyn::parse(black_box(&small)));
    });
    c.bench_function("parse_clean_200_functions", |b| {
        b.iter(|| resyn::parse(black_box(&large)));
    });
}

fn bench_recovery(c: &mut Criterion) {
    let broken = broken_source(50);

    c.bench_function("parse_with_recovery_50_functions", |b| {
        b.iter(|| resyn::parse(black_box(&broken)));
    });

    let garbage = ") ( } = ; , > < = ) } ; ".repeat(40);
    c.bench_function("parse_pure_garbage", |b| {
        b.iter(|| resyn::parse(black_box(&garbage)));
    });
}

fn bench_lexer(c: &mut Criterion) {
    let source = clean_source(200);
    c.bench_function("tokenize_200_functions", |b| {
        b.iter(|| resyn::Lexer::tokenize(black_box(&source)));
    });
}

criterion_group!(benches, bench_clean_parse, bench_recovery, bench_lexer);
criterion_main!(benches);
