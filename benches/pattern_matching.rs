use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use typedroute::pattern::{ParamMap, RoutePattern};

fn patterns() -> Vec<RoutePattern> {
    [
        "/",
        "/zoo/animals",
        "/zoo/animals/[id]",
        "/zoo/animals/[id]/toys/[toy_id]",
        "/zoo/[category]/animals/[id]/habitats/[habitat_id]/sections/[section_id]",
        "/docs/[...slug]",
        "/shop/[[...filters]]",
        "/complex/[a]/[b]/[c]/[d]/[e]/[f]/[g]/[h]/[i]",
    ]
    .iter()
    .filter_map(|p| RoutePattern::parse(p).ok())
    .collect()
}

fn bench_match(c: &mut Criterion) {
    let patterns = patterns();
    let test_paths = [
        "/zoo/animals/123",
        "/zoo/animals/123/toys/456",
        "/zoo/cats/animals/123/habitats/88/sections/5",
        "/docs/guide/install/linux",
        "/shop",
        "/complex/1/2/3/4/5/6/7/8/9",
        "/does/not/exist",
    ];
    c.bench_function("pattern_match_first", |b| {
        b.iter(|| {
            for path in &test_paths {
                let hit = patterns.iter().find_map(|p| p.match_path(path));
                black_box(&hit);
            }
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("pattern_parse", |b| {
        b.iter(|| {
            black_box(RoutePattern::parse(black_box(
                "/zoo/[category]/animals/[id]/habitats/[habitat_id]/[[...rest]]",
            )))
        })
    });
}

fn bench_build(c: &mut Criterion) {
    let pattern = RoutePattern::parse("/zoo/[category]/animals/[id]/files/[...path]")
        .unwrap_or_else(|e| panic!("{e}"));
    let mut params = ParamMap::new();
    params
        .insert("category", "cats")
        .insert("id", "42")
        .insert_many("path", ["a", "b c", "d"]);
    c.bench_function("pattern_build", |b| {
        b.iter(|| black_box(pattern.build(black_box(&params))))
    });
}

criterion_group!(benches, bench_match, bench_parse, bench_build);
criterion_main!(benches);
