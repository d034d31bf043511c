use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use modstats_core::{Document, ModListEntry, ModVersion, PageKind, extract, parse_author_page, rank_total_map};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("../../tests/fixtures/{}", name)).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let pages = [
        ("daily_list", fixture("modmigrationprogress.html")),
        ("author", fixture("ranksbysteamid.html")),
        ("history", fixture("moddownloadhistory.html")),
    ];

    let mut group = c.benchmark_group("parse");

    for (name, html) in &pages {
        group.bench_with_input(BenchmarkId::new("document", name), html, |b, html| {
            b.iter(|| Document::parse(black_box(html)))
        });
    }

    group.finish();
}

fn bench_map_tables(c: &mut Criterion) {
    let daily = Document::parse(&fixture("modmigrationprogress.html"));
    let all_time = Document::parse(&fixture("modmigrationprogressalltime.html"));
    let history = Document::parse(&fixture("moddownloadhistory.html"));

    let mut group = c.benchmark_group("map_table");

    group.bench_function("mod_list", |b| {
        b.iter(|| extract::<ModListEntry>(black_box(&daily), PageKind::ModList))
    });
    group.bench_function("rank_total_map", |b| b.iter(|| rank_total_map(black_box(&all_time))));
    group.bench_function("mod_history", |b| {
        b.iter(|| extract::<ModVersion>(black_box(&history), PageKind::ModHistory))
    });

    group.finish();
}

fn bench_author_page(c: &mut Criterion) {
    let doc = Document::parse(&fixture("ranksbysteamid.html"));

    c.bench_function("author_page", |b| b.iter(|| parse_author_page(black_box(&doc))));
}

criterion_group!(benches, bench_parse, bench_map_tables, bench_author_page);
criterion_main!(benches);
