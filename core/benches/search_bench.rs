use criterion::{criterion_group, criterion_main, Criterion};
use wikisearch_core::{BuildConfig, Document, Engine, IndexBuilder};

const WORDS: &[&str] = &[
    "river", "mountain", "empire", "volcano", "glacier", "orchestra", "theorem", "protein",
    "satellite", "harbor", "cathedral", "dynasty", "migration", "alloy", "monsoon", "parliament",
];

fn corpus(n: u32) -> Vec<Document> {
    (1..=n)
        .map(|i| {
            let content: Vec<&str> = (0..120).map(|j| WORDS[((i as usize) * 7 + j * 3) % WORDS.len()]).collect();
            Document::new(i, format!("Article {i}"), format!("https://example.org/{i}"), content.join(" "))
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let mut builder = IndexBuilder::new(BuildConfig::default());
    builder.ingest_documents(corpus(2000)).expect("ingest");
    builder.finalize().expect("finalize");
    let engine = Engine::from_snapshot(builder.into_snapshot().expect("snapshot"));

    c.bench_function("search_two_terms", |b| b.iter(|| engine.search("volcano glacier", 10)));
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
