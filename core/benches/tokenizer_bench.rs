use criterion::{criterion_group, criterion_main, Criterion};
use wikisearch_core::extract::clean_wiki_text;
use wikisearch_core::tokenizer::tokenize;

const ARTICLE: &str = "{{Infobox river | name = Danube}} The '''Danube''' is the second-longest \
river in [[Europe]], after the [[Volga River|Volga]]. It flows through much of [[Central Europe|Central]] \
and [[Southeastern Europe]], from the [[Black Forest]] into the [[Black Sea]].<ref>{{cite web}}</ref> \
A large and historically important river, it was once a frontier of the [[Roman Empire]]. &nbsp;";

fn bench_tokenize(c: &mut Criterion) {
    let text = clean_wiki_text(&ARTICLE.repeat(20));
    c.bench_function("tokenize_article", |b| b.iter(|| tokenize(&text)));
}

fn bench_clean(c: &mut Criterion) {
    let raw = ARTICLE.repeat(20);
    c.bench_function("clean_wiki_text", |b| b.iter(|| clean_wiki_text(&raw)));
}

criterion_group!(benches, bench_tokenize, bench_clean);
criterion_main!(benches);
