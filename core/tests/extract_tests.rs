mod common;

use common::{article_body, dump, page_xml};
use std::path::Path;
use wikisearch_core::error::Error;
use wikisearch_core::extract::{ExtractStats, Extractor};
use wikisearch_core::Document;

fn run(xml: &str) -> (Vec<Document>, ExtractStats) {
    let mut extractor = Extractor::new("https://en.wikipedia.org/wiki/");
    let mut docs = Vec::new();
    extractor
        .extract_reader(xml.as_bytes(), Path::new("fixture.xml"), |doc| {
            docs.push(doc);
            Ok(())
        })
        .unwrap();
    (docs, *extractor.stats())
}

#[test]
fn emits_articles_with_sequential_ids_and_urls() {
    let xml = dump(&[
        page_xml("Ada Lovelace", 501, None, &article_body("mathematics")),
        page_xml("Alan Turing", 777, None, &article_body("computation")),
    ]);
    let (docs, stats) = run(&xml);

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id, 1);
    assert_eq!(docs[1].id, 2);
    assert_eq!(docs[0].title, "Ada Lovelace");
    assert_eq!(docs[0].url, "https://en.wikipedia.org/wiki/Ada_Lovelace");
    assert!(docs[0].content.contains("Scholars have studied mathematics"));
    assert!(!docs[0].content.contains("[["));
    assert!(!docs[0].content.contains("<ref>"));
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.emitted, 2);
}

#[test]
fn redirects_and_namespaces_are_never_emitted() {
    let body = article_body("geology");
    let xml = dump(&[
        page_xml("Rocks", 1, Some("Rock"), &body),
        page_xml("Category:Foo", 2, None, &body),
        page_xml("Template:Infobox", 3, None, &body),
        page_xml("Talk:Rock", 4, None, &body),
        page_xml("Rock", 5, None, &body),
    ]);
    let (docs, stats) = run(&xml);

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "Rock");
    assert_eq!(stats.redirects, 1);
    assert_eq!(stats.namespaced, 3);
}

#[test]
fn cleaned_length_gate_is_inclusive_at_fifty() {
    let padding = format!("{{{{Infobox {}}}}}", "p".repeat(80));
    let forty = "a".repeat(40);
    let fifty = "b".repeat(50);
    let xml = dump(&[
        page_xml("Forty", 1, None, &format!("{padding}{forty}")),
        page_xml("Fifty", 2, None, &format!("{padding}{fifty}")),
    ]);
    let (docs, stats) = run(&xml);

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "Fifty");
    assert_eq!(docs[0].content, fifty);
    assert_eq!(docs[0].id, 1);
    assert_eq!(stats.too_short_clean, 1);
}

#[test]
fn short_raw_text_is_rejected_before_cleaning() {
    let xml = dump(&[page_xml("Stub", 1, None, "Too short to index.")]);
    let (docs, stats) = run(&xml);
    assert!(docs.is_empty());
    assert_eq!(stats.too_short_raw, 1);
}

#[test]
fn malformed_pages_are_counted_and_skipped() {
    let body = article_body("astronomy");
    let bad_id = page_xml("Broken", 1, None, &body).replace("<id>1</id>", "<id>not-a-number</id>");
    let no_title = page_xml("Untitled", 2, None, &body).replace("<title>Untitled</title>", "");
    let xml = dump(&[bad_id, no_title, page_xml("Astronomy", 3, None, &body)]);
    let (docs, stats) = run(&xml);

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "Astronomy");
    assert_eq!(stats.malformed, 2);
    assert_eq!(stats.pages, 3);
}

#[test]
fn entities_in_text_are_decoded_then_stripped() {
    let text = format!("{} &lt;b&gt;bold&lt;/b&gt; &amp;nbsp;tail", article_body("music"));
    let xml = dump(&[page_xml("Music", 1, None, &text)]);
    let (docs, _) = run(&xml);
    assert!(docs[0].content.ends_with("bold tail"));
}

#[test]
fn broken_xml_aborts_extraction() {
    let xml = "<mediawiki><page><title>Oops</titl></page></mediawiki>";
    let mut extractor = Extractor::new("https://en.wikipedia.org/wiki/");
    let err = extractor
        .extract_reader(xml.as_bytes(), Path::new("broken.xml"), |_| Ok(()))
        .unwrap_err();
    assert!(matches!(err, Error::Xml { .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let mut extractor = Extractor::new("https://en.wikipedia.org/wiki/");
    let err = extractor.extract_file(Path::new("/definitely/not/here.xml.bz2"), |_| Ok(())).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn reads_bzip2_archives() {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dump.xml.bz2");
    let xml = dump(&[page_xml("Bzip", 1, None, &article_body("compression"))]);
    let file = std::fs::File::create(&path).unwrap();
    let mut encoder = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
    encoder.write_all(xml.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let mut extractor = Extractor::new("https://en.wikipedia.org/wiki/");
    let mut titles = Vec::new();
    extractor
        .extract_file(&path, |doc| {
            titles.push(doc.title);
            Ok(())
        })
        .unwrap();
    assert_eq!(titles, vec!["Bzip"]);
}
