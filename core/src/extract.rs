//! Streaming page extraction from MediaWiki XML dumps.
//!
//! Pages are pulled one at a time off a `quick-xml` reader, so memory stays
//! bounded by the largest single page rather than the dump.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::DocId;
use bzip2::read::MultiBzDecoder;
use lazy_static::lazy_static;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

lazy_static! {
    static ref TEMPLATE_RE: Regex = Regex::new(r"\{\{[^}]*\}\}").expect("valid regex");
    static ref PIPED_LINK_RE: Regex = Regex::new(r"\[\[[^|\]]*\|([^\]]*)\]\]").expect("valid regex");
    static ref LINK_RE: Regex = Regex::new(r"\[\[([^\]]*)\]\]").expect("valid regex");
    static ref BRACKET_RE: Regex = Regex::new(r"\[[^\]]*\]").expect("valid regex");
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").expect("valid regex");
    static ref ENTITY_RE: Regex = Regex::new(r"&[a-zA-Z]+;").expect("valid regex");
    static ref SPACE_RE: Regex = Regex::new(r"\s+").expect("valid regex");
}

const SKIPPED_PREFIXES: &[&str] = &["File:", "Category:", "Template:", "Wikipedia:", "User:", "Talk:"];
pub const MIN_RAW_CHARS: usize = 100;
pub const MIN_CLEAN_CHARS: usize = 50;

/// One `<page>` as it appears in the dump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WikiPage {
    pub title: String,
    pub id: i64,
    pub redirect: Option<String>,
    pub text: String,
}

/// Why a page was or wasn't admitted, checked before any cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accept,
    Redirect,
    Namespaced,
    TooShort,
}

pub fn admission(page: &WikiPage) -> Admission {
    if page.redirect.as_deref().is_some_and(|t| !t.is_empty()) {
        return Admission::Redirect;
    }
    if SKIPPED_PREFIXES.iter().any(|p| page.title.starts_with(p)) {
        return Admission::Namespaced;
    }
    if page.text.trim().chars().count() < MIN_RAW_CHARS {
        return Admission::TooShort;
    }
    Admission::Accept
}

pub fn should_index(page: &WikiPage) -> bool { admission(page) == Admission::Accept }

/// Strip wiki markup down to plain prose.
pub fn clean_wiki_text(text: &str) -> String {
    let text = TEMPLATE_RE.replace_all(text, "");
    let text = PIPED_LINK_RE.replace_all(&text, "$1");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = BRACKET_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, "");
    let text = ENTITY_RE.replace_all(&text, "");
    let text = SPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Per-extraction counters. Every page seen lands in exactly one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub pages: u64,
    pub emitted: u64,
    pub redirects: u64,
    pub namespaced: u64,
    pub too_short_raw: u64,
    pub too_short_clean: u64,
    pub malformed: u64,
}

impl ExtractStats {
    pub fn merge(&mut self, other: &ExtractStats) {
        self.pages += other.pages;
        self.emitted += other.emitted;
        self.redirects += other.redirects;
        self.namespaced += other.namespaced;
        self.too_short_raw += other.too_short_raw;
        self.too_short_clean += other.too_short_clean;
        self.malformed += other.malformed;
    }

    pub fn rejected(&self) -> u64 {
        self.redirects + self.namespaced + self.too_short_raw + self.too_short_clean
    }
}

/// Open `path` for streaming, decompressing `.bz2` archives on the fly.
pub fn open_source(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let compressed = path.extension().and_then(|e| e.to_str()) == Some("bz2");
    if compressed {
        Ok(Box::new(BufReader::new(MultiBzDecoder::new(BufReader::new(file)))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Turns a dump into a sequence of [`Document`]s with ids assigned in order.
pub struct Extractor {
    url_base: String,
    next_id: DocId,
    stats: ExtractStats,
}

impl Extractor {
    pub fn new(url_base: impl Into<String>) -> Self {
        Self { url_base: url_base.into(), next_id: 1, stats: ExtractStats::default() }
    }

    /// Continue numbering from `first_id` instead of 1.
    pub fn starting_at(mut self, first_id: DocId) -> Self {
        self.next_id = first_id;
        self
    }

    /// Id the next accepted page will receive.
    pub fn next_id(&self) -> DocId { self.next_id }

    pub fn stats(&self) -> &ExtractStats { &self.stats }

    pub fn extract_file<F>(&mut self, path: &Path, emit: F) -> Result<()>
    where
        F: FnMut(Document) -> Result<()>,
    {
        let reader = open_source(path)?;
        self.extract_reader(reader, path, emit)
    }

    /// Stream pages from `input`, handing each accepted document to `emit`.
    /// `source` only labels errors. An error from `emit` aborts extraction.
    pub fn extract_reader<R, F>(&mut self, input: R, source: &Path, mut emit: F) -> Result<()>
    where
        R: BufRead,
        F: FnMut(Document) -> Result<()>,
    {
        let mut reader = Reader::from_reader(input);
        let mut buf = Vec::new();
        let mut page: Option<PageDecoder> = None;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::Xml { path: source.to_path_buf(), source: e })?;
            match event {
                Event::Start(e) => match page.as_mut() {
                    Some(p) => p.open(&e),
                    None if e.local_name().as_ref() == b"page" => page = Some(PageDecoder::default()),
                    None => {}
                },
                Event::Empty(e) => {
                    if let Some(p) = page.as_mut() {
                        p.empty(&e);
                    }
                }
                Event::Text(t) => {
                    if let Some(p) = page.as_mut() {
                        match t.unescape() {
                            Ok(text) => p.text(&text),
                            Err(_) => p.malformed = true,
                        }
                    }
                }
                Event::CData(c) => {
                    if let Some(p) = page.as_mut() {
                        p.text(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::End(_) => {
                    let finished = match page.as_mut() {
                        Some(p) => p.close(),
                        None => false,
                    };
                    if finished {
                        if let Some(decoder) = page.take() {
                            self.handle_page(decoder, &mut emit)?;
                        }
                    }
                }
                Event::Eof => return Ok(()),
                _ => {}
            }
            buf.clear();
        }
    }

    fn handle_page<F>(&mut self, decoder: PageDecoder, emit: &mut F) -> Result<()>
    where
        F: FnMut(Document) -> Result<()>,
    {
        self.stats.pages += 1;
        let page = match decoder.finish() {
            Some(page) => page,
            None => {
                self.stats.malformed += 1;
                tracing::warn!(page = self.stats.pages, "skipping malformed page");
                return Ok(());
            }
        };
        match admission(&page) {
            Admission::Accept => {}
            Admission::Redirect => {
                self.stats.redirects += 1;
                return Ok(());
            }
            Admission::Namespaced => {
                self.stats.namespaced += 1;
                return Ok(());
            }
            Admission::TooShort => {
                self.stats.too_short_raw += 1;
                return Ok(());
            }
        }
        match self.create_document(&page) {
            Some(doc) => {
                self.stats.emitted += 1;
                emit(doc)
            }
            None => {
                self.stats.too_short_clean += 1;
                Ok(())
            }
        }
    }

    fn create_document(&mut self, page: &WikiPage) -> Option<Document> {
        let content = clean_wiki_text(&page.text);
        if content.chars().count() < MIN_CLEAN_CHARS {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        let url = format!("{}{}", self.url_base, page.title.replace(' ', "_"));
        Some(Document::new(id, page.title.clone(), url, content))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Id,
    Text,
    Other,
}

/// Accumulates the fields of one `<page>` from the event stream.
#[derive(Default)]
struct PageDecoder {
    path: Vec<Vec<u8>>,
    title: Option<String>,
    id: Option<String>,
    redirect: Option<String>,
    text: String,
    malformed: bool,
}

impl PageDecoder {
    fn field(&self) -> Field {
        let names: Vec<&[u8]> = self.path.iter().map(Vec::as_slice).collect();
        match names.as_slice() {
            [b"title"] => Field::Title,
            [b"id"] => Field::Id,
            [b"revision", b"text"] => Field::Text,
            _ => Field::Other,
        }
    }

    fn open(&mut self, e: &BytesStart) {
        self.path.push(e.local_name().as_ref().to_vec());
        match self.field() {
            Field::Title => {
                self.title.get_or_insert_with(String::new);
            }
            Field::Id if self.id.is_none() => self.id = Some(String::new()),
            _ => {}
        }
        if self.path.len() == 1 && e.local_name().as_ref() == b"redirect" {
            self.read_redirect(e);
        }
    }

    fn empty(&mut self, e: &BytesStart) {
        if self.path.is_empty() {
            match e.local_name().as_ref() {
                b"redirect" => self.read_redirect(e),
                b"title" => {
                    self.title.get_or_insert_with(String::new);
                }
                _ => {}
            }
        }
    }

    fn read_redirect(&mut self, e: &BytesStart) {
        match e.try_get_attribute("title") {
            Ok(Some(attr)) => match attr.unescape_value() {
                Ok(value) => self.redirect = Some(value.into_owned()),
                Err(_) => self.malformed = true,
            },
            Ok(None) => {}
            Err(_) => self.malformed = true,
        }
    }

    fn text(&mut self, text: &str) {
        match self.field() {
            Field::Title => self.title.get_or_insert_with(String::new).push_str(text),
            // Only the page id; revision and contributor ids live deeper.
            Field::Id => {
                if let Some(id) = self.id.as_mut() {
                    id.push_str(text);
                }
            }
            Field::Text => self.text.push_str(text),
            Field::Other => {}
        }
    }

    /// Pop one element; returns true once the enclosing `</page>` is reached.
    fn close(&mut self) -> bool { self.path.pop().is_none() }

    fn finish(self) -> Option<WikiPage> {
        if self.malformed {
            return None;
        }
        let title = self.title?;
        let id = self.id?.trim().parse::<i64>().ok()?;
        Some(WikiPage { title: title.trim().to_string(), id, redirect: self.redirect, text: self.text })
    }
}
