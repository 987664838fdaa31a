#![allow(dead_code)]

use wikisearch_core::{DocId, Document};

pub fn page_xml(title: &str, id: i64, redirect: Option<&str>, text: &str) -> String {
    let redirect = redirect.map(|t| format!("<redirect title=\"{t}\" />")).unwrap_or_default();
    format!(
        "  <page>\n    <title>{title}</title>\n    <ns>0</ns>\n    <id>{id}</id>\n    {redirect}\n    <revision>\n      <id>9{id}</id>\n      <contributor><username>Editor</username><id>42</id></contributor>\n      <text xml:space=\"preserve\">{text}</text>\n    </revision>\n  </page>"
    )
}

pub fn dump(pages: &[String]) -> String {
    format!(
        "<mediawiki xmlns=\"http://www.mediawiki.org/xml/export-0.10/\" xml:lang=\"en\">\n  <siteinfo><sitename>Wikipedia</sitename></siteinfo>\n{}\n</mediawiki>\n",
        pages.join("\n")
    )
}

/// Body text long enough to pass both length gates.
pub fn article_body(topic: &str) -> String {
    format!(
        "'''{topic}''' is a subject with a long history. [[Scholar|Scholars]] have studied {topic} \
         for centuries and written many books about {topic} and related [[field]]s.&lt;ref&gt;Source&lt;/ref&gt;"
    )
}

pub fn doc(id: DocId, title: &str, content: &str) -> Document {
    Document::new(id, title, format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")), content)
}
