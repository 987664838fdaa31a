//! Picks the densest window of a document for display.

pub const SNIPPET_LEN: usize = 200;
pub const SNIPPET_STRIDE: usize = 50;
pub const ELLIPSIS: &str = "...";

/// Excerpt of `content` with the most query-term occurrences. Windows are
/// measured in characters; the earliest window wins ties. Content that
/// already fits is returned verbatim.
pub fn snippet(content: &str, terms: &[String]) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= SNIPPET_LEN {
        return content.to_string();
    }
    // One lowercase char per source char keeps offsets aligned.
    let lowered: Vec<char> = chars.iter().map(|c| c.to_lowercase().next().unwrap_or(*c)).collect();

    let mut best_start = 0;
    let mut best_hits = 0;
    let mut start = 0;
    while start + SNIPPET_LEN <= chars.len() {
        let window: String = lowered[start..start + SNIPPET_LEN].iter().collect();
        let hits = count_hits(&window, terms);
        if hits > best_hits {
            best_hits = hits;
            best_start = start;
        }
        start += SNIPPET_STRIDE;
    }

    let end = best_start + SNIPPET_LEN;
    let cut_head = best_start > 0 && !chars[best_start - 1].is_whitespace();
    let cut_tail = end < chars.len() && !chars[end].is_whitespace();
    let mut out = trim_to_words(&chars[best_start..end], cut_head, cut_tail);
    out.push_str(ELLIPSIS);
    out
}

fn count_hits(window: &str, terms: &[String]) -> usize {
    terms.iter().filter(|t| !t.is_empty()).map(|t| window.matches(t.as_str()).count()).sum()
}

/// Drop a partial word at either edge of `window`.
fn trim_to_words(window: &[char], cut_head: bool, cut_tail: bool) -> String {
    let mut lo = 0;
    let mut hi = window.len();
    if cut_head {
        if let Some(p) = window.iter().position(|c| c.is_whitespace()) {
            lo = p + 1;
        }
    }
    if cut_tail {
        if let Some(p) = window[lo..].iter().rposition(|c| c.is_whitespace()) {
            hi = lo + p;
        }
    }
    let trimmed: String = window[lo..hi].iter().collect();
    let trimmed = trimmed.trim();
    if trimmed.is_empty() {
        window.iter().collect::<String>().trim().to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(ts: &[&str]) -> Vec<String> { ts.iter().map(|t| t.to_string()).collect() }

    #[test]
    fn short_content_is_verbatim() {
        let text = "a".repeat(SNIPPET_LEN);
        assert_eq!(snippet(&text, &terms(&["a"])), text);
    }

    #[test]
    fn picks_the_densest_window() {
        let filler = "lorem ipsum dolor sit amet ".repeat(20);
        let content = format!("{filler}the comet and another comet passed {filler}");
        let s = snippet(&content, &terms(&["comet"]));
        assert!(s.contains("comet"));
        assert!(s.ends_with(ELLIPSIS));
        assert!(s.chars().count() <= SNIPPET_LEN + ELLIPSIS.len());
    }

    #[test]
    fn no_hits_uses_the_first_window() {
        let content = "alpha beta gamma delta ".repeat(20);
        let s = snippet(&content, &terms(&["zeta"]));
        assert!(s.starts_with("alpha beta"));
        assert!(s.ends_with(ELLIPSIS));
    }

    #[test]
    fn partial_words_are_trimmed() {
        let window: Vec<char> = "lo world of wor".chars().collect();
        assert_eq!(trim_to_words(&window, true, true), "world of");
        assert_eq!(trim_to_words(&window, false, false), "lo world of wor");
    }
}
