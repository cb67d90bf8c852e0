use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use super::Measurer;

pub const DEFAULT_URL_LENGTH: usize = 23;

// Code point ranges that weigh a single unit; everything else weighs two.
const LIGHT_RANGES: [(u32, u32); 4] = [
    (0x0000, 0x10FF),
    (0x2000, 0x200D),
    (0x2010, 0x201F),
    (0x2032, 0x2037),
];

// Characters that commonly trail a link in prose but are not part of it.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '\'', '"'];

fn url_pattern() -> &'static Regex {
    static PAT: OnceLock<Regex> = OnceLock::new();
    PAT.get_or_init(|| Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"]+"#).expect("url pattern compiles"))
}

/// Short-message weighting: most code points count 1, wide ones count 2,
/// and every URL counts `url_length` no matter how long it is.
#[derive(Debug, Clone, Copy)]
pub struct WeightedMeasurer {
    url_length: usize,
}

impl Default for WeightedMeasurer {
    fn default() -> Self { Self::new(DEFAULT_URL_LENGTH) }
}

impl WeightedMeasurer {
    pub fn new(url_length: usize) -> Self { Self { url_length } }

    /// Byte spans of the URLs found in `text`, in order.
    pub fn url_spans(text: &str) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        for m in url_pattern().find_iter(text) {
            let raw = m.as_str().trim_end_matches(URL_TRAILING);
            if raw.is_empty() || !is_url(raw) { continue; }
            spans.push((m.start(), m.start() + raw.len()));
        }
        spans
    }
}

impl Measurer for WeightedMeasurer {
    fn measure(&self, text: &str) -> usize {
        let mut total = 0usize;
        let mut cursor = 0usize;
        for (start, end) in Self::url_spans(text) {
            total += weigh_chars(&text[cursor..start]);
            total += self.url_length;
            cursor = end;
        }
        total + weigh_chars(&text[cursor..])
    }
}

fn is_url(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    let parsed = if lower.starts_with("www.") {
        Url::parse(&format!("http://{}", candidate))
    } else {
        Url::parse(candidate)
    };
    match parsed {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| h.contains('.')),
        Err(_) => false,
    }
}

fn weigh_chars(s: &str) -> usize {
    s.chars().map(char_weight).sum()
}

fn char_weight(c: char) -> usize {
    let cp = c as u32;
    if LIGHT_RANGES.iter().any(|(lo, hi)| (*lo..=*hi).contains(&cp)) { 1 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_text_counts_one_per_char() {
        let m = WeightedMeasurer::default();
        assert_eq!(m.measure("Hello World"), 11);
        assert_eq!(m.measure(""), 0);
    }

    #[test]
    fn wide_characters_count_double() {
        let m = WeightedMeasurer::default();
        assert_eq!(m.measure("日本語"), 6);
        assert_eq!(m.measure("a😀"), 3);
        // general punctuation inside the light ranges
        assert_eq!(m.measure("a\u{2014}b"), 3);
    }

    #[test]
    fn urls_have_fixed_weight() {
        let m = WeightedMeasurer::default();
        let long = "https://example.com/some/really/long/path?with=query&and=more";
        assert_eq!(m.measure(long), 23);
        assert_eq!(m.measure("see http://x.io"), 4 + 23);
        assert_eq!(m.measure("go www.example.org now"), 3 + 23 + 4);
    }

    #[test]
    fn trailing_punctuation_is_not_part_of_url() {
        let m = WeightedMeasurer::default();
        assert_eq!(m.measure("read https://example.com/page."), 5 + 23 + 1);
        assert_eq!(WeightedMeasurer::url_spans("(https://example.com)"), vec![(1, 20)]);
    }

    #[test]
    fn hostless_or_dotless_links_are_plain_text() {
        let m = WeightedMeasurer::default();
        assert_eq!(m.measure("http://localhost"), 16);
        assert!(WeightedMeasurer::url_spans("no links here").is_empty());
    }

    #[test]
    fn url_length_is_configurable() {
        let m = WeightedMeasurer::new(30);
        assert_eq!(m.measure("https://example.com"), 30);
    }
}
