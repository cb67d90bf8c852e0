// Core segmentation: lines -> words -> budget-sized chunks.

use regex::Regex;
use std::sync::OnceLock;

use crate::measure::Measurer;

use super::template::{Position, Template};

fn line_breaks() -> &'static Regex {
    static PAT: OnceLock<Regex> = OnceLock::new();
    PAT.get_or_init(|| Regex::new(r"\r?\n").expect("line break pattern compiles"))
}

/// Split on `\r?\n` and drop blank lines. Surviving lines keep their inner
/// and surrounding whitespace.
pub fn split_lines(text: &str) -> Vec<String> {
    line_breaks()
        .split(text)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Greedy left-to-right repack of `words` into space-joined chunks whose
/// measured length stays within `budget`. A word that alone exceeds the
/// budget becomes its own chunk; words are never cut.
pub fn pack_words<S: AsRef<str>>(
    words: &[S],
    budget: usize,
    measurer: &dyn Measurer,
) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Option<String> = None;

    for word in words {
        let word = word.as_ref();
        let candidate = match &current {
            Some(line) => format!("{} {}", line, word),
            None => word.to_string(),
        };
        if measurer.measure(&candidate) <= budget {
            current = Some(candidate);
            continue;
        }
        if let Some(sealed) = current.take() { out.push(sealed); }
        current = Some(word.to_string());
    }

    if let Some(sealed) = current { out.push(sealed); }
    out
}

/// Decide whether `line` fits under its per-line prefix (and suffix, when one
/// is configured). Lines that fit come back untouched; the rest are repacked
/// word by word with the label room reserved out of the budget.
pub fn expand_line(
    line: &str,
    index: usize,
    line_count: usize,
    prefix: &Template,
    suffix: Option<&Template>,
    budget: usize,
    measurer: &dyn Measurer,
) -> Vec<String> {
    let pos = Position::new(index, line_count);
    let reserved = measurer.measure(&prefix.render(pos))
        + suffix.map(|s| measurer.measure(&s.render(pos))).unwrap_or(0);

    if reserved + measurer.measure(line) <= budget {
        return vec![line.to_string()];
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    pack_words(&words, budget.saturating_sub(reserved), measurer)
}
