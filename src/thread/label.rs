use serde::Serialize;

use crate::measure::Measurer;

use super::template::{Position, Template};

/// Label hook: receives the chunk, its 0-based index and the whole sequence.
pub type LabelFn<'a> = &'a dyn Fn(&str, usize, &[String]) -> String;

/// A chunk as emitted: label applied, measured once more against the budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledChunk {
    pub position: usize,
    pub text: String,
    pub length: usize,
    pub over_budget: bool,
}

/// Prefix (and optionally suffix) every chunk. Numbering covers the whole
/// sequence, independent of any per-line numbering used while splitting.
pub fn label_all(chunks: &[String], prefix: LabelFn<'_>, suffix: Option<LabelFn<'_>>) -> Vec<String> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let head = prefix(chunk.as_str(), i, chunks);
            let tail = suffix.map(|f| f(chunk.as_str(), i, chunks)).unwrap_or_default();
            format!("{}{}{}", head, chunk, tail)
        })
        .collect()
}

/// Hook rendering `template` at each chunk's position.
pub fn template_label(template: &Template) -> impl Fn(&str, usize, &[String]) -> String + '_ {
    move |_chunk, i, all| template.render(Position::new(i, all.len()))
}

/// Hook rendering `template` on every chunk except the last, marking that
/// the thread continues.
pub fn continuation_label(template: &Template) -> impl Fn(&str, usize, &[String]) -> String + '_ {
    move |_chunk, i, all| {
        if i + 1 < all.len() { template.render(Position::new(i, all.len())) } else { String::new() }
    }
}

pub fn measure_labeled(labeled: Vec<String>, budget: usize, measurer: &dyn Measurer) -> Vec<LabeledChunk> {
    labeled
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let length = measurer.measure(&text);
            LabeledChunk { position: i + 1, over_budget: length > budget, length, text }
        })
        .collect()
}
