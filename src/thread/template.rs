use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_PREFIX: &str = "{{current}}/{{total}}-) ";
pub const DEFAULT_LABEL: &str = "{{current}}/{{total}} ";
pub const DEFAULT_SUFFIX: &str = " (...)";

fn placeholder() -> &'static Regex {
    static PAT: OnceLock<Regex> = OnceLock::new();
    PAT.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern compiles"))
}

/// Position of a chunk within a numbering pass. `current` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub current: usize,
    pub total: usize,
}

impl Position {
    pub fn new(index: usize, total: usize) -> Self { Self { current: index + 1, total } }
}

/// Mustache-style label template. Only `{{current}}` and `{{total}}` are
/// substituted; any other placeholder renders as an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self { Self { source: source.into() } }

    pub fn as_str(&self) -> &str { &self.source }

    pub fn render(&self, pos: Position) -> String {
        placeholder()
            .replace_all(&self.source, |caps: &regex::Captures| match &caps[1] {
                "current" => pos.current.to_string(),
                "total" => pos.total.to_string(),
                _ => String::new(),
            })
            .into_owned()
    }
}

impl Default for Template {
    fn default() -> Self { Self::new(DEFAULT_LABEL) }
}
