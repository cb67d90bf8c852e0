use std::env;

use crate::measure::weighted::DEFAULT_URL_LENGTH;
use crate::measure::MeasureKind;
use crate::thread::template::{Template, DEFAULT_LABEL, DEFAULT_PREFIX, DEFAULT_SUFFIX};

pub const DEFAULT_BUDGET: usize = 140;

/// Everything the segmentation core needs for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadConfig {
    /// Per-line template reserved while deciding whether a line must split.
    pub prefix: Template,
    /// Whole-thread label applied to every emitted chunk.
    pub label: Template,
    /// Continuation marker; `None` keeps the default pipeline suffix-free.
    pub suffix: Option<Template>,
    pub budget: usize,
    pub measure: MeasureKind,
    pub url_length: usize,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            prefix: Template::new(DEFAULT_PREFIX),
            label: Template::new(DEFAULT_LABEL),
            suffix: None,
            budget: DEFAULT_BUDGET,
            measure: MeasureKind::Weighted,
            url_length: DEFAULT_URL_LENGTH,
        }
    }
}

impl ThreadConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(prefix) = env::var("POROROCA_PREFIX") {
            cfg.prefix = Template::new(prefix);
        }
        if let Ok(label) = env::var("POROROCA_LABEL") {
            cfg.label = Template::new(label);
        }
        if let Ok(suffix) = env::var("POROROCA_SUFFIX") {
            cfg.suffix = Some(Template::new(suffix));
        }
        if let Ok(budget) = env::var("POROROCA_BUDGET") {
            if let Ok(parsed) = budget.parse::<usize>() {
                cfg.budget = parsed;
            }
        }
        if let Ok(kind) = env::var("POROROCA_MEASURE") {
            if let Some(parsed) = MeasureKind::parse(&kind) {
                cfg.measure = parsed;
            }
        }
        if let Ok(len) = env::var("POROROCA_URL_LENGTH") {
            if let Ok(parsed) = len.parse::<usize>() {
                cfg.url_length = parsed;
            }
        }
        cfg
    }

    /// Layer CLI flags over the environment-derived config.
    pub fn with_args(mut self, args: &ThreadArgs) -> Self {
        if let Some(prefix) = &args.prefix { self.prefix = Template::new(prefix.clone()); }
        if let Some(label) = &args.label { self.label = Template::new(label.clone()); }
        match &args.suffix {
            Some(Some(suffix)) => self.suffix = Some(Template::new(suffix.clone())),
            Some(None) => self.suffix = Some(Template::new(DEFAULT_SUFFIX)),
            None => {}
        }
        if let Some(budget) = args.budget { self.budget = budget; }
        if let Some(kind) = args.measure { self.measure = kind; }
        if let Some(len) = args.url_length { self.url_length = len; }
        self
    }
}

/// Thread-shaping flags shared by `split` and `publish`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ThreadArgs {
    /// Per-line prefix template, e.g. "{{current}}/{{total}}-) "
    #[arg(long)]
    pub prefix: Option<String>,
    /// Label template applied to every chunk of the final thread
    #[arg(long)]
    pub label: Option<String>,
    /// Append a continuation marker to all but the last chunk (default " (...)")
    #[arg(long, num_args = 0..=1)]
    pub suffix: Option<Option<String>>,
    #[arg(long)]
    pub budget: Option<usize>,
    #[arg(long, value_enum)]
    pub measure: Option<MeasureKind>,
    /// Fixed weight of a URL under the weighted measure
    #[arg(long)]
    pub url_length: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_thread_format() {
        let cfg = ThreadConfig::default();
        assert_eq!(cfg.prefix.as_str(), "{{current}}/{{total}}-) ");
        assert_eq!(cfg.label.as_str(), "{{current}}/{{total}} ");
        assert_eq!(cfg.suffix, None);
        assert_eq!(cfg.budget, 140);
        assert_eq!(cfg.measure, MeasureKind::Weighted);
        assert_eq!(cfg.url_length, 23);
    }

    #[test]
    fn args_override_config() {
        let args = ThreadArgs {
            prefix: Some("> ".into()),
            label: None,
            suffix: Some(None),
            budget: Some(280),
            measure: Some(MeasureKind::Chars),
            url_length: None,
        };
        let cfg = ThreadConfig::default().with_args(&args);
        assert_eq!(cfg.prefix.as_str(), "> ");
        assert_eq!(cfg.label.as_str(), "{{current}}/{{total}} ");
        assert_eq!(cfg.suffix.as_ref().map(Template::as_str), Some(" (...)"));
        assert_eq!(cfg.budget, 280);
        assert_eq!(cfg.measure, MeasureKind::Chars);
        assert_eq!(cfg.url_length, 23);
    }

    #[test]
    fn explicit_suffix_value_wins() {
        let args = ThreadArgs { suffix: Some(Some(" ->".into())), ..Default::default() };
        let cfg = ThreadConfig::default().with_args(&args);
        assert_eq!(cfg.suffix, Some(Template::new(" ->")));
    }
}
