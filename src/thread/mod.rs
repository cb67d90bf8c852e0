//! Text -> labeled thread. Pure and synchronous; every collaborator (sources,
//! output, publishing) lives outside this module.

pub mod label;
pub mod logic;
pub mod template;

use crate::config::ThreadConfig;
use crate::measure::Measurer;

pub use label::LabeledChunk;

use self::label::{continuation_label, label_all, measure_labeled, template_label, LabelFn};
use self::logic::{expand_line, split_lines};
use self::template::Position;

/// Unlabeled chunks in thread order. Lines are numbered against the line
/// count here; the final labels are numbered against the chunk count later,
/// so any room the final label needs beyond the line prefix is reserved too.
/// The chunk count only grows as that reserve widens, so repacking stops as
/// soon as it settles.
pub fn chunk_lines(
    lines: &[String],
    cfg: &ThreadConfig,
    measurer: &dyn Measurer,
) -> Vec<String> {
    let mut total = lines.len().max(1);
    loop {
        let last = Position::new(total - 1, total);
        let label_width = measurer.measure(&cfg.label.render(last));
        let chunks: Vec<String> = lines
            .iter()
            .enumerate()
            .flat_map(|(i, line)| {
                let pos = Position::new(i, lines.len());
                let prefix_width = measurer.measure(&cfg.prefix.render(pos));
                let budget = cfg.budget.saturating_sub(label_width.saturating_sub(prefix_width));
                let suffix = cfg.suffix.as_ref();
                expand_line(line, i, lines.len(), &cfg.prefix, suffix, budget, measurer)
            })
            .collect();
        if chunks.len() <= total {
            return chunks;
        }
        total = chunks.len();
    }
}

/// Final labeling pass followed by a re-measure against the budget.
pub fn label_chunks(
    chunks: &[String],
    cfg: &ThreadConfig,
    measurer: &dyn Measurer,
) -> Vec<LabeledChunk> {
    let prefix = template_label(&cfg.label);
    let labeled = match &cfg.suffix {
        Some(tpl) => {
            let suffix = continuation_label(tpl);
            label_all(chunks, &prefix, Some(&suffix as LabelFn<'_>))
        }
        None => label_all(chunks, &prefix, None),
    };
    measure_labeled(labeled, cfg.budget, measurer)
}

pub fn build_thread(text: &str, cfg: &ThreadConfig, measurer: &dyn Measurer) -> Vec<LabeledChunk> {
    let lines = split_lines(text);
    let chunks = chunk_lines(&lines, cfg, measurer);
    label_chunks(&chunks, cfg, measurer)
}
