use std::time::Instant;

use anyhow::Result;
use clap::Args;
use reqwest::Client;
use serde::Serialize;

use crate::config::{ThreadArgs, ThreadConfig};
use crate::output::types::Meta;
use crate::source;
use crate::telemetry::{self};
use crate::telemetry::ops::split::Phase as SplitPhase;
use crate::thread::logic::split_lines;
use crate::thread::{chunk_lines, label_chunks, LabeledChunk};

/// pororoca split: print the thread for a file, URL or literal text
#[derive(Args)]
pub struct SplitCmd {
    /// File path, http(s) URL, literal text, or "-" for stdin
    pub resource: String,
    #[command(flatten)]
    pub thread: ThreadArgs,
}

#[derive(Serialize)]
struct SplitResult {
    lines: usize,
    chunks: usize,
    over_budget: usize,
    budget: usize,
    thread: Vec<LabeledChunk>,
}

pub async fn run(args: SplitCmd) -> Result<()> {
    let t0 = Instant::now();
    let cfg = ThreadConfig::from_env().with_args(&args.thread);

    let log = telemetry::split();
    let _g = log.root_span_kv([
        ("prefix", format!("{:?}", cfg.prefix.as_str())),
        ("label", format!("{:?}", cfg.label.as_str())),
        ("suffix", format!("{:?}", cfg.suffix.as_ref().map(|s| s.as_str()))),
        ("budget", cfg.budget.to_string()),
        ("measure", format!("{:?}", cfg.measure)),
        ("url_length", cfg.url_length.to_string()),
    ]).entered();

    let resolved = {
        let _s = log.span(&SplitPhase::Resolve).entered();
        source::resolve(&Client::new(), &args.resource).await
    };
    for (origin, err) in &resolved.rejected {
        log.debug_kv("origin rejected", [("origin", origin.as_str().to_string()), ("reason", err.to_string())]);
    }
    match resolved.origin {
        Some(origin) => log.debug(format!("text from {} ({} bytes)", origin.as_str(), resolved.text.len())),
        None => log.info("ℹ️  No text found in resource"),
    }

    let measurer = cfg.measure.build(cfg.url_length);

    let lines = { let _s = log.span(&SplitPhase::SplitLines).entered(); split_lines(&resolved.text) };
    let chunks = {
        let _s = log.span_kv(&SplitPhase::Expand, [("lines", lines.len().to_string())]).entered();
        chunk_lines(&lines, &cfg, measurer.as_ref())
    };
    let thread = {
        let _s = log.span_kv(&SplitPhase::Label, [("chunks", chunks.len().to_string())]).entered();
        label_chunks(&chunks, &cfg, measurer.as_ref())
    };

    let over_budget = thread.iter().filter(|c| c.over_budget).count();
    for c in thread.iter().filter(|c| c.over_budget) {
        log.warn_kv(
            "chunk over budget (single unsplittable word)",
            [("position", c.position.to_string()), ("length", c.length.to_string())],
        );
    }
    log.thread_summary(lines.len(), thread.len(), over_budget);

    let result = SplitResult { lines: lines.len(), chunks: thread.len(), over_budget, budget: cfg.budget, thread };
    let meta = Meta {
        duration_ms: Some(t0.elapsed().as_millis()),
        origin: resolved.origin.map(|o| o.as_str().to_string()),
    };
    log.result(&result, Some(meta))?;
    Ok(())
}
