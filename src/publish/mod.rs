pub mod client;
pub mod types;

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Args;
use reqwest::Client;

use crate::config::{ThreadArgs, ThreadConfig};
use crate::output::types::Meta;
use crate::source;
use crate::telemetry::{self};
use crate::telemetry::ctx::LogCtx;
use crate::telemetry::ops::publish::{Phase as PublishPhase, Publish as PublishOp};
use crate::thread::{build_thread, LabeledChunk};

use self::client::{HttpPublisher, Post, PublishError, Publisher, PublisherConfig};
use self::types::{PostedChunk, PublishPlan, PublishResult};

/// pororoca publish: plan-only by default; use --apply to post
#[derive(Args)]
pub struct PublishCmd {
    /// File path, http(s) URL, literal text, or "-" for stdin
    pub resource: String,
    #[command(flatten)]
    pub thread: ThreadArgs,
    #[arg(long)]
    pub endpoint: Option<String>,
    #[arg(long)]
    pub token: Option<String>,
    #[arg(long)]
    pub delay_ms: Option<u64>,
    #[arg(long, default_value_t = false)]
    pub apply: bool,
}

pub struct PublishOutcome {
    pub posted: Vec<PostedChunk>,
    pub failure: Option<(usize, PublishError)>,
}

/// Post chunks strictly one after another, in thread order. Each post after
/// the first replies to the previous one. Stops at the first failure.
pub async fn publish_thread(
    publisher: &dyn Publisher,
    thread: &[LabeledChunk],
    delay: Duration,
    log: Option<&LogCtx<PublishOp>>,
) -> PublishOutcome {
    let mut posted: Vec<PostedChunk> = Vec::with_capacity(thread.len());
    let mut reply_to: Option<String> = None;

    for (i, chunk) in thread.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let post = Post { text: chunk.text.clone(), reply_to: reply_to.clone() };
        match publisher.publish(&post).await {
            Ok(receipt) => {
                if let Some(ctx) = log { ctx.posted(chunk.position, thread.len(), &receipt.id); }
                reply_to = Some(receipt.id.clone());
                posted.push(PostedChunk { position: chunk.position, id: receipt.id });
            }
            Err(err) => return PublishOutcome { posted, failure: Some((chunk.position, err)) },
        }
    }
    PublishOutcome { posted, failure: None }
}

pub async fn run(args: PublishCmd) -> Result<()> {
    let t0 = Instant::now();
    let cfg = ThreadConfig::from_env().with_args(&args.thread);
    let mut pub_cfg = PublisherConfig::from_env();
    if args.endpoint.is_some() { pub_cfg.endpoint = args.endpoint.clone(); }
    if args.token.is_some() { pub_cfg.token = args.token.clone(); }
    if let Some(ms) = args.delay_ms { pub_cfg.delay = Duration::from_millis(ms); }

    let log = telemetry::publish();
    let _g = log.root_span_kv([
        ("apply", args.apply.to_string()),
        ("endpoint", format!("{:?}", pub_cfg.endpoint)),
        ("delay_ms", pub_cfg.delay.as_millis().to_string()),
        ("budget", cfg.budget.to_string()),
    ]).entered();

    let resolved = {
        let _s = log.span(&PublishPhase::Resolve).entered();
        source::resolve(&Client::new(), &args.resource).await
    };
    for (origin, err) in &resolved.rejected {
        log.debug_kv("origin rejected", [("origin", origin.as_str().to_string()), ("reason", err.to_string())]);
    }

    let thread = {
        let _s = log.span(&PublishPhase::Build).entered();
        let measurer = cfg.measure.build(cfg.url_length);
        build_thread(&resolved.text, &cfg, measurer.as_ref())
    };
    let over_budget = thread.iter().filter(|c| c.over_budget).count();
    for c in thread.iter().filter(|c| c.over_budget) {
        log.warn_kv("chunk over budget", [("position", c.position.to_string()), ("length", c.length.to_string())]);
    }
    let meta = || Some(Meta {
        duration_ms: Some(t0.elapsed().as_millis()),
        origin: resolved.origin.map(|o| o.as_str().to_string()),
    });

    if !args.apply {
        let _s = log.span(&PublishPhase::Plan).entered();
        log.info(format!(
            "📝 Publish plan — chunks={} over_budget={} endpoint={:?}",
            thread.len(), over_budget, pub_cfg.endpoint
        ));
        log.info("   Use --apply to execute.");
        let plan = PublishPlan {
            endpoint: pub_cfg.endpoint.as_deref(),
            chunks: thread.len(),
            over_budget,
            delay_ms: pub_cfg.delay.as_millis(),
            thread: &thread,
        };
        log.plan(&plan, meta())?;
        return Ok(());
    }

    if thread.is_empty() {
        log.info("ℹ️  Nothing to publish (no text)");
        return Ok(());
    }

    let publisher = HttpPublisher::new(&pub_cfg).context("building publisher")?;
    let outcome = {
        let _s = log.span(&PublishPhase::Post).entered();
        publish_thread(&publisher, &thread, pub_cfg.delay, Some(&log)).await
    };
    log.totals(outcome.posted.len(), thread.len());

    let (failed_at, error) = match &outcome.failure {
        Some((position, err)) => (Some(*position), Some(err.to_string())),
        None => (None, None),
    };
    let result = PublishResult { total: thread.len(), posted: outcome.posted, failed_at, error };
    log.result(&result, meta())?;

    if let Some((position, err)) = outcome.failure {
        log.error(format!("❌ chunk {} failed (retryable={}): {}", position, err.is_retryable(), err));
        bail!("published {} of {} chunks; chunk {} failed: {}", result.posted.len(), result.total, position, err);
    }
    Ok(())
}
