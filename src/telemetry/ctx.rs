use anyhow::Result;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{info, debug, warn, error, Span};

use super::emit;
use super::ops::{publish::Publish, split::Split};
use crate::output::types::Meta;

pub trait PhaseSpan {
    fn name(&self) -> &'static str;
    fn span(&self) -> Span;
}

pub trait OpMarker {
    const NAME: &'static str;
    type Phase: PhaseSpan;
    fn root_span() -> Span;
}

pub struct LogCtx<O: OpMarker> {
    pub(crate) json: bool,
    pub(crate) _marker: PhantomData<O>,
}

impl<O: OpMarker> LogCtx<O> {
    fn op_name(&self) -> &'static str { O::NAME }

    pub fn root_span(&self) -> Span { O::root_span() }

    pub fn root_span_kv<'a, T>(&self, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.root_span();
        let details = kv_to_string(fields);
        if details.is_empty() {
            debug!(op = %self.op_name(), "start");
        } else {
            debug!(op = %self.op_name(), details = %details, "start");
        }
        span
    }

    pub fn span(&self, ph: &O::Phase) -> Span { ph.span() }

    pub fn span_kv<'a, T>(&self, ph: &O::Phase, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.span(ph);
        let details = kv_to_string(fields);
        if !details.is_empty() {
            debug!(op = %self.op_name(), phase = ph.name(), details = %details, "span_start");
        }
        span
    }

    pub fn info(&self, msg: impl AsRef<str>) { if self.json { info!(op = %self.op_name(), "{}", msg.as_ref()); } else { info!("{}", msg.as_ref()); } }
    pub fn debug(&self, msg: impl AsRef<str>) { if self.json { debug!(op = %self.op_name(), "{}", msg.as_ref()); } else { debug!("{}", msg.as_ref()); } }
    pub fn warn(&self, msg: impl AsRef<str>) { if self.json { warn!(op = %self.op_name(), "{}", msg.as_ref()); } else { warn!("{}", msg.as_ref()); } }
    pub fn error(&self, msg: impl AsRef<str>) { if self.json { error!(op = %self.op_name(), "{}", msg.as_ref()); } else { error!("{}", msg.as_ref()); } }

    pub fn debug_kv<'a, D>(&self, msg: &str, kv: D)
    where
        D: IntoIterator<Item = (&'a str, String)>,
    {
        if self.json { let details = kv_to_string(kv); debug!(op = %self.op_name(), details = %details, "{}", msg); }
        else { debug!("{} {}", msg, kv_to_string(kv)); }
    }

    pub fn warn_kv<'a, D>(&self, msg: &str, kv: D)
    where
        D: IntoIterator<Item = (&'a str, String)>,
    {
        if self.json { let details = kv_to_string(kv); warn!(op = %self.op_name(), details = %details, "{}", msg); }
        else { warn!("{} {}", msg, kv_to_string(kv)); }
    }

    pub fn plan<T: Serialize>(&self, plan: &T, meta: Option<Meta>) -> Result<()> { emit::print_plan(self.op_name(), plan, meta) }
    pub fn result<T: Serialize>(&self, result: &T, meta: Option<Meta>) -> Result<()> { emit::print_result(self.op_name(), result, meta) }
}

impl LogCtx<Split> {
    pub fn thread_summary(&self, lines: usize, chunks: usize, over_budget: usize) {
        if self.json { info!(op = %self.op_name(), lines, chunks, over_budget, "thread_summary"); }
        else { info!("🧵 Thread — lines={} chunks={} over_budget={}", lines, chunks, over_budget); }
    }
}

impl LogCtx<Publish> {
    pub fn posted(&self, position: usize, total: usize, id: &str) {
        if self.json { info!(op = %self.op_name(), position, total, id, "posted"); }
        else { info!("📤 Posted {}/{} id={}", position, total, id); }
    }

    pub fn totals(&self, posted: usize, total: usize) {
        if self.json { info!(op = %self.op_name(), posted, total, "publish_totals"); }
        else { info!("📊 Publish totals — posted={} of {}", posted, total); }
    }
}

fn kv_to_string<'a, T>(kv: T) -> String
where
    T: IntoIterator<Item = (&'a str, String)>,
{
    let mut parts: Vec<String> = Vec::new();
    for (k, v) in kv { parts.push(format!("{}={}", k, v)); }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_pairs_join_with_spaces() {
        assert_eq!(kv_to_string([("budget", "140".to_string()), ("measure", "weighted".to_string())]), "budget=140 measure=weighted");
        assert_eq!(kv_to_string(Vec::<(&str, String)>::new()), "");
    }
}
