use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Publish;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Resolve, Build, Plan, Post }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Resolve => "resolve",
        Phase::Build => "build",
        Phase::Plan => "plan",
        Phase::Post => "post",
    }}
    fn span(&self) -> Span { match self {
        Phase::Resolve => info_span!("resolve"),
        Phase::Build => info_span!("build"),
        Phase::Plan => info_span!("plan"),
        Phase::Post => info_span!("post"),
    }}
}

impl OpMarker for Publish {
    const NAME: &'static str = "publish";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("publish") }
}
