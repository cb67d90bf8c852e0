use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Split;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Resolve, SplitLines, Expand, Label }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Resolve => "resolve",
        Phase::SplitLines => "split_lines",
        Phase::Expand => "expand",
        Phase::Label => "label",
    }}
    fn span(&self) -> Span { match self {
        Phase::Resolve => info_span!("resolve"),
        Phase::SplitLines => info_span!("split_lines"),
        Phase::Expand => info_span!("expand"),
        Phase::Label => info_span!("label"),
    }}
}

impl OpMarker for Split {
    const NAME: &'static str = "split";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("split") }
}
