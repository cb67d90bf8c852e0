use serde::Serialize;

use crate::thread::LabeledChunk;

#[derive(Serialize)]
pub struct PublishPlan<'a> {
    pub endpoint: Option<&'a str>,
    pub chunks: usize,
    pub over_budget: usize,
    pub delay_ms: u128,
    pub thread: &'a [LabeledChunk],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedChunk {
    pub position: usize,
    pub id: String,
}

#[derive(Serialize)]
pub struct PublishResult {
    pub total: usize,
    pub posted: Vec<PostedChunk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
