use serde::{Deserialize, Serialize};

/// Number of variations requested per run.
pub const VARIATION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Analyzing,
    /// 1-based attempt number.
    Generating(usize),
    DisplayingResults,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,
    pub percent: u8,
    pub status: String,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, percent: u8, status: impl Into<String>) -> Self {
        Self {
            stage,
            percent: percent.min(100),
            status: status.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub index: usize,
    pub prompt: String,
    pub outcome: AttemptOutcome,
}

impl AttemptRecord {
    pub fn succeeded(&self) -> bool {
        self.outcome == AttemptOutcome::Succeeded
    }
}

/// One cell of the result grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTile {
    pub index: usize,
    pub label: String,
    pub source: String,
    pub filename: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderDescription {
    pub tiles: Vec<RenderTile>,
}

impl RenderDescription {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
