use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Embedding task state machine: `Pending → Processing → {Completed | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Active tasks block creation of a second task for the same document.
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Processing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "processing" => Some(TaskStatus::Processing),
            "completed" => Some(TaskStatus::Completed),
            "failed" => Some(TaskStatus::Failed),
            _ => None,
        }
    }
}

/// A background embedding computation for one document's chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingTask {
    /// UUID v4 identifier.
    pub id: String,
    pub document_id: String,
    pub status: TaskStatus,
    /// Chunks processed so far.
    pub current: usize,
    /// Chunks needing embeddings when the task was created.
    pub total: usize,
    /// Percentage in [0, 100].
    pub progress: f32,
    pub error: Option<String>,
    /// Chunks embedded successfully.
    pub success_count: usize,
    /// Chunks whose batch exhausted retries.
    pub fail_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmbeddingTask {
    /// Create a new pending task covering `total` chunks.
    pub fn new(document_id: impl Into<String>, total: usize) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            document_id: document_id.into(),
            status: TaskStatus::Pending,
            current: 0,
            total,
            progress: 0.0,
            error: None,
            success_count: 0,
            fail_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a processed batch and refresh the progress percentage.
    pub fn record_batch(&mut self, succeeded: usize, failed: usize) {
        self.current = (self.current + succeeded + failed).min(self.total);
        self.success_count += succeeded;
        self.fail_count += failed;
        self.progress = if self.total == 0 {
            100.0
        } else {
            (self.current as f32 / self.total as f32) * 100.0
        };
        self.updated_at = Utc::now();
    }

    pub fn mark_processing(&mut self) {
        self.status = TaskStatus::Processing;
        self.updated_at = Utc::now();
    }

    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
        self.progress = 100.0;
        self.updated_at = Utc::now();
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.updated_at = Utc::now();
    }
}
