use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Starting,
    Fetching,
    Preparing,
    Downloading,
    Completed,
    Error,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Error)
    }

    /// 状态只能沿 starting → fetching → preparing → downloading → completed 前进，
    /// fetching 之后的任一步都可以进入 error
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Starting, Fetching)
                | (Fetching, Preparing)
                | (Fetching, Error)
                | (Preparing, Downloading)
                | (Preparing, Error)
                | (Downloading, Downloading)
                | (Downloading, Completed)
                | (Downloading, Error)
        )
    }
}

/// 一次章节下载的任务记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRecord {
    pub id: String,
    pub status: TaskStatus,
    pub message: String,
    pub progress: usize,
    pub total_pages: usize,
    pub destination_path: Option<PathBuf>,
}

impl TaskRecord {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            status: TaskStatus::Starting,
            message: "开始下载...".to_string(),
            progress: 0,
            total_pages: 0,
            destination_path: None,
        }
    }
}
