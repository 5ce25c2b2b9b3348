use thiserror::Error;

use crate::common::client::error::ApiError;
use crate::downloader::error::DownloadError;

/// 面向调用方的错误分类
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    NotFound(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn upstream(context: &str, err: ApiError) -> Self {
        AppError::Upstream(format!("{}: {}", context, err))
    }
}

impl From<DownloadError> for AppError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::InvalidState(msg) => AppError::InvalidState(msg),
            DownloadError::InvalidInput(msg) => AppError::BadRequest(msg),
            DownloadError::TaskNotFound(id) => AppError::NotFound(format!("任务未找到: {}", id)),
            DownloadError::IoError(e) => AppError::Io(e),
            DownloadError::Destination(_) => AppError::Io(std::io::Error::other(err.to_string())),
            DownloadError::Upstream(_)
            | DownloadError::Timeout(_)
            | DownloadError::NoPages
            | DownloadError::UnsupportedSite(_)
            | DownloadError::PageList(_)
            | DownloadError::Page { .. } => AppError::Upstream(err.to_string()),
        }
    }
}
