use std::time::Duration;

use thiserror::Error;

use crate::common::client::error::ApiError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("无效的状态: {0}")]
    InvalidState(String),

    #[error("无效的参数: {0}")]
    InvalidInput(String),

    #[error("任务未找到: {0}")]
    TaskNotFound(String),

    #[error("远程请求失败: {0}")]
    Upstream(#[from] ApiError),

    #[error("请求超时 ({0:?})")]
    Timeout(Duration),

    #[error("未找到章节页面")]
    NoPages,

    #[error("不支持的站点: {0}")]
    UnsupportedSite(u32),

    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("获取章节页面失败: {0}")]
    PageList(Box<DownloadError>),

    #[error("创建下载目录失败: {0}")]
    Destination(Box<DownloadError>),

    #[error("下载第 {index} 页失败: {source}")]
    Page {
        index: usize,
        source: Box<DownloadError>,
    },
}

impl DownloadError {
    /// 去掉步骤包装后的根因
    pub fn root(&self) -> &DownloadError {
        match self {
            DownloadError::PageList(inner) | DownloadError::Destination(inner) => inner.root(),
            DownloadError::Page { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_unwraps_step_context() {
        let err = DownloadError::Page {
            index: 2,
            source: Box::new(DownloadError::Timeout(Duration::from_millis(50))),
        };
        assert!(matches!(err.root(), DownloadError::Timeout(_)));
        assert!(err.to_string().starts_with("下载第 2 页失败: 请求超时"));

        let err = DownloadError::PageList(Box::new(DownloadError::NoPages));
        assert!(matches!(err.root(), DownloadError::NoPages));
    }
}
