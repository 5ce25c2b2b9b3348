use std::path::PathBuf;
use std::sync::Arc;

use tokio::time::Duration;
use tracing::info;

use self::core::{ChapterJob, DownloadCore};
use self::error::DownloadError;
use self::task::TaskRecord;
use crate::common::client::source::MangaSource;
use crate::common::models::MangaContext;

pub mod core;
pub mod error;
pub mod naming;
pub mod registry;
pub mod task;

/// 下载参数
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// 章节目录的父目录
    pub output_dir: PathBuf,
    /// 单次远程调用的超时
    pub request_timeout: Duration,
    /// 同时运行的下载任务上限，None 表示不限制
    pub max_concurrent: Option<usize>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            request_timeout: Duration::from_secs(10),
            max_concurrent: None,
        }
    }
}

#[derive(Clone)]
pub struct ChapterDownloader {
    download_manager: DownloadCore,
}

impl ChapterDownloader {
    pub fn new(source: Arc<dyn MangaSource>, config: DownloaderConfig) -> Self {
        Self {
            download_manager: DownloadCore::new(source, config),
        }
    }

    /// 启动章节下载，不等待任何网络请求，直接返回任务ID
    pub fn launch(
        &self,
        manga: Option<&MangaContext>,
        volume: &str,
        chapter: &str,
        token: &str,
    ) -> Result<String, DownloadError> {
        let manga = manga
            .ok_or_else(|| DownloadError::InvalidState("请先选择漫画".to_string()))?;

        let (volume, chapter) = (volume.trim(), chapter.trim());
        if volume.is_empty() || chapter.is_empty() {
            return Err(DownloadError::InvalidInput(
                "请输入卷号和章节号".to_string(),
            ));
        }

        let job = ChapterJob::new(manga, volume, chapter, token);
        let task_id = self.download_manager.add_task(job);
        info!(
            "下载已开始: {} ({} 第 {} 卷 第 {} 话)",
            task_id, manga.title, volume, chapter
        );
        Ok(task_id)
    }

    pub fn status(&self, task_id: &str) -> Result<TaskRecord, DownloadError> {
        self.download_manager
            .get_task(task_id)
            .ok_or_else(|| DownloadError::TaskNotFound(task_id.to_string()))
    }

    /// 轮询直到任务进入终态，每次轮询都会回调一次
    pub async fn wait<F>(
        &self,
        task_id: &str,
        interval: Duration,
        mut on_poll: F,
    ) -> Result<TaskRecord, DownloadError>
    where
        F: FnMut(&TaskRecord),
    {
        loop {
            let task = self.status(task_id)?;
            on_poll(&task);
            if task.status.is_terminal() {
                return Ok(task);
            }
            tokio::time::sleep(interval).await;
        }
    }

    pub fn task_count(&self) -> usize {
        self.download_manager.registry().len()
    }

    pub fn config(&self) -> &DownloaderConfig {
        self.download_manager.config()
    }
}
