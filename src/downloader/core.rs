use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::common::client::error::ApiError;
use crate::common::client::source::{MangaSource, RequestOptions};
use crate::common::models::{MangaContext, Page, Site};

use super::DownloaderConfig;
use super::error::DownloadError;
use super::naming;
use super::registry::TaskRegistry;
use super::task::{TaskRecord, TaskStatus};

/// 启动下载时固定下来的参数，任务运行期间不再读取共享状态
#[derive(Debug, Clone)]
pub struct ChapterJob {
    pub slug: String,
    pub title: String,
    pub site_id: u32,
    pub referer: String,
    pub volume: String,
    pub chapter: String,
    pub token: String,
}

impl ChapterJob {
    pub fn new(manga: &MangaContext, volume: &str, chapter: &str, token: &str) -> Self {
        Self {
            slug: manga.slug_url.clone(),
            title: manga.title.clone(),
            site_id: manga.site_id,
            referer: manga.referer.clone(),
            volume: volume.to_string(),
            chapter: chapter.to_string(),
            token: token.to_string(),
        }
    }

    fn request_options(&self) -> RequestOptions {
        RequestOptions::new()
            .referer(self.referer.as_str())
            .token(&self.token)
    }
}

// 任务记录的唯一写入方
struct TaskHandle<'a> {
    task_id: &'a str,
    registry: &'a TaskRegistry,
}

impl TaskHandle<'_> {
    fn update(
        &self,
        status: TaskStatus,
        message: impl Into<String>,
        progress: Option<usize>,
        total_pages: Option<usize>,
    ) {
        let message = message.into();
        let mut rejected = None;
        self.registry.mutate(self.task_id, |task| {
            if !task.status.can_transition_to(status) {
                rejected = Some(task.status);
                return;
            }
            task.status = status;
            task.message = message;
            if let Some(total) = total_pages {
                task.total_pages = total;
            }
            if let Some(progress) = progress {
                task.progress = progress;
            }
        });

        if let Some(current) = rejected {
            warn!(
                "忽略非法状态迁移: {}, {:?} -> {:?}",
                self.task_id, current, status
            );
        }
    }

    fn set_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.registry.mutate(self.task_id, |task| task.message = message);
    }

    fn set_destination(&self, path: PathBuf) {
        self.registry
            .mutate(self.task_id, |task| task.destination_path = Some(path));
    }
}

#[derive(Clone)]
pub struct DownloadCore {
    registry: TaskRegistry,
    source: Arc<dyn MangaSource>,
    config: Arc<DownloaderConfig>,
    semaphore: Option<Arc<Semaphore>>, // 控制并发数，None 表示不限制
}

impl DownloadCore {
    pub fn new(source: Arc<dyn MangaSource>, config: DownloaderConfig) -> Self {
        let semaphore = config
            .max_concurrent
            .map(|permits| Arc::new(Semaphore::new(permits.clamp(1, Semaphore::MAX_PERMITS))));
        Self {
            registry: TaskRegistry::new(),
            source,
            config: Arc::new(config),
            semaphore,
        }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    // 添加新的下载任务，立即返回任务ID
    pub fn add_task(&self, job: ChapterJob) -> String {
        let task_id = uuid::Uuid::new_v4().to_string();
        self.registry.create(&task_id);

        debug!(
            "添加下载任务: {}, {} 第 {} 卷 第 {} 话",
            task_id, job.slug, job.volume, job.chapter
        );

        let core = self.clone();
        let task_id_clone = task_id.clone();
        tokio::spawn(async move {
            core.run(task_id_clone, job).await;
        });

        task_id
    }

    // 获取任务状态
    pub fn get_task(&self, task_id: &str) -> Option<TaskRecord> {
        self.registry.get(task_id)
    }

    async fn run(self, task_id: String, job: ChapterJob) {
        let task = TaskHandle {
            task_id: &task_id,
            registry: &self.registry,
        };

        let _permit = match &self.semaphore {
            Some(semaphore) => {
                task.set_message("等待空闲的下载槽位...");
                // 信号量归 DownloadCore 所有，不会被关闭
                Arc::clone(semaphore).acquire_owned().await.ok()
            }
            None => None,
        };

        info!(
            "开始下载任务: {}, {} 第 {} 卷 第 {} 话",
            task_id, job.slug, job.volume, job.chapter
        );

        match self.download_chapter(&task, &job).await {
            Ok(total) => {
                task.update(TaskStatus::Completed, "下载完成！", Some(total), None);
                info!("✅ 下载任务完成: {}, 共 {} 页", task_id, total);
            }
            Err(e) => {
                error!("❌ 下载任务失败: {}, 错误: {}", task_id, e);
                task.update(TaskStatus::Error, e.to_string(), None, None);
            }
        }
    }

    async fn download_chapter(
        &self,
        task: &TaskHandle<'_>,
        job: &ChapterJob,
    ) -> Result<usize, DownloadError> {
        task.update(TaskStatus::Fetching, "获取章节信息...", None, None);

        let options = job.request_options();
        let pages = self
            .with_timeout(
                self.source
                    .chapter_pages(&job.slug, &job.volume, &job.chapter, &options),
            )
            .await
            .map_err(|e| DownloadError::PageList(Box::new(e)))?;

        if pages.is_empty() {
            warn!("章节没有页面: {} 第 {} 卷 第 {} 话", job.slug, job.volume, job.chapter);
            return Err(DownloadError::NoPages);
        }
        let total = pages.len();

        task.update(
            TaskStatus::Preparing,
            "创建下载目录...",
            None,
            Some(total),
        );
        let folder = self
            .prepare_destination(job)
            .await
            .map_err(|e| DownloadError::Destination(Box::new(e)))?;
        task.set_destination(folder.clone());
        info!("下载目录: {}", folder.display());

        let domain = Site::from_id(job.site_id)
            .map(Site::image_domain)
            .ok_or(DownloadError::UnsupportedSite(job.site_id))?;

        task.update(TaskStatus::Downloading, "开始下载页面...", Some(0), None);

        for (i, page) in pages.iter().enumerate() {
            let index = i + 1;
            let path = self
                .download_page(domain, page, &folder, &options)
                .await
                .map_err(|e| DownloadError::Page {
                    index,
                    source: Box::new(e),
                })?;

            task.update(
                TaskStatus::Downloading,
                format!("已下载第 {} 页，共 {} 页", index, total),
                Some(index),
                None,
            );
            debug!("已下载 {}/{}: {}", index, total, path.display());
        }

        Ok(total)
    }

    // 创建章节目录，目录已存在时直接复用
    async fn prepare_destination(&self, job: &ChapterJob) -> Result<PathBuf, DownloadError> {
        let folder = self.config.output_dir.join(naming::chapter_folder_name(
            &job.title,
            &job.volume,
            &job.chapter,
        ));
        tokio::fs::create_dir_all(&folder).await?;
        Ok(tokio::fs::canonicalize(&folder).await?)
    }

    async fn download_page(
        &self,
        domain: &str,
        page: &Page,
        folder: &Path,
        options: &RequestOptions,
    ) -> Result<PathBuf, DownloadError> {
        let url = format!("{}{}", domain, page.url);
        let bytes = self
            .with_timeout(self.source.fetch_bytes(&url, options))
            .await?;

        let path = folder.join(naming::page_file_name(page));
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }

    // 每次远程调用单独限时，超时按失败处理
    async fn with_timeout<T, F>(&self, fut: F) -> Result<T, DownloadError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        match tokio::time::timeout(self.config.request_timeout, fut).await {
            Ok(result) => result.map_err(DownloadError::from),
            Err(_) => Err(DownloadError::Timeout(self.config.request_timeout)),
        }
    }
}
