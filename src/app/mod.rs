use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

pub use error::AppError;

use crate::common::client::source::{MangaSource, RequestOptions};
use crate::common::models::{ChaptersInfo, MangaContext, SearchResult, Site};
use crate::downloader::task::TaskRecord;
use crate::downloader::{ChapterDownloader, DownloaderConfig};

pub mod error;

/// 应用状态
///
/// 当前漫画、令牌和下载任务都归这个对象所有，每个实例互相独立。
pub struct MangaApp {
    source: Arc<dyn MangaSource>,
    downloader: ChapterDownloader,
    /// 当前选中的漫画
    current_manga: RwLock<Option<MangaContext>>,
    /// Bearer 令牌，空字符串表示未设置
    auth_token: RwLock<String>,
}

impl MangaApp {
    pub fn new(source: Arc<dyn MangaSource>, config: DownloaderConfig) -> Self {
        Self {
            downloader: ChapterDownloader::new(Arc::clone(&source), config),
            source,
            current_manga: RwLock::new(None),
            auth_token: RwLock::new(String::new()),
        }
    }

    pub fn downloader(&self) -> &ChapterDownloader {
        &self.downloader
    }

    pub async fn current_manga(&self) -> Option<MangaContext> {
        self.current_manga.read().await.clone()
    }

    async fn request_options(&self, referer: Option<&str>) -> RequestOptions {
        let options = RequestOptions::new().token(&self.auth_token.read().await);
        match referer {
            Some(referer) => options.referer(referer),
            None => options,
        }
    }

    /// 设置授权令牌
    pub async fn set_token(&self, token: &str) {
        let token = token.trim().to_string();
        info!("Token set: {}", !token.is_empty());
        *self.auth_token.write().await = token;
    }

    /// 搜索漫画
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::BadRequest("请输入搜索关键词".to_string()));
        }

        let options = self.request_options(None).await;
        let results = self
            .source
            .search(query, &options)
            .await
            .map_err(|e| AppError::upstream("搜索失败", e))?;

        info!("搜索完成，共 {} 条结果", results.len());
        Ok(results)
    }

    /// 获取漫画详情，并替换当前选中的漫画
    pub async fn manga_details(&self, slug: &str, site_id: u32) -> Result<MangaContext, AppError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(AppError::BadRequest("缺少漫画标识".to_string()));
        }
        if Site::from_id(site_id).is_none() {
            warn!("未知的站点: {}，图片下载将不可用", site_id);
        }

        info!("获取漫画详情: {} (site_id: {})", slug, site_id);
        let options = self.request_options(Some(Site::referer_for(site_id))).await;
        let details = self
            .source
            .manga_details(slug, &options)
            .await
            .map_err(|e| AppError::upstream("获取漫画详情失败", e))?;

        let manga = MangaContext::new(slug, site_id, details);
        info!("漫画详情: {}", manga.title);
        *self.current_manga.write().await = Some(manga.clone());
        Ok(manga)
    }

    /// 获取当前漫画的章节信息
    pub async fn chapters_info(&self, slug: &str) -> Result<ChaptersInfo, AppError> {
        let manga = self
            .current_manga()
            .await
            .filter(|m| m.slug_url == slug)
            .ok_or_else(|| AppError::InvalidState("漫画未选择或与当前漫画不一致".to_string()))?;

        let options = self.request_options(Some(manga.referer.as_str())).await;
        let chapters = self
            .source
            .chapters(slug, &options)
            .await
            .map_err(|e| AppError::upstream("获取章节信息失败", e))?;

        if chapters.is_empty() {
            warn!("漫画没有章节: {}", slug);
            return Err(AppError::Upstream("未能获取章节信息".to_string()));
        }

        let info = ChaptersInfo::new(chapters);
        info!("章节信息: {} 卷, {} 话", info.volumes, info.chapters);
        Ok(info)
    }

    /// 开始下载当前漫画的一话
    pub async fn start_download(&self, volume: &str, chapter: &str) -> Result<String, AppError> {
        let manga = self.current_manga().await;
        let token = self.auth_token.read().await.clone();
        Ok(self
            .downloader
            .launch(manga.as_ref(), volume, chapter, &token)?)
    }

    /// 查询下载任务状态
    pub fn download_status(&self, task_id: &str) -> Result<TaskRecord, AppError> {
        Ok(self.downloader.status(task_id)?)
    }
}
