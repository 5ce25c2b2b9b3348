#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use manga_downloader::common::client::error::ApiError;
use manga_downloader::common::models::{Chapter, MangaDetails, Page, SearchResult};
use manga_downloader::downloader::task::TaskRecord;
use manga_downloader::{DownloaderConfig, MangaApp, MangaSource, RequestOptions};

/// 内存中的内容接口，按脚本返回数据并记录每次请求
#[derive(Default)]
pub struct FakeSource {
    pub pages: Vec<Page>,
    pub chapters: Vec<Chapter>,
    pub search_results: Vec<SearchResult>,
    pub title: String,
    pub fail_page_list: bool,
    pub fail_details: bool,
    /// 这些 URL 的图片请求会失败
    pub failing_urls: HashSet<String>,
    /// 每次图片请求前的延迟
    pub fetch_delay: Option<Duration>,
    pub requests: Mutex<Vec<(String, RequestOptions)>>,
}

impl FakeSource {
    pub fn with_pages(count: usize) -> Self {
        Self {
            pages: (1..=count).map(page).collect(),
            title: "Test Manga".to_string(),
            ..Default::default()
        }
    }

    pub fn fail_url(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<(String, RequestOptions)> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, what: String, options: &RequestOptions) {
        self.requests.lock().unwrap().push((what, options.clone()));
    }
}

pub fn page(n: usize) -> Page {
    Page {
        slug: n.to_string(),
        url: format!("/manga/test/chapters/1/{:02}.png", n),
        image: format!("{:02}.png", n),
    }
}

pub fn upstream_error(msg: &str) -> ApiError {
    ApiError::InvalidResponse(msg.to_string())
}

#[async_trait]
impl MangaSource for FakeSource {
    async fn search(
        &self,
        query: &str,
        options: &RequestOptions,
    ) -> Result<Vec<SearchResult>, ApiError> {
        self.record(format!("search:{}", query), options);
        Ok(self.search_results.clone())
    }

    async fn manga_details(
        &self,
        slug: &str,
        options: &RequestOptions,
    ) -> Result<MangaDetails, ApiError> {
        self.record(format!("details:{}", slug), options);
        if self.fail_details {
            return Err(upstream_error("details unavailable"));
        }
        Ok(MangaDetails {
            title: self.title.clone(),
            kind: "Манга".to_string(),
            status: "Онгоинг".to_string(),
            cover_url: "https://cover.example/1.jpg".to_string(),
            rating: "9.0".to_string(),
        })
    }

    async fn chapters(
        &self,
        slug: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Chapter>, ApiError> {
        self.record(format!("chapters:{}", slug), options);
        Ok(self.chapters.clone())
    }

    async fn chapter_pages(
        &self,
        slug: &str,
        volume: &str,
        chapter: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Page>, ApiError> {
        self.record(format!("pages:{}:{}:{}", slug, volume, chapter), options);
        if self.fail_page_list {
            return Err(upstream_error("chapter not found"));
        }
        Ok(self.pages.clone())
    }

    async fn fetch_bytes(&self, url: &str, options: &RequestOptions) -> Result<Vec<u8>, ApiError> {
        self.record(url.to_string(), options);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_urls.contains(url) {
            return Err(ApiError::Status {
                status: 403,
                url: url.to_string(),
            });
        }
        Ok(url.as_bytes().to_vec())
    }
}

pub fn test_config(dir: &tempfile::TempDir) -> DownloaderConfig {
    DownloaderConfig {
        output_dir: dir.path().to_path_buf(),
        request_timeout: Duration::from_secs(5),
        max_concurrent: None,
    }
}

pub fn new_app(source: &Arc<FakeSource>, config: DownloaderConfig) -> MangaApp {
    MangaApp::new(Arc::clone(source) as Arc<dyn MangaSource>, config)
}

/// 轮询到终态，最多等待 5 秒
pub async fn wait_terminal(app: &MangaApp, task_id: &str) -> TaskRecord {
    tokio::time::timeout(
        Duration::from_secs(5),
        app.downloader()
            .wait(task_id, Duration::from_millis(5), |_| {}),
    )
    .await
    .expect("任务未在限定时间内结束")
    .expect("任务不存在")
}

pub fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
