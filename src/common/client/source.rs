use async_trait::async_trait;

use crate::common::client::error::ApiError;
use crate::common::models::{Chapter, MangaDetails, Page, SearchResult};

/// 单次请求附带的上下文（Referer 与 Bearer 令牌）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub referer: Option<String>,
    pub token: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    // 空令牌等同于未登录，不附带 Authorization 头
    pub fn token(mut self, token: &str) -> Self {
        let token = token.trim();
        self.token = (!token.is_empty()).then(|| token.to_string());
        self
    }
}

/// 远程内容接口
///
/// 下载核心只通过这个 trait 访问网络，测试中可以替换为内存实现。
#[async_trait]
pub trait MangaSource: Send + Sync {
    async fn search(
        &self,
        query: &str,
        options: &RequestOptions,
    ) -> Result<Vec<SearchResult>, ApiError>;

    async fn manga_details(
        &self,
        slug: &str,
        options: &RequestOptions,
    ) -> Result<MangaDetails, ApiError>;

    async fn chapters(&self, slug: &str, options: &RequestOptions)
    -> Result<Vec<Chapter>, ApiError>;

    /// 按接口返回的顺序给出章节的全部页面
    async fn chapter_pages(
        &self,
        slug: &str,
        volume: &str,
        chapter: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Page>, ApiError>;

    async fn fetch_bytes(&self, url: &str, options: &RequestOptions) -> Result<Vec<u8>, ApiError>;
}
