use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, ClientBuilder, RequestBuilder, Response,
    header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT},
};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::common::client::error::ApiError;
use crate::common::client::models::chapter::ChapterData;
use crate::common::client::models::common::CommonResponse;
use crate::common::client::models::manga::{MangaData, SearchItem};
use crate::common::client::source::{MangaSource, RequestOptions};
use crate::common::models::{Chapter, MangaDetails, Page, SearchResult};

pub const DEFAULT_API_BASE: &str = "https://api.cdnlibs.org/api";

// 内容接口客户端
#[derive(Debug, Clone)]
pub struct LibClient {
    pub inner: Client,
    api_base: String,
}

impl LibClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, ApiError> {
        let inner = ClientBuilder::new()
            .timeout(timeout)
            .default_headers(Self::get_default_headers())
            .build()?;

        Ok(Self {
            inner,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn get_default_headers() -> HeaderMap {
        // 浏览器请求头，缺少时图片服务器会返回 403
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, image/*, */*;q=0.8"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ru-RU,ru;q=0.9,en;q=0.8"));
        headers.insert(
            "sec-ch-ua",
            HeaderValue::from_static(
                r#""Not;A=Brand";v="99", "Google Chrome";v="139", "Chromium";v="139""#,
            ),
        );
        headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
        headers.insert("sec-ch-ua-platform", HeaderValue::from_static(r#""Windows""#));
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36"));

        headers
    }

    fn request(&self, url: &str, options: &RequestOptions) -> RequestBuilder {
        let mut builder = self.inner.get(url);
        if let Some(referer) = &options.referer {
            builder = builder.header(REFERER, referer.as_str());
        }
        if let Some(token) = &options.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    // 通用 JSON 请求
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        debug!("GET {}", url);
        let resp = self.request(url, options).send().await.map_err(|e| {
            error!("请求失败: {}", e);
            e
        })?;

        Self::handle_response::<T>(resp).await
    }

    pub async fn get_raw_response(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Response, ApiError> {
        let resp = self.request(url, options).send().await?;
        Self::check_response_status(&resp)?;
        Ok(resp)
    }

    // 从 `{"data": ...}` 中取出 data，缺失时视为异常响应
    async fn get_data<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        self.get::<CommonResponse<T>>(url, options)
            .await?
            .data
            .ok_or_else(|| ApiError::InvalidResponse(format!("响应缺少 data 字段: {}", url)))
    }

    fn check_response_status(resp: &Response) -> Result<(), ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        error!("❌ 非成功状态码: {}，URL: {}", status, resp.url());
        Err(ApiError::Status {
            status: status.as_u16(),
            url: resp.url().to_string(),
        })
    }

    async fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        Self::check_response_status(&resp)?;

        let url = resp.url().to_string();
        let raw_body = resp.bytes().await?;

        serde_json::from_slice::<T>(&raw_body).map_err(|e| {
            error!("失败的请求的URL: {}", url);
            error!("JSON 结构匹配失败: {}", e);
            ApiError::InvalidResponse(format!("结构匹配失败: {}", e))
        })
    }

    fn search_url(&self, query: &str) -> String {
        let params = [
            ("fields[]", "rate_avg"),
            ("fields[]", "rate"),
            ("fields[]", "releaseDate"),
            ("q", query),
            ("site_id[]", "1"),
            ("site_id[]", "4"),
        ];
        let query = serde_urlencoded::to_string(&params[..]).unwrap_or_default();
        format!("{}/manga?{}", self.api_base, query)
    }

    fn chapter_url(&self, slug: &str, volume: &str, chapter: &str) -> String {
        let params = [("number", chapter), ("volume", volume)];
        let query = serde_urlencoded::to_string(&params[..]).unwrap_or_default();
        format!("{}/manga/{}/chapter?{}", self.api_base, slug, query)
    }
}

#[async_trait]
impl MangaSource for LibClient {
    async fn search(
        &self,
        query: &str,
        options: &RequestOptions,
    ) -> Result<Vec<SearchResult>, ApiError> {
        info!("搜索漫画: {}", query);
        let items: Vec<SearchItem> = self
            .get::<CommonResponse<Vec<SearchItem>>>(&self.search_url(query), options)
            .await?
            .data
            .unwrap_or_default();

        Ok(items.into_iter().map(SearchResult::from).collect())
    }

    async fn manga_details(
        &self,
        slug: &str,
        options: &RequestOptions,
    ) -> Result<MangaDetails, ApiError> {
        let url = format!("{}/manga/{}", self.api_base, slug);
        let data: MangaData = self.get_data(&url, options).await?;
        Ok(data.into())
    }

    async fn chapters(
        &self,
        slug: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Chapter>, ApiError> {
        let url = format!("{}/manga/{}/chapters", self.api_base, slug);
        Ok(self
            .get::<CommonResponse<Vec<Chapter>>>(&url, options)
            .await?
            .data
            .unwrap_or_default())
    }

    async fn chapter_pages(
        &self,
        slug: &str,
        volume: &str,
        chapter: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Page>, ApiError> {
        let url = self.chapter_url(slug, volume, chapter);
        let data: ChapterData = self.get_data(&url, options).await?;
        Ok(data.pages)
    }

    async fn fetch_bytes(&self, url: &str, options: &RequestOptions) -> Result<Vec<u8>, ApiError> {
        let resp = self.get_raw_response(url, options).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}
