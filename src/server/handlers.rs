use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::app::{AppError, MangaApp};
use crate::common::models::{ChaptersInfo, MangaContext, SearchResult, opt_string_or_number};
use crate::downloader::task::TaskRecord;

const SUCCESS: &str = "success";

/// JSON 请求体，解析失败时按 `{"error": ...}` 返回 400
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Deserialize)]
pub struct SetTokenRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub site_id: Option<u32>,
}

/// 卷号和章节号可以是字符串也可以是数字
#[derive(Debug, Deserialize)]
pub struct DownloadChapterRequest {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub volume: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub chapter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub status: &'static str,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
pub struct MangaResponse {
    pub status: &'static str,
    pub manga: MangaContext,
}

#[derive(Debug, Serialize)]
pub struct ChaptersInfoResponse {
    pub status: &'static str,
    pub chapters_info: ChaptersInfo,
}

#[derive(Debug, Serialize)]
pub struct StartDownloadResponse {
    pub status: &'static str,
    pub task_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub status: &'static str,
    pub task: TaskRecord,
}

/// POST /api/set_token
pub async fn set_token(
    State(app): State<Arc<MangaApp>>,
    JsonBody(req): JsonBody<SetTokenRequest>,
) -> Json<MessageResponse> {
    app.set_token(&req.token).await;
    Json(MessageResponse {
        status: SUCCESS,
        message: "令牌已设置".to_string(),
    })
}

/// GET /api/search?q=
pub async fn search_manga(
    State(app): State<Arc<MangaApp>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let results = app.search(&query.q).await?;
    Ok(Json(SearchResponse {
        status: SUCCESS,
        results,
    }))
}

/// GET /api/manga/{slug}?site_id=
pub async fn get_manga_details(
    State(app): State<Arc<MangaApp>>,
    Path(slug): Path<String>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<MangaResponse>, AppError> {
    let manga = app.manga_details(&slug, query.site_id.unwrap_or(1)).await?;
    Ok(Json(MangaResponse {
        status: SUCCESS,
        manga,
    }))
}

/// GET /api/manga/{slug}/chapters_info
pub async fn get_chapters_info(
    State(app): State<Arc<MangaApp>>,
    Path(slug): Path<String>,
) -> Result<Json<ChaptersInfoResponse>, AppError> {
    let chapters_info = app.chapters_info(&slug).await?;
    Ok(Json(ChaptersInfoResponse {
        status: SUCCESS,
        chapters_info,
    }))
}

/// POST /api/download_chapter
pub async fn start_download(
    State(app): State<Arc<MangaApp>>,
    JsonBody(req): JsonBody<DownloadChapterRequest>,
) -> Result<Json<StartDownloadResponse>, AppError> {
    let task_id = app
        .start_download(
            req.volume.as_deref().unwrap_or_default(),
            req.chapter.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(StartDownloadResponse {
        status: SUCCESS,
        task_id,
        message: "下载已开始".to_string(),
    }))
}

/// GET /api/download_status/{task_id}
pub async fn get_download_status(
    State(app): State<Arc<MangaApp>>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = app.download_status(&task_id)?;
    Ok(Json(TaskResponse {
        status: SUCCESS,
        task,
    }))
}
