pub mod app;
pub mod common;
pub mod downloader;
#[cfg(feature = "http")]
pub mod server;

pub use app::{AppError, MangaApp};
pub use common::client::client::LibClient;
pub use common::client::source::{MangaSource, RequestOptions};
pub use downloader::{ChapterDownloader, DownloaderConfig};
