use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::Duration;
use tracing::{error, info};

use manga_downloader::common::logger::{self, PrettyLogger};
use manga_downloader::downloader::task::TaskStatus;
use manga_downloader::{DownloaderConfig, LibClient, MangaApp};

mod cli;

/// 选中漫画、启动下载并轮询进度
async fn run_download(
    app: &MangaApp,
    slug: &str,
    site_id: u32,
    volume: &str,
    chapter: &str,
) -> anyhow::Result<()> {
    let manga = app.manga_details(slug, site_id).await?;
    PrettyLogger::manga_info(&manga.title, &manga.site);

    let task_id = app.start_download(volume, chapter).await?;
    info!("任务ID: {}", task_id);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("#>-"),
    );

    let task = app
        .downloader()
        .wait(&task_id, Duration::from_millis(500), |task| {
            pb.set_length(task.total_pages as u64);
            pb.set_position(task.progress as u64);
            pb.set_message(task.message.clone());
        })
        .await?;

    match task.status {
        TaskStatus::Completed => {
            pb.finish_with_message("下载完成");
            PrettyLogger::success(format!("共 {} 页", task.total_pages));
            if let Some(path) = &task.destination_path {
                PrettyLogger::file_info("保存位置", path.display().to_string());
            }
            Ok(())
        }
        _ => {
            pb.abandon_with_message("下载失败");
            PrettyLogger::error(&task.message);
            bail!("下载失败: {}", task.message)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let args = cli::Cli::parse();

    // 初始化日志
    logger::init(args.verbose);

    let config = DownloaderConfig {
        output_dir: args.output_dir.clone(),
        request_timeout: Duration::from_secs(args.timeout),
        max_concurrent: args.max_concurrent,
    };
    let client = LibClient::new(&args.api_base, config.request_timeout)?;
    let app = Arc::new(MangaApp::new(Arc::new(client), config));

    if let Some(token) = &args.token {
        app.set_token(token).await;
    }

    match args.command {
        cli::Command::Serve { bind } => {
            PrettyLogger::title("mangadl");
            PrettyLogger::info(format!("接口地址: {}", args.api_base));
            PrettyLogger::file_info("下载目录", args.output_dir.display().to_string());
            serve(app, bind).await
        }
        cli::Command::Download {
            slug,
            site_id,
            volume,
            chapter,
        } => run_download(&app, &slug, site_id, &volume, &chapter)
            .await
            .inspect_err(|e| error!("下载失败: {}", e)),
    }
}

#[cfg(feature = "http")]
async fn serve(app: Arc<MangaApp>, bind: std::net::SocketAddr) -> anyhow::Result<()> {
    manga_downloader::server::serve(app, bind).await
}

#[cfg(not(feature = "http"))]
async fn serve(_app: Arc<MangaApp>, _bind: std::net::SocketAddr) -> anyhow::Result<()> {
    bail!("当前构建未启用 http 功能")
}
