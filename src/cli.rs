use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use manga_downloader::common::client::client::DEFAULT_API_BASE;

/// 漫画章节下载器
#[derive(Parser, Debug)]
#[command(name = "mangadl")]
#[command(version = "1.0")]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "下载 MangaLib / HentaiLib 漫画章节", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 内容接口地址
    #[arg(long, value_name = "URL", global = true)]
    #[arg(default_value = DEFAULT_API_BASE)]
    #[arg(value_hint = clap::ValueHint::Url)]
    pub api_base: String,

    /// 章节保存目录
    #[arg(long, value_name = "DIR", global = true)]
    #[arg(default_value = ".")]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub output_dir: PathBuf,

    /// 单次请求超时（秒）
    #[arg(long, value_name = "SECS", global = true, default_value_t = 10)]
    pub timeout: u64,

    /// 同时下载的章节数上限，不指定则不限制
    #[arg(long, value_name = "N", global = true)]
    pub max_concurrent: Option<usize>,

    /// Bearer 令牌 (可选)
    #[arg(long, value_name = "TOKEN", global = true)]
    #[arg(help = "访问受限章节时使用的授权令牌")]
    pub token: Option<String>,

    /// 输出调试日志
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 启动 HTTP 接口
    Serve {
        #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
    },
    /// 直接下载一话
    Download {
        /// 漫画标识 (slug_url)
        #[arg(long, value_name = "SLUG")]
        slug: String,

        /// 站点: 1=MangaLib, 4=HentaiLib
        #[arg(long, value_name = "ID", default_value_t = 1)]
        site_id: u32,

        #[arg(long, value_name = "VOLUME")]
        volume: String,

        #[arg(long, value_name = "CHAPTER")]
        chapter: String,
    },
}
