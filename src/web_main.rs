//! Web 服务器主程序入口

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use word_cache::env::{generate_env_docs, load_dotenv, EnvConfig};
use word_cache::error::WordCacheResult;
use word_cache::provider::{GoogleTranslateProvider, ProviderConfig};
use word_cache::service::TranslationService;
use word_cache::store::open_store;
use word_cache::web::{WebConfig, WebServer};

#[derive(Parser)]
#[command(name = "word-cache-web")]
#[command(about = "Read-through translation cache served over HTTP.")]
#[command(version)]
struct Args {
    /// Bind address, overrides WORD_CACHE_BIND_ADDRESS
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Port number, overrides WORD_CACHE_PORT
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Print the supported environment variables and exit
    #[arg(long)]
    env_docs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.env_docs {
        println!("{}", generate_env_docs());
        return Ok(());
    }

    let env_file = load_dotenv();

    let config = EnvConfig::from_env()?;
    init_tracing(&config.log_level);
    if let Some(env_file) = env_file {
        tracing::info!("已加载环境文件: {}", env_file);
    }
    config.validate()?;
    config.log_summary();

    run(config, args).await?;
    Ok(())
}

fn init_tracing(default_level: &str) {
    // RUST_LOG 优先于 WORD_CACHE_LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!(
            "word_cache={0},word_cache_web={0},tower_http={0}",
            default_level
        )));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: EnvConfig, args: Args) -> WordCacheResult<()> {
    let mut web_config = WebConfig::from_env(&config);
    if let Some(bind) = args.bind {
        web_config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        web_config.port = port;
    }
    web_config.validate()?;

    let provider = GoogleTranslateProvider::new(ProviderConfig::from_env(&config)?);
    let store = open_store(&config).await?;

    let service = Arc::new(TranslationService::new(store.clone(), Arc::new(provider)));
    let result = WebServer::new(web_config, service).start().await;

    if let Err(e) = store.close().await {
        tracing::warn!("关闭存储失败: {}", e);
    }
    result
}
