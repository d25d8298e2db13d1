//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问。每个变量都是一个实现了 [`EnvVar`] 的零大小类型，
//! 携带名称、默认值和说明，`generate_env_docs` 据此生成文档。

use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::MongoDb => "mongodb",
            StoreBackend::Memory => "memory",
        }
    }
}

/// 核心环境变量定义
pub mod app {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "WORD_CACHE_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 存储后端选择
    pub struct Store;
    impl EnvVar<StoreBackend> for Store {
        const NAME: &'static str = "WORD_CACHE_STORE";
        const DEFAULT: Option<StoreBackend> = Some(StoreBackend::MongoDb);
        const DESCRIPTION: &'static str = "Storage backend: mongodb, memory";

        fn parse(value: &str) -> EnvResult<StoreBackend> {
            match value.trim().to_lowercase().as_str() {
                "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
                "memory" | "mem" => Ok(StoreBackend::Memory),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid store '{}'. Use: mongodb, memory", value),
                }),
            }
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "WORD_CACHE_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("127.0.0.1".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "WORD_CACHE_PORT";
        const DEFAULT: Option<u16> = Some(8000);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            parse_port(value, Self::NAME)
        }
    }

    /// CORS允许的源
    pub struct CorsOrigins;
    impl EnvVar<Vec<String>> for CorsOrigins {
        const NAME: &'static str = "WORD_CACHE_CORS_ORIGINS";
        const DEFAULT: Option<Vec<String>> = None;

        fn get() -> EnvResult<Vec<String>> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(vec!["*".to_string()]),
            }
        }
        const DESCRIPTION: &'static str = "CORS allowed origins (comma-separated)";

        fn parse(value: &str) -> EnvResult<Vec<String>> {
            Ok(value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect())
        }
    }
}

/// MongoDB相关环境变量
///
/// 变量名沿用 mongo 官方镜像的 `MONGO_INITDB_*` 约定，便于和 docker-compose 共用同一个 `.env`
pub mod mongo {
    use super::*;

    /// 用户名
    pub struct Username;
    impl EnvVar<String> for Username {
        const NAME: &'static str = "MONGO_INITDB_ROOT_USERNAME";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "MongoDB user name (optional)";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }

    /// 密码
    pub struct Password;
    impl EnvVar<String> for Password {
        const NAME: &'static str = "MONGO_INITDB_ROOT_PASSWORD";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "MongoDB password (optional)";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.to_string())
        }
    }

    /// 主机
    pub struct Host;
    impl EnvVar<String> for Host {
        const NAME: &'static str = "MONGO_HOST";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("localhost".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB host";

        fn parse(value: &str) -> EnvResult<String> {
            let host = value.trim();
            if host.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Host cannot be empty".to_string(),
                });
            }
            Ok(host.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "MONGO_PORT";
        const DEFAULT: Option<u16> = Some(27017);
        const DESCRIPTION: &'static str = "MongoDB port";

        fn parse(value: &str) -> EnvResult<u16> {
            parse_port(value, Self::NAME)
        }
    }

    /// 数据库名称
    pub struct DatabaseName;
    impl EnvVar<String> for DatabaseName {
        const NAME: &'static str = "MONGO_DB_NAME";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("translates".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB database name";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME, "Database name cannot be empty")
        }
    }

    /// 集合名称
    pub struct CollectionName;
    impl EnvVar<String> for CollectionName {
        const NAME: &'static str = "MONGO_COLLECTION_NAME";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("words".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB collection name";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME, "Collection name cannot be empty")
        }
    }
}

/// 翻译服务相关环境变量
pub mod provider {
    use super::*;

    /// Google 翻译 API 地址
    pub const DEFAULT_API_URL: &str =
        "https://translation.googleapis.com/language/translate/v2";

    /// API密钥
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "API_KEY";
        const DEFAULT: Option<String> = None; // 无默认值，必须设置
        const DESCRIPTION: &'static str = "Translation provider API key";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME, "API key cannot be empty")
        }
    }

    /// API地址
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "WORD_CACHE_PROVIDER_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(DEFAULT_API_URL.to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Translation provider endpoint";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 请求超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "WORD_CACHE_PROVIDER_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(10));
        const DESCRIPTION: &'static str = "Translation provider request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds = parse_positive_usize(value, Self::NAME, 1, 300)?;
            Ok(Duration::from_secs(seconds as u64))
        }
    }

    /// 阻塞调用的工作线程数
    pub struct Workers;
    impl EnvVar<usize> for Workers {
        const NAME: &'static str = "WORD_CACHE_PROVIDER_WORKERS";
        const DEFAULT: Option<usize> = Some(4);
        const DESCRIPTION: &'static str = "Maximum concurrent blocking provider calls";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 64)
        }
    }
}

/// 辅助函数
fn parse_port(value: &str, var_name: &str) -> EnvResult<u16> {
    let port: u16 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid port number (1-65535)".to_string(),
    })?;

    if port == 0 {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Port cannot be 0".to_string(),
        });
    }

    Ok(port)
}

fn parse_non_empty(value: &str, var_name: &str, message: &str) -> EnvResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: message.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 加载 .env 文件
///
/// 按顺序查找，找到第一个存在的文件后停止；已经存在的进程环境变量不会被覆盖
pub fn load_dotenv() -> Option<&'static str> {
    let env_files = [".env.local", ".env.development", ".env.production", ".env"];

    for env_file in env_files {
        if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
            return Some(env_file);
        }
    }
    None
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    // 核心配置
    pub log_level: String,
    pub store: StoreBackend,

    // Web配置
    pub web_bind_address: String,
    pub web_port: u16,
    pub cors_origins: Vec<String>,

    // MongoDB配置
    pub mongodb_username: Option<String>,
    pub mongodb_password: Option<String>,
    pub mongodb_host: String,
    pub mongodb_port: u16,
    pub mongodb_database_name: String,
    pub mongodb_collection_name: String,

    // 翻译服务配置
    pub provider_api_key: Option<String>,
    pub provider_api_url: String,
    pub provider_timeout: Duration,
    pub provider_workers: usize,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: app::LogLevel::get()?,
            store: app::Store::get()?,

            web_bind_address: web::BindAddress::get()?,
            web_port: web::Port::get()?,
            cors_origins: web::CorsOrigins::get()?,

            mongodb_username: optional::<mongo::Username, _>()?,
            mongodb_password: optional::<mongo::Password, _>()?,
            mongodb_host: mongo::Host::get()?,
            mongodb_port: mongo::Port::get()?,
            mongodb_database_name: mongo::DatabaseName::get()?,
            mongodb_collection_name: mongo::CollectionName::get()?,

            provider_api_key: optional::<provider::ApiKey, _>()?,
            provider_api_url: provider::ApiUrl::get()?,
            provider_timeout: provider::Timeout::get()?,
            provider_workers: provider::Workers::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.mongodb_username.is_some() != self.mongodb_password.is_some() {
            return Err(EnvError {
                variable: mongo::Password::NAME.to_string(),
                message: "MongoDB user name and password must be set together".to_string(),
            });
        }
        Ok(())
    }

    /// 记录配置摘要（隐藏敏感信息）
    pub fn log_summary(&self) {
        tracing::info!("Environment Configuration Summary:");
        tracing::info!("  Log Level: {}", self.log_level);
        tracing::info!("  Store: {}", self.store.as_str());
        tracing::info!("  Web Server: {}:{}", self.web_bind_address, self.web_port);
        if self.store == StoreBackend::MongoDb {
            tracing::info!(
                "  MongoDB: {}:{}/{}.{}",
                self.mongodb_host,
                self.mongodb_port,
                self.mongodb_database_name,
                self.mongodb_collection_name
            );
        }
        tracing::info!("  Provider: {}", self.provider_api_url);
        if self.provider_api_key.is_some() {
            tracing::info!("  API Key: [configured]");
        }
    }
}

/// 读取可选变量：未设置时为 `None`，设置了但无效时报错
fn optional<V: EnvVar<T>, T>() -> EnvResult<Option<T>> {
    match env::var(V::NAME) {
        Ok(value) => V::parse(&value).map(Some),
        Err(_) => Ok(None),
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    push_doc(&mut docs, app::LogLevel::NAME, app::LogLevel::DESCRIPTION, "info");
    push_doc(&mut docs, app::Store::NAME, app::Store::DESCRIPTION, "mongodb");

    docs.push_str("\n## Web Server Configuration\n\n");
    push_doc(&mut docs, web::BindAddress::NAME, web::BindAddress::DESCRIPTION, "127.0.0.1");
    push_doc(&mut docs, web::Port::NAME, web::Port::DESCRIPTION, "8000");
    push_doc(&mut docs, web::CorsOrigins::NAME, web::CorsOrigins::DESCRIPTION, "*");

    docs.push_str("\n## MongoDB Configuration\n\n");
    push_doc(&mut docs, mongo::Username::NAME, mongo::Username::DESCRIPTION, "-");
    push_doc(&mut docs, mongo::Password::NAME, mongo::Password::DESCRIPTION, "-");
    push_doc(&mut docs, mongo::Host::NAME, mongo::Host::DESCRIPTION, "localhost");
    push_doc(&mut docs, mongo::Port::NAME, mongo::Port::DESCRIPTION, "27017");
    push_doc(&mut docs, mongo::DatabaseName::NAME, mongo::DatabaseName::DESCRIPTION, "translates");
    push_doc(&mut docs, mongo::CollectionName::NAME, mongo::CollectionName::DESCRIPTION, "words");

    docs.push_str("\n## Translation Provider Configuration\n\n");
    push_doc(&mut docs, provider::ApiKey::NAME, provider::ApiKey::DESCRIPTION, "-");
    push_doc(&mut docs, provider::ApiUrl::NAME, provider::ApiUrl::DESCRIPTION, provider::DEFAULT_API_URL);
    push_doc(&mut docs, provider::Timeout::NAME, provider::Timeout::DESCRIPTION, "10");
    push_doc(&mut docs, provider::Workers::NAME, provider::Workers::DESCRIPTION, "4");

    docs
}

fn push_doc(docs: &mut String, name: &str, description: &str, default: &str) {
    docs.push_str(&format!("- `{}`: {} (default: {})\n", name, description, default));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(app::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert_eq!(app::LogLevel::parse("warn").unwrap(), "warn");
        assert!(app::LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn test_store_parsing() {
        assert_eq!(app::Store::parse("memory").unwrap(), StoreBackend::Memory);
        assert_eq!(app::Store::parse(" Mongo ").unwrap(), StoreBackend::MongoDb);
        assert!(app::Store::parse("redis").is_err());
    }

    #[test]
    fn test_port_validation() {
        assert_eq!(web::Port::parse("8000").unwrap(), 8000);
        assert_eq!(mongo::Port::parse("27017").unwrap(), 27017);
        assert!(web::Port::parse("0").is_err());
        assert!(web::Port::parse("70000").is_err());
        assert!(web::Port::parse("http").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(provider::ApiUrl::parse("http://localhost:1188").is_ok());
        assert!(provider::ApiUrl::parse(provider::DEFAULT_API_URL).is_ok());
        assert!(provider::ApiUrl::parse("ftp://example.com").is_err());
    }

    #[test]
    fn test_numeric_validation() {
        assert_eq!(provider::Workers::parse("8").unwrap(), 8);
        assert!(provider::Workers::parse("0").is_err());
        assert!(provider::Workers::parse("65").is_err());
        assert_eq!(provider::Timeout::parse("3").unwrap(), Duration::from_secs(3));
        assert!(provider::Timeout::parse("-1").is_err());
    }

    #[test]
    fn test_cors_origins_split() {
        let origins = web::CorsOrigins::parse("http://a.test, ,http://b.test").unwrap();
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_credentials_must_be_paired() {
        let mut config = EnvConfig {
            log_level: "info".to_string(),
            store: StoreBackend::Memory,
            web_bind_address: "127.0.0.1".to_string(),
            web_port: 8000,
            cors_origins: vec!["*".to_string()],
            mongodb_username: Some("root".to_string()),
            mongodb_password: None,
            mongodb_host: "localhost".to_string(),
            mongodb_port: 27017,
            mongodb_database_name: "translates".to_string(),
            mongodb_collection_name: "words".to_string(),
            provider_api_key: None,
            provider_api_url: provider::DEFAULT_API_URL.to_string(),
            provider_timeout: Duration::from_secs(10),
            provider_workers: 4,
        };
        assert!(config.validate().is_err());

        config.mongodb_password = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_docs_list_every_section() {
        let docs = generate_env_docs();
        assert!(docs.contains("MONGO_COLLECTION_NAME"));
        assert!(docs.contains("API_KEY"));
        assert!(docs.contains("WORD_CACHE_STORE"));
    }
}
