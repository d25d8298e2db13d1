//! Web 服务器配置
//!
//! 使用类型安全的环境变量系统进行配置管理

use crate::env::{EnvConfig, EnvError, EnvResult};

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
    /// 允许的跨域来源，`*` 表示任意来源
    pub cors_origins: Vec<String>,
}

impl WebConfig {
    /// 从环境变量配置创建
    pub fn from_env(config: &EnvConfig) -> Self {
        Self {
            bind_addr: config.web_bind_address.clone(),
            port: config.web_port,
            cors_origins: config.cors_origins.clone(),
        }
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.bind_addr.is_empty() {
            return Err(EnvError {
                variable: "WORD_CACHE_BIND_ADDRESS".to_string(),
                message: "Bind address cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(EnvError {
                variable: "WORD_CACHE_PORT".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// 是否允许任意来源
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
        }
    }
}
