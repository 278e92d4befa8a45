//! HTTP客户端模块
//!
//! 提供可配置的HTTP客户端，支持：
//! - 超时配置
//! - 代理设置
//! - 连接池管理

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// HTTP客户端配置
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// 整个请求的超时时间（秒），为空则不限制
    pub timeout_secs: Option<u64>,
    /// 单次读取的超时时间（秒），为空则不限制
    pub read_timeout_secs: Option<u64>,
    /// 连接超时时间（秒）
    pub connect_timeout_secs: u64,
    /// User-Agent
    pub user_agent: String,
    /// 连接池空闲超时（秒）
    pub pool_idle_timeout_secs: u64,
    /// HTTP代理URL（可选）
    pub http_proxy: Option<String>,
    /// HTTPS代理URL（可选）
    pub https_proxy: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(60),
            read_timeout_secs: None,
            connect_timeout_secs: 10,
            user_agent: format!("text-anomaly-detection/{}", env!("CARGO_PKG_VERSION")),
            pool_idle_timeout_secs: 90,
            http_proxy: None,
            https_proxy: None,
        }
    }
}

impl HttpClientConfig {
    /// 从环境变量加载代理配置
    pub fn with_env_proxy(mut self) -> Self {
        if let Ok(proxy_url) = std::env::var("HTTP_PROXY") {
            self.http_proxy = Some(proxy_url);
        }
        if let Ok(proxy_url) = std::env::var("HTTPS_PROXY") {
            self.https_proxy = Some(proxy_url);
        }
        self
    }

    /// 复制一份只限制连接和单次读取、不限制总时长的配置
    pub fn with_read_timeout(&self, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        Self {
            connect_timeout_secs,
            timeout_secs: None,
            read_timeout_secs: Some(read_timeout_secs),
            ..self.clone()
        }
    }
}

/// HTTP客户端包装器
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// 创建新的HTTP客户端
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Self::build_reqwest_client(&config)?;
        Ok(Self { client, config })
    }

    fn build_reqwest_client(config: &HttpClientConfig) -> Result<Client> {
        let mut client_builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(&config.user_agent)
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs));

        if let Some(timeout_secs) = config.timeout_secs {
            client_builder = client_builder.timeout(Duration::from_secs(timeout_secs));
        }
        if let Some(read_timeout_secs) = config.read_timeout_secs {
            client_builder = client_builder.read_timeout(Duration::from_secs(read_timeout_secs));
        }

        if let Some(proxy_url) = &config.http_proxy {
            if let Ok(proxy) = reqwest::Proxy::http(proxy_url) {
                info!("使用HTTP代理: {}", proxy_url);
                client_builder = client_builder.proxy(proxy);
            } else {
                warn!("HTTP代理配置无效: {}", proxy_url);
            }
        }

        if let Some(proxy_url) = &config.https_proxy {
            if let Ok(proxy) = reqwest::Proxy::https(proxy_url) {
                info!("使用HTTPS代理: {}", proxy_url);
                client_builder = client_builder.proxy(proxy);
            } else {
                warn!("HTTPS代理配置无效: {}", proxy_url);
            }
        }

        client_builder.build().context("构建HTTP客户端失败")
    }

    /// 获取底层reqwest客户端
    pub fn reqwest_client(&self) -> &Client {
        &self.client
    }

    /// 获取配置
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// 以相同的代理/UA设置构建一个按读取超时控制的新客户端
    pub fn with_read_timeout(&self, connect_timeout_secs: u64, read_timeout_secs: u64) -> Result<Self> {
        Self::new(self.config.with_read_timeout(connect_timeout_secs, read_timeout_secs))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish()
    }
}
