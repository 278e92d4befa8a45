//! 配置结构定义模块
//! 包含函数运行所需的全部配置数据结构

use serde::{Deserialize, Serialize};

use crate::util::evaluator::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::util::report::payload::DEFAULT_DISPLAY_HEIGHT;

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub oci: OciConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    pub document_generator: DocumentGeneratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn get_port(&self) -> u16 {
        self.server.port
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// OCI 服务访问配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OciConfig {
    pub region: String,
    pub compartment_id: String,
    /// 为空时按 region 推导
    #[serde(default)]
    pub vision_endpoint: Option<String>,
    #[serde(default)]
    pub functions_endpoint: Option<String>,
    /// 透传的 Authorization 值，签名由运行环境负责
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl OciConfig {
    pub fn vision_endpoint(&self) -> String {
        match self.vision_endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => endpoint.trim_end_matches('/').to_string(),
            _ => format!("https://vision.aiservice.{}.oci.oraclecloud.com", self.region),
        }
    }

    pub fn functions_endpoint(&self) -> String {
        match self.functions_endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => endpoint.trim_end_matches('/').to_string(),
            _ => format!("https://functions.{}.oci.oraclecloud.com", self.region),
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}

/// 文本检测配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            max_results: default_max_results(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

fn default_language() -> String {
    "ENG".to_string()
}

fn default_max_results() -> u32 {
    10
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

/// 文档生成函数配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentGeneratorConfig {
    pub function_id: String,
    pub template_object: String,
    #[serde(default)]
    pub font_object: Option<String>,
    #[serde(default = "default_display_height")]
    pub display_height: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_display_height() -> String {
    DEFAULT_DISPLAY_HEIGHT.to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: LogFileConfig,
    pub structured: Option<bool>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: LogFileConfig::default(),
            structured: Some(false),
        }
    }
}

/// 日志文件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFileConfig {
    pub enabled: bool,
    pub directory: String,
    pub retention_days: Option<u32>,
}

impl Default for LogFileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: "logs".to_string(),
            retention_days: Some(7),
        }
    }
}
