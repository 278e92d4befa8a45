//! 服务器模块
//!
//! - 配置管理 (config.rs)
//! - HTTP服务器设置 (http.rs)

pub mod config;
pub mod http;

pub use config::ConfigManager;
pub use http::{HttpServer, ServerManager};

use crate::build_info;
use crate::handler::{EventHandler, HandlerError};
use crate::model::FunctionMessage;
use crate::util::config::{Config, ValidationReport};
use crate::AppState;
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// 服务器引导程序 - 统一的启动入口
pub struct ServerBootstrap {
    config: Config,
    _log_guard: Option<WorkerGuard>,
}

impl ServerBootstrap {
    /// 加载配置并初始化日志；配置存在错误时拒绝启动
    pub fn new() -> Result<Self> {
        let (config, validation_report) = ConfigManager::load_and_validate()?;
        let log_guard = ConfigManager::initialize_logging(&config)?;
        ConfigManager::log_validation_report(&validation_report);

        if validation_report.has_errors() {
            return Err(anyhow!(
                "配置验证失败: {} 个错误",
                validation_report.error_count()
            ));
        }

        Ok(Self {
            config,
            _log_guard: log_guard,
        })
    }

    fn create_app_state(&self) -> Result<AppState> {
        let handler = EventHandler::from_config(&self.config)?;
        Ok(AppState::new(handler))
    }

    /// 启动HTTP服务
    pub async fn start(self) -> Result<()> {
        info!(
            event = "server.start",
            version = %build_info::summary(),
            address = %self.config.bind_address(),
            threshold = self.config.detection.confidence_threshold
        );

        let app_state = self.create_app_state()?;
        let server = ServerManager::create_server(&self.config, app_state).await?;
        ServerManager::start_server(server).await
    }

    /// 对单个事件文件执行一次完整处理
    pub async fn invoke_file(&self, event_path: &Path) -> Result<(FunctionMessage, bool)> {
        let body = std::fs::read(event_path)
            .with_context(|| format!("读取事件文件失败: {}", event_path.display()))?;
        let handler = EventHandler::from_config(&self.config)?;

        Ok(match handler.handle(&body).await {
            Ok(outcome) => (FunctionMessage::new(outcome.message()), true),
            Err(err) => (FunctionMessage::new(err.response_message()), !is_failure(&err)),
        })
    }
}

/// 事件不可用或内部错误视为失败退出
fn is_failure(err: &HandlerError) -> bool {
    !err.status_code().is_success()
}

/// 启动完整服务
pub async fn start_server() -> Result<()> {
    let server = ServerBootstrap::new()?;
    server.start().await
}

/// 处理单个事件文件并打印响应
pub async fn invoke_once(event_path: &Path) -> Result<bool> {
    let server = ServerBootstrap::new()?;
    let (message, succeeded) = server.invoke_file(event_path).await?;
    println!("{}", serde_json::to_string(&message)?);
    Ok(succeeded)
}

/// 只加载并验证配置，不初始化外部客户端，也不写出任何文件
pub fn check_config() -> Result<ValidationReport> {
    let config_path = ConfigManager::find_config_file_path(config::CONFIG_FILE_NAME);
    let report = ConfigManager::check_file(&config_path)?;
    println!("配置文件: {}", config_path.display());
    println!("版本信息: {}", build_info::summary());
    Ok(report)
}
