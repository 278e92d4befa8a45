use crate::util::config::LoggingConfig;
use std::io;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::daily;
use tracing_subscriber::fmt::format::Format;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter::EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// 初始化日志：控制台必开，文件日志按配置按天滚动
///
/// 返回的 guard 需要在进程生命周期内持有，否则文件日志会丢失尾部内容
pub fn log_init_with_config(
    file_prefix: &str,
    config: &LoggingConfig,
) -> anyhow::Result<Option<WorkerGuard>> {
    let level_filter = parse_level(&config.level);
    let use_json = config.structured.unwrap_or(false);

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let stdout_layer = if use_json {
        layer()
            .json()
            .with_target(false)
            .with_writer(io::stdout)
            .with_filter(build_env_filter(level_filter))
            .boxed()
    } else {
        let console_format = Format::default()
            .with_level(true)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false);
        layer()
            .event_format(console_format)
            .with_writer(io::stdout)
            .with_filter(build_env_filter(level_filter))
            .boxed()
    };
    layers.push(stdout_layer);

    let mut guard = None;
    let mut log_dir_display = None;
    if config.file.enabled {
        let log_dir = resolve_log_dir(&config.file.directory);
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = daily(&log_dir, format!("{}.log", file_prefix));
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = if use_json {
            layer()
                .json()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(build_env_filter(level_filter))
                .boxed()
        } else {
            layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(non_blocking)
                .with_filter(build_env_filter(level_filter))
                .boxed()
        };
        layers.push(file_layer);
        guard = Some(file_guard);
        log_dir_display = Some(log_dir.display().to_string());
    }

    Registry::default().with(layers).try_init()?;

    tracing::info!(
        event = "log.init",
        level = %config.level,
        console = true,
        file = config.file.enabled,
        directory = log_dir_display.as_deref().unwrap_or("-"),
        rotation = "daily",
        structured = use_json
    );

    Ok(guard)
}

/// 相对路径基于工作目录，若在 bin/ 下运行则取上级目录
pub(crate) fn resolve_log_dir(directory: &str) -> PathBuf {
    let path = Path::new(directory);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if current_dir.file_name() == Some(std::ffi::OsStr::new("bin")) {
        if let Some(parent) = current_dir.parent() {
            return parent.join(directory);
        }
    }
    current_dir.join(directory)
}

/// RUST_LOG 优先，其次使用配置中的级别
fn build_env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_filter_to_str(level)))
}

pub fn cleanup_old_logs(log_dir: &Path, file_prefix: &str, retention_days: u32) -> anyhow::Result<usize> {
    if !log_dir.exists() {
        tracing::debug!("日志目录不存在: {}", log_dir.display());
        return Ok(0);
    }

    let retention = std::time::Duration::from_secs(retention_days as u64 * 24 * 60 * 60);
    let cutoff = std::time::SystemTime::now()
        .checked_sub(retention)
        .unwrap_or(std::time::UNIX_EPOCH);

    let mut deleted_count = 0;
    let mut error_count = 0;

    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        // 只处理本服务的日志文件
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("");
        if !file_name.starts_with(file_prefix) {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let modified = metadata
            .modified()
            .or_else(|_| metadata.created())
            .unwrap_or_else(|_| std::time::SystemTime::now());

        if modified < cutoff {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    deleted_count += 1;
                    tracing::debug!("已删除过期日志: {}", path.display());
                }
                Err(e) => {
                    error_count += 1;
                    tracing::warn!("删除日志文件失败: {} - {}", path.display(), e);
                }
            }
        }
    }

    if deleted_count > 0 {
        tracing::info!(event = "log.cleanup", deleted = deleted_count, retention_days);
    }
    if error_count > 0 {
        tracing::warn!("有 {} 个文件清理失败", error_count);
    }

    Ok(deleted_count)
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

fn level_filter_to_str(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::ERROR => "error",
        LevelFilter::WARN => "warn",
        LevelFilter::INFO => "info",
        LevelFilter::DEBUG => "debug",
        LevelFilter::TRACE => "trace",
        _ => "off",
    }
}
