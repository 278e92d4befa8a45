//! 配置管理模块
//! 负责配置文件的查找、加载、验证以及日志初始化

use crate::util::config::{Config, ConfigLoader, ConfigValidator, ValidationReport};
use crate::util::log::{cleanup_old_logs, log_init_with_config, resolve_log_dir};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const LOG_FILE_PREFIX: &str = "text-anomaly-detection";

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 查找、加载并验证配置
    pub fn load_and_validate() -> Result<(Config, ValidationReport)> {
        let config_path = Self::find_config_file_path(CONFIG_FILE_NAME);
        Self::load_and_validate_from(&config_path)
    }

    /// 从指定路径加载并验证配置；文件不存在时写出默认模板
    pub fn load_and_validate_from(config_path: &Path) -> Result<(Config, ValidationReport)> {
        let config = match ConfigLoader::load_with_env_overrides(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[warn] 配置文件读取失败: {} - {:#}", config_path.display(), e);
                Self::handle_config_load_failure(config_path)?
            }
        };

        let report = ConfigValidator::validate_all(&config);
        Ok((config, report))
    }

    /// 只读检查：文件缺失时报错，不生成模板
    pub fn check_file(config_path: &Path) -> Result<ValidationReport> {
        if !config_path.exists() {
            return Err(anyhow::anyhow!(
                "配置文件不存在: {}",
                config_path.display()
            ));
        }
        let config = ConfigLoader::load_with_env_overrides(config_path)?;
        Ok(ConfigValidator::validate_all(&config))
    }

    /// 初始化日志系统，并按保留天数清理旧日志
    pub fn initialize_logging(config: &Config) -> Result<Option<WorkerGuard>> {
        let log_guard = log_init_with_config(LOG_FILE_PREFIX, &config.logging)?;

        if config.logging.file.enabled {
            if let Some(retention_days) = config.logging.file.retention_days {
                let log_dir = resolve_log_dir(&config.logging.file.directory);
                match cleanup_old_logs(&log_dir, LOG_FILE_PREFIX, retention_days) {
                    Ok(removed) => info!(
                        event = "log.cleanup",
                        removed,
                        retention_days,
                        "日志清理完成"
                    ),
                    Err(e) => warn!("日志清理失败: {}", e),
                }
            }
        }

        Ok(log_guard)
    }

    /// 记录验证结果（需在日志初始化后调用）
    pub fn log_validation_report(report: &ValidationReport) {
        for error in &report.errors {
            warn!(event = "config.invalid", field = %error.field, "{}", error.message);
        }
        for warning in &report.warnings {
            info!(event = "config.warning", field = %warning.field, "{}", warning.message);
        }
        for item in &report.info {
            info!(event = "config.info", field = %item.field, "{}", item.message);
        }
    }

    /// 智能查找配置文件路径，适应开发和生产环境
    pub fn find_config_file_path(filename: &str) -> PathBuf {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|path| path.parent().map(Path::to_path_buf));
        Self::find_config_in(filename, &current_dir, exe_dir.as_deref())
    }

    fn find_config_in(filename: &str, current_dir: &Path, exe_dir: Option<&Path>) -> PathBuf {
        // 当前目录下的 config/
        let config_in_current = current_dir.join("config").join(filename);
        if config_in_current.exists() {
            return config_in_current;
        }

        // 在 bin/ 下运行时使用上级目录的 config/
        if let Some(parent) = current_dir.parent() {
            let config_in_parent = parent.join("config").join(filename);
            if config_in_parent.exists() {
                return config_in_parent;
            }
        }

        if let Some(exe_dir) = exe_dir {
            if exe_dir.file_name() == Some(std::ffi::OsStr::new("bin")) {
                if let Some(project_root) = exe_dir.parent() {
                    let config_in_root = project_root.join("config").join(filename);
                    if config_in_root.exists() {
                        return config_in_root;
                    }
                }
            }
        }

        current_dir.join(filename)
    }

    /// 处理配置加载失败
    fn handle_config_load_failure(config_path: &Path) -> Result<Config> {
        if !config_path.exists() {
            eprintln!("[note] 创建默认配置文件: {}", config_path.display());
            let config = Config::default();
            if let Err(write_err) = config.write_yaml_to_path(config_path) {
                eprintln!("[fail] 创建默认配置文件失败: {}", write_err);
            }
            Ok(ConfigLoader::apply_env_overrides(config))
        } else {
            Err(anyhow::anyhow!(
                "配置文件解析失败: {}",
                config_path.display()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_prefers_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join("config").join("config.yaml"), "").unwrap();

        let found = ConfigManager::find_config_in("config.yaml", dir.path(), None);
        assert_eq!(found, dir.path().join("config").join("config.yaml"));
    }

    #[test]
    fn test_find_config_from_bin_dir() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join("config").join("config.yaml"), "").unwrap();

        let found = ConfigManager::find_config_in("config.yaml", &bin, Some(&bin));
        assert_eq!(found, dir.path().join("config").join("config.yaml"));
    }

    #[test]
    fn test_find_config_falls_back_to_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("app");
        std::fs::create_dir_all(&nested).unwrap();

        let found = ConfigManager::find_config_in("config.yaml", &nested, None);
        assert_eq!(found, nested.join("config.yaml"));
    }

    #[test]
    fn test_missing_file_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let (config, report) = ConfigManager::load_and_validate_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.get_port(), 8080);
        // 模板中的占位符需要人工替换
        assert!(report.has_errors());
    }

    #[test]
    fn test_check_file_missing_does_not_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let err = ConfigManager::check_file(&path).unwrap_err();
        assert!(err.to_string().contains("配置文件不存在"));
        assert!(!path.exists());
    }

    #[test]
    fn test_check_file_reports_template_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        Config::default().write_yaml_to_path(&path).unwrap();

        let report = ConfigManager::check_file(&path).unwrap();
        assert!(report.has_errors());
    }

    #[test]
    fn test_unparseable_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server: [not, a, map").unwrap();

        assert!(ConfigManager::load_and_validate_from(&path).is_err());
    }
}
