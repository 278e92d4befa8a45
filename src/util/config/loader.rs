//! 配置加载和管理模块
//! 处理配置文件的读取、写入、环境变量覆盖和默认模板生成

use super::types::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从YAML文件读取配置
    pub fn read_yaml(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config = serde_yaml::from_str(&config_str)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        Ok(config)
    }

    /// 从进程环境变量读取配置覆盖
    pub fn apply_env_overrides(config: Config) -> Config {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok())
    }

    /// 按给定的查找函数应用覆盖
    pub fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string());

        if let Some(host) = lookup("TAD_HOST").filter(|v| !v.is_empty()) {
            tracing::info!(event = "config.env_override", key = "TAD_HOST", value = %host);
            config.server.host = host;
        }

        if let Some(port_str) = lookup("TAD_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => {
                    tracing::info!(event = "config.env_override", key = "TAD_PORT", value = port);
                    config.server.port = port;
                }
                Err(_) => tracing::warn!("[warn] TAD_PORT 无法解析为端口: {}", port_str),
            }
        }

        if let Some(region) = lookup("OCI_REGION").filter(|v| !v.is_empty()) {
            tracing::info!(event = "config.env_override", key = "OCI_REGION", value = %region);
            config.oci.region = region;
        }

        if let Some(compartment) = lookup("OCI_COMPARTMENT_ID").filter(|v| !v.is_empty()) {
            tracing::info!(event = "config.env_override", key = "OCI_COMPARTMENT_ID", value = %compartment);
            config.oci.compartment_id = compartment;
        }

        if let Some(token) = lookup("OCI_AUTH_TOKEN") {
            // 安全字段，不打印明文
            tracing::info!(event = "config.env_override", key = "OCI_AUTH_TOKEN", "[隐藏]");
            config.oci.auth_token = Some(token).filter(|v| !v.is_empty());
        }

        if let Some(function_id) = lookup("DOCGEN_FUNCTION_ID").filter(|v| !v.is_empty()) {
            tracing::info!(event = "config.env_override", key = "DOCGEN_FUNCTION_ID", value = %function_id);
            config.document_generator.function_id = function_id;
        }

        if let Some(template) = lookup("DOCGEN_TEMPLATE_OBJECT").filter(|v| !v.is_empty()) {
            tracing::info!(event = "config.env_override", key = "DOCGEN_TEMPLATE_OBJECT", value = %template);
            config.document_generator.template_object = template;
        }

        if let Some(font) = lookup("DOCGEN_FONT_OBJECT") {
            tracing::info!(event = "config.env_override", key = "DOCGEN_FONT_OBJECT", value = %font);
            config.document_generator.font_object = Some(font).filter(|v| !v.is_empty());
        }

        if let Some(threshold_str) = lookup("TAD_CONFIDENCE_THRESHOLD") {
            match threshold_str.parse::<f64>() {
                Ok(threshold) => {
                    tracing::info!(
                        event = "config.env_override",
                        key = "TAD_CONFIDENCE_THRESHOLD",
                        value = threshold
                    );
                    config.detection.confidence_threshold = threshold;
                }
                Err(_) => tracing::warn!(
                    "[warn] TAD_CONFIDENCE_THRESHOLD 无法解析为数值: {}",
                    threshold_str
                ),
            }
        }

        if let Some(level) = lookup("TAD_LOG_LEVEL").filter(|v| !v.is_empty()) {
            config.logging.level = level;
        }

        if let Some(flag) = lookup("TAD_LOG_STRUCTURED") {
            match Self::parse_bool(&flag) {
                Ok(structured) => config.logging.structured = Some(structured),
                Err(_) => tracing::warn!("[warn] TAD_LOG_STRUCTURED 无法解析为布尔值: {}", flag),
            }
        }

        config
    }

    fn parse_bool(value: &str) -> Result<bool, ()> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Ok(true),
            "false" | "0" | "no" | "n" => Ok(false),
            _ => Err(()),
        }
    }

    /// 读取配置文件并应用环境变量覆盖
    pub fn load_with_env_overrides(path: impl AsRef<Path>) -> Result<Config> {
        let base_config = Self::read_yaml(path)?;
        Ok(Self::apply_env_overrides(base_config))
    }
}

/// 配置写入器
pub struct ConfigWriter;

impl ConfigWriter {
    /// 写入配置到指定路径，确保目录存在
    pub fn write_yaml_with_dir(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml_content = serde_yaml::to_string(config)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// 生成配置模板
    pub fn generate_template() -> Config {
        Config {
            server: ServerConfig::default(),
            oci: OciConfig {
                region: "us-ashburn-1".to_string(),
                compartment_id: "ocid1.compartment.oc1..<replace-me>".to_string(),
                vision_endpoint: None,
                functions_endpoint: None,
                auth_token: None,
                request_timeout_secs: 60,
            },
            detection: DetectionConfig::default(),
            document_generator: DocumentGeneratorConfig {
                function_id: "ocid1.fnfunc.oc1.iad..<replace-me>".to_string(),
                template_object: "part2/TextAnomalyTemplate.docx".to_string(),
                font_object: Some("part2/Monoton.zip".to_string()),
                display_height: "450px".to_string(),
                connect_timeout_secs: 10,
            },
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_template_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config").join("config.yaml");

        let template = ConfigWriter::generate_template();
        ConfigWriter::write_yaml_with_dir(&template, &path).unwrap();

        let loaded = ConfigLoader::read_yaml(&path).unwrap();
        assert_eq!(loaded.oci.region, "us-ashburn-1");
        assert_eq!(
            loaded.document_generator.font_object.as_deref(),
            Some("part2/Monoton.zip")
        );
        assert_eq!(loaded.detection.confidence_threshold, 0.90);
    }

    #[test]
    fn test_read_yaml_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = ConfigLoader::read_yaml(temp_dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("读取配置文件失败"));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TAD_PORT", "9090"),
            ("OCI_COMPARTMENT_ID", " ocid1.compartment.oc1..env "),
            ("DOCGEN_FUNCTION_ID", "ocid1.fnfunc.oc1..env"),
            ("DOCGEN_FONT_OBJECT", ""),
            ("TAD_CONFIDENCE_THRESHOLD", "0.75"),
            ("TAD_LOG_STRUCTURED", "yes"),
        ]);

        let config = ConfigLoader::apply_overrides_from(ConfigWriter::generate_template(), |key| {
            vars.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.oci.compartment_id, "ocid1.compartment.oc1..env");
        assert_eq!(config.document_generator.function_id, "ocid1.fnfunc.oc1..env");
        assert!(config.document_generator.font_object.is_none());
        assert_eq!(config.detection.confidence_threshold, 0.75);
        assert_eq!(config.logging.structured, Some(true));
    }

    #[test]
    fn test_invalid_override_keeps_value() {
        let config = ConfigLoader::apply_overrides_from(ConfigWriter::generate_template(), |key| {
            match key {
                "TAD_PORT" => Some("not-a-port".to_string()),
                "TAD_CONFIDENCE_THRESHOLD" => Some("high".to_string()),
                _ => None,
            }
        });
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.detection.confidence_threshold, 0.90);
    }
}
