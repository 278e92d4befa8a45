//! 配置验证模块
//! 提供配置的验证、检查和诊断功能

use super::types::*;
use url::Url;

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 全面验证配置
    pub fn validate_all(config: &Config) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_server_config(&config.server, &mut report);
        Self::validate_oci_config(&config.oci, &mut report);
        Self::validate_detection_config(&config.detection, &mut report);
        Self::validate_document_generator_config(&config.document_generator, &mut report);
        Self::validate_logging_config(&config.logging, &mut report);

        report
    }

    fn validate_server_config(server: &ServerConfig, report: &mut ValidationReport) {
        if server.port == 0 {
            report.add_error("server.port", "端口不能为0");
        }
        if server.host.trim().is_empty() {
            report.add_error("server.host", "监听地址不能为空");
        }
    }

    fn validate_oci_config(oci: &OciConfig, report: &mut ValidationReport) {
        if oci.region.trim().is_empty() {
            report.add_error("oci.region", "region不能为空");
        }

        if oci.compartment_id.trim().is_empty() {
            report.add_error("oci.compartment_id", "compartment_id不能为空");
        } else if !oci.compartment_id.starts_with("ocid1.") {
            report.add_warning(
                "oci.compartment_id",
                &format!("compartment_id 不是OCID格式: {}", oci.compartment_id),
            );
        } else if oci.compartment_id.contains("<replace-me>") {
            report.add_error("oci.compartment_id", "compartment_id 仍为模板占位值");
        }

        for (field, endpoint) in [
            ("oci.vision_endpoint", oci.vision_endpoint()),
            ("oci.functions_endpoint", oci.functions_endpoint()),
        ] {
            Self::validate_http_url(field, &endpoint, report);
        }

        if oci.request_timeout_secs == 0 {
            report.add_error("oci.request_timeout_secs", "请求超时必须大于0");
        }

        if oci.auth_token.is_none() {
            report.add_info(
                "oci.auth_token",
                "未配置Authorization，依赖运行环境完成请求签名",
            );
        }
    }

    fn validate_detection_config(detection: &DetectionConfig, report: &mut ValidationReport) {
        if !(0.0..=1.0).contains(&detection.confidence_threshold) {
            report.add_error(
                "detection.confidence_threshold",
                &format!(
                    "置信度阈值必须在[0,1]之间: {}",
                    detection.confidence_threshold
                ),
            );
        }
        if detection.max_results == 0 {
            report.add_error("detection.max_results", "max_results必须大于0");
        }
        if detection.language.trim().is_empty() {
            report.add_warning("detection.language", "未指定识别语言");
        }
    }

    fn validate_document_generator_config(
        docgen: &DocumentGeneratorConfig,
        report: &mut ValidationReport,
    ) {
        if docgen.function_id.trim().is_empty() {
            report.add_error("document_generator.function_id", "function_id不能为空");
        } else if docgen.function_id.contains("<replace-me>") {
            report.add_error("document_generator.function_id", "function_id 仍为模板占位值");
        }

        if docgen.template_object.trim().is_empty() {
            report.add_error("document_generator.template_object", "报告模板对象名不能为空");
        } else if !docgen.template_object.ends_with(".docx") {
            report.add_warning(
                "document_generator.template_object",
                &format!("报告模板不是docx文件: {}", docgen.template_object),
            );
        }

        if docgen.font_object.is_none() {
            report.add_info("document_generator.font_object", "未配置字体包，使用默认字体");
        }

        if docgen.connect_timeout_secs == 0 {
            report.add_error("document_generator.connect_timeout_secs", "连接超时必须大于0");
        }
    }

    fn validate_logging_config(logging: &LoggingConfig, report: &mut ValidationReport) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            report.add_warning(
                "logging.level",
                &format!("未知日志级别: {}，将使用info", logging.level),
            );
        }

        if logging.file.enabled && logging.file.directory.trim().is_empty() {
            report.add_error("logging.file.directory", "启用文件日志时目录不能为空");
        }
    }

    fn validate_http_url(field: &str, value: &str, report: &mut ValidationReport) {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => report.add_error(field, &format!("不支持的协议: {}", url.scheme())),
            Err(e) => report.add_error(field, &format!("无效的URL {}: {}", value, e)),
        }
    }
}

/// 验证报告
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub info: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_info(&mut self, field: &str, message: &str) {
        self.info.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

/// 验证问题
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::config::ConfigWriter;

    fn valid_config() -> Config {
        let mut config = ConfigWriter::generate_template();
        config.oci.compartment_id = "ocid1.compartment.oc1..aaa".to_string();
        config.document_generator.function_id = "ocid1.fnfunc.oc1.iad.bbb".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        let report = ConfigValidator::validate_all(&valid_config());
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn test_template_placeholders_rejected() {
        let report = ConfigValidator::validate_all(&ConfigWriter::generate_template());
        let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"oci.compartment_id"));
        assert!(fields.contains(&"document_generator.function_id"));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = valid_config();
        config.detection.confidence_threshold = 1.5;
        let report = ConfigValidator::validate_all(&config);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.errors[0].field, "detection.confidence_threshold");
    }

    #[test]
    fn test_bad_endpoint_scheme() {
        let mut config = valid_config();
        config.oci.vision_endpoint = Some("ftp://vision.example.com".to_string());
        let report = ConfigValidator::validate_all(&config);
        assert!(report
            .errors
            .iter()
            .any(|e| e.field == "oci.vision_endpoint"));
    }
}
