use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::report::ReportPayload;

pub const REQUEST_TYPE_SINGLE: &str = "SINGLE";
pub const TAG_SYNTAX_DOCGEN_1_0: &str = "DOCGEN_1_0";
pub const SOURCE_INLINE: &str = "INLINE";
pub const SOURCE_OBJECT_STORAGE: &str = "OBJECT_STORAGE";

pub const CONTENT_TYPE_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const CONTENT_TYPE_ZIP: &str = "application/zip";
pub const CONTENT_TYPE_PDF: &str = "application/pdf";

/// 文档生成函数请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocGenRequest {
    pub request_type: String,
    pub tag_syntax: String,
    pub data: InlineData,
    pub template: ObjectStorageLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<ObjectStorageLocation>,
    pub output: OutputLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineData {
    pub source: String,
    pub content: ReportPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStorageLocation {
    pub source: String,
    pub namespace: String,
    pub bucket_name: String,
    pub object_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputLocation {
    pub target: String,
    pub namespace: String,
    pub bucket_name: String,
    pub object_name: String,
    pub content_type: String,
}

/// 文档生成函数的应用层响应
///
/// 只关心 `code`，其余字段原样保留用于日志
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocGenResponse {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl DocGenResponse {
    /// 数值上等于 200 即成功，`200` 与 `200.0` 等价，字符串 `"200"` 不算
    pub fn is_success(&self) -> bool {
        matches!(&self.code, Some(code) if code.as_f64() == Some(200.0))
    }

    /// 用于失败提示的 code 文本，缺失时为 `None`
    pub fn code_display(&self) -> String {
        match &self.code {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "None".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// 函数调用的传输层结果
#[derive(Debug, Clone)]
pub struct InvokeResponse {
    pub status_code: u16,
    pub body: String,
}
