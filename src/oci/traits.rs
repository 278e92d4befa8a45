use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::docgen::InvokeResponse;
use crate::model::{ImageLocation, TextDetectionResult};

/// 文本检测服务
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// 检测对象存储中一张图片里的文字
    async fn detect_text(
        &self,
        compartment_id: &str,
        image: &ImageLocation,
    ) -> Result<TextDetectionResult>;
}

/// 函数调用服务
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// 查询函数详情（调用入口与超时）
    async fn get_function(&self, function_id: &str) -> Result<FunctionDetails>;

    /// 调用函数；只有传输层失败才返回 Err，非 2xx 状态由调用方解读
    async fn invoke_function(&self, function: &FunctionDetails, body: String)
        -> Result<InvokeResponse>;
}

/// 函数详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDetails {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub invoke_endpoint: String,
    #[serde(default = "default_function_timeout")]
    pub timeout_in_seconds: u64,
}

fn default_function_timeout() -> u64 {
    30
}
