use serde::{Deserialize, Serialize};

pub mod detection;
pub mod docgen;
pub mod event;
pub mod report;

pub use detection::{BoundingPolygon, DetectedWord, NormalizedVertex, TextDetectionResult};
pub use event::{ImageLocation, ObjectStorageEvent};
pub use report::{Corner, ImageReference, ReportPayload, ReportWord};

/// 函数响应体 `{"message": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionMessage {
    pub message: String,
}

impl FunctionMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// 健康检查相关的数据结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime: u64,
    pub timestamp: String,
}
