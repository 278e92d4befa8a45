use axum::http::StatusCode;
use thiserror::Error;

use crate::util::report::PayloadError;

/// 单次调用中可能出现的错误
///
/// 除 `Internal` 外都属于已归类错误：记录日志后转换为描述性响应消息，不做重试
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("No data provided")]
    EmptyEvent,

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Text detection failed: {0}")]
    DetectionService(String),

    #[error("Malformed detection data: {0}")]
    MalformedDetectionData(#[from] PayloadError),

    #[error("Document generator function call failed: {0}")]
    DocGenInvocation(String),

    #[error("Document generation failure: '{code}'. See Application Log")]
    DocGenApplication { code: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// 日志中使用的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::EmptyEvent => "empty_event",
            HandlerError::MalformedEvent(_) => "malformed_event",
            HandlerError::DetectionService(_) => "detection_service",
            HandlerError::MalformedDetectionData(_) => "malformed_detection_data",
            HandlerError::DocGenInvocation(_) => "docgen_invocation",
            HandlerError::DocGenApplication { .. } => "docgen_application",
            HandlerError::Internal(_) => "internal",
        }
    }

    pub fn is_classified(&self) -> bool {
        !matches!(self, HandlerError::Internal(_))
    }

    /// 事件本身有问题时返回 400，未归类错误返回 500，其余调用已完成并报告失败
    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::EmptyEvent | HandlerError::MalformedEvent(_) => StatusCode::BAD_REQUEST,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }

    /// 返回给调用方的消息；未归类错误不暴露内部细节
    pub fn response_message(&self) -> String {
        match self {
            HandlerError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }

    pub(crate) fn internal(err: impl std::fmt::Display) -> Self {
        HandlerError::Internal(err.to_string())
    }
}
