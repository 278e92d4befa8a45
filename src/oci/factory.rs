use anyhow::Result;
use std::sync::Arc;

use super::functions::{FunctionsClientConfig, OciFunctionsClient};
use super::traits::{FunctionInvoker, TextDetector};
use super::vision::{OciVisionClient, VisionClientConfig};
use crate::util::config::Config;
use crate::util::http_client::{HttpClient, HttpClientConfig};

/// 处理器依赖的外部服务
#[derive(Clone)]
pub struct Collaborators {
    pub text_detector: Arc<dyn TextDetector>,
    pub function_invoker: Arc<dyn FunctionInvoker>,
}

/// 按配置创建 OCI 服务客户端
pub fn create_collaborators(config: &Config) -> Result<Collaborators> {
    let http_config = HttpClientConfig {
        timeout_secs: Some(config.oci.request_timeout_secs),
        connect_timeout_secs: config.document_generator.connect_timeout_secs,
        ..HttpClientConfig::default()
    }
    .with_env_proxy();
    let http = HttpClient::new(http_config)?;

    let vision_endpoint = config.oci.vision_endpoint();
    let functions_endpoint = config.oci.functions_endpoint();

    let text_detector = OciVisionClient::new(
        http.clone(),
        VisionClientConfig {
            endpoint: vision_endpoint.clone(),
            language: config.detection.language.clone(),
            max_results: config.detection.max_results,
            auth_token: config.oci.auth_token.clone(),
        },
    );

    let function_invoker = OciFunctionsClient::new(
        http,
        FunctionsClientConfig {
            management_endpoint: functions_endpoint.clone(),
            connect_timeout_secs: config.document_generator.connect_timeout_secs,
            auth_token: config.oci.auth_token.clone(),
        },
    );

    tracing::info!(
        event = "oci.clients.ready",
        vision_endpoint = %vision_endpoint,
        functions_endpoint = %functions_endpoint
    );

    Ok(Collaborators {
        text_detector: Arc::new(text_detector),
        function_invoker: Arc::new(function_invoker),
    })
}
