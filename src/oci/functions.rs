use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::traits::{FunctionDetails, FunctionInvoker};
use super::with_authorization;
use crate::model::docgen::InvokeResponse;
use crate::util::http_client::HttpClient;

const FUNCTIONS_API_VERSION: &str = "20181201";

/// Functions 客户端配置
#[derive(Debug, Clone)]
pub struct FunctionsClientConfig {
    /// 管理面入口，用于查询函数详情
    pub management_endpoint: String,
    /// 调用时的连接超时；读超时跟随函数自身配置
    pub connect_timeout_secs: u64,
    pub auth_token: Option<String>,
}

/// OCI Functions REST 客户端（管理面查询 + 调用）
pub struct OciFunctionsClient {
    http: HttpClient,
    config: FunctionsClientConfig,
}

impl OciFunctionsClient {
    pub fn new(http: HttpClient, config: FunctionsClientConfig) -> Self {
        Self { http, config }
    }

    fn function_url(&self, function_id: &str) -> String {
        format!(
            "{}/{}/functions/{}",
            self.config.management_endpoint.trim_end_matches('/'),
            FUNCTIONS_API_VERSION,
            function_id
        )
    }

    /// 只限制连接和单次读取，读超时与函数超时一致，长耗时的文档生成不受总时长限制
    fn invoke_client(&self, function: &FunctionDetails) -> Result<HttpClient> {
        self.http
            .with_read_timeout(self.config.connect_timeout_secs, function.timeout_in_seconds)
    }

    fn invoke_url(function: &FunctionDetails) -> String {
        format!(
            "{}/{}/functions/{}/actions/invoke",
            function.invoke_endpoint.trim_end_matches('/'),
            FUNCTIONS_API_VERSION,
            function.id
        )
    }
}

#[async_trait]
impl FunctionInvoker for OciFunctionsClient {
    async fn get_function(&self, function_id: &str) -> Result<FunctionDetails> {
        let request = self
            .http
            .reqwest_client()
            .get(self.function_url(function_id));
        let response = with_authorization(request, self.config.auth_token.as_deref())
            .send()
            .await
            .context("Functions management HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("GetFunction returned {}: {}", status, error_body);
        }

        let details: FunctionDetails = response
            .json()
            .await
            .context("Failed to decode GetFunction response")?;

        debug!(
            function_id = %details.id,
            invoke_endpoint = %details.invoke_endpoint,
            timeout_secs = details.timeout_in_seconds,
            "函数详情查询完成"
        );
        Ok(details)
    }

    async fn invoke_function(
        &self,
        function: &FunctionDetails,
        body: String,
    ) -> Result<InvokeResponse> {
        let invoke_client = self.invoke_client(function)?;
        let client_config = invoke_client.config();

        info!(
            function_id = %function.id,
            connect_timeout_secs = client_config.connect_timeout_secs,
            read_timeout_secs = ?client_config.read_timeout_secs,
            "调用函数"
        );

        let request = invoke_client
            .reqwest_client()
            .post(Self::invoke_url(function))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        let response = with_authorization(request, self.config.auth_token.as_deref())
            .send()
            .await
            .context("Function invoke HTTP request failed")?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read function invoke response body")?;

        Ok(InvokeResponse { status_code, body })
    }
}
