use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use super::traits::TextDetector;
use super::with_authorization;
use crate::model::detection::AnalyzeImageResult;
use crate::model::docgen::SOURCE_OBJECT_STORAGE;
use crate::model::{ImageLocation, TextDetectionResult};
use crate::util::http_client::HttpClient;

const ANALYZE_IMAGE_PATH: &str = "/20220125/actions/analyzeImage";
const FEATURE_TEXT_DETECTION: &str = "TEXT_DETECTION";

/// AI Vision 客户端配置
#[derive(Debug, Clone)]
pub struct VisionClientConfig {
    pub endpoint: String,
    pub language: String,
    pub max_results: u32,
    pub auth_token: Option<String>,
}

/// OCI AI Vision REST 客户端
pub struct OciVisionClient {
    http: HttpClient,
    config: VisionClientConfig,
}

impl OciVisionClient {
    pub fn new(http: HttpClient, config: VisionClientConfig) -> Self {
        Self { http, config }
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}{}",
            self.config.endpoint.trim_end_matches('/'),
            ANALYZE_IMAGE_PATH
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeImageRequest<'a> {
    compartment_id: &'a str,
    image: ObjectStorageImage<'a>,
    features: Vec<ImageFeature<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ObjectStorageImage<'a> {
    source: &'a str,
    namespace_name: &'a str,
    bucket_name: &'a str,
    object_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageFeature<'a> {
    feature_type: &'a str,
    language: &'a str,
    max_results: u32,
}

#[async_trait]
impl TextDetector for OciVisionClient {
    async fn detect_text(
        &self,
        compartment_id: &str,
        image: &ImageLocation,
    ) -> Result<TextDetectionResult> {
        let started = Instant::now();

        let body = AnalyzeImageRequest {
            compartment_id,
            image: ObjectStorageImage {
                source: SOURCE_OBJECT_STORAGE,
                namespace_name: &image.namespace,
                bucket_name: &image.bucket,
                object_name: &image.object_name,
            },
            features: vec![ImageFeature {
                feature_type: FEATURE_TEXT_DETECTION,
                language: &self.config.language,
                max_results: self.config.max_results,
            }],
        };

        let request = self
            .http
            .reqwest_client()
            .post(self.analyze_url())
            .json(&body);
        let response = with_authorization(request, self.config.auth_token.as_deref())
            .send()
            .await
            .context("AI Vision HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("AI Vision returned {}: {}", status, error_body);
        }

        let analyzed: AnalyzeImageResult = response
            .json()
            .await
            .context("Failed to decode AI Vision response")?;
        let detection = analyzed.into_detection();

        debug!(
            words = detection.words.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "AI Vision analyzeImage completed"
        );
        Ok(detection)
    }
}
