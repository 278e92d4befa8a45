//! 事件处理器
//!
//! 处理流程：
//! 1. 解析对象存储事件，定位图片
//! 2. 调用 AI Vision 检测图片中的文字
//! 3. 所有单词都清晰时直接结束
//! 4. 否则构建报告数据，调用文档生成函数输出 PDF

pub mod error;

pub use error::HandlerError;

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::model::docgen::{DocGenResponse, InvokeResponse};
use crate::model::{ImageLocation, ObjectStorageEvent};
use crate::oci::{Collaborators, FunctionInvoker, TextDetector};
use crate::util::config::Config;
use crate::util::evaluator::ConfidenceEvaluator;
use crate::util::logging::events;
use crate::util::report::{output_object_name, DocGenRequestBuilder, ReportPayloadBuilder};

pub const MSG_ALL_CLEAR: &str = "All Words are clear in Image";
pub const MSG_DOCUMENT_GENERATED: &str = "Document generated successfully";

/// 失败响应体在日志中保留的最大长度
const MAX_LOGGED_BODY: usize = 512;

/// 处理器运行参数，启动时由配置注入
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    pub compartment_id: String,
    pub function_id: String,
    pub confidence_threshold: f64,
    pub display_height: String,
    pub template_object: String,
    pub font_object: Option<String>,
}

impl From<&Config> for HandlerSettings {
    fn from(config: &Config) -> Self {
        Self {
            compartment_id: config.oci.compartment_id.clone(),
            function_id: config.document_generator.function_id.clone(),
            confidence_threshold: config.detection.confidence_threshold,
            display_height: config.document_generator.display_height.clone(),
            template_object: config.document_generator.template_object.clone(),
            font_object: config.document_generator.font_object.clone(),
        }
    }
}

/// 单次调用的结果
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    AllClear {
        word_count: usize,
    },
    DocumentGenerated {
        output_object: String,
        anomaly_count: usize,
    },
}

impl HandlerOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            HandlerOutcome::AllClear { .. } => MSG_ALL_CLEAR,
            HandlerOutcome::DocumentGenerated { .. } => MSG_DOCUMENT_GENERATED,
        }
    }
}

/// 文本异常检测处理器
pub struct EventHandler {
    settings: HandlerSettings,
    evaluator: ConfidenceEvaluator,
    payload_builder: ReportPayloadBuilder,
    request_builder: DocGenRequestBuilder,
    text_detector: Arc<dyn TextDetector>,
    function_invoker: Arc<dyn FunctionInvoker>,
}

impl EventHandler {
    pub fn new(settings: HandlerSettings, collaborators: Collaborators) -> Self {
        Self {
            evaluator: ConfidenceEvaluator::new(settings.confidence_threshold),
            payload_builder: ReportPayloadBuilder::new(settings.display_height.clone()),
            request_builder: DocGenRequestBuilder::new(
                settings.template_object.clone(),
                settings.font_object.clone(),
            ),
            text_detector: collaborators.text_detector,
            function_invoker: collaborators.function_invoker,
            settings,
        }
    }

    /// 按配置创建处理器及其依赖的 OCI 客户端
    pub fn from_config(config: &Config) -> Result<Self> {
        let collaborators = crate::oci::create_collaborators(config)?;
        Ok(Self::new(HandlerSettings::from(config), collaborators))
    }

    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    /// 处理一次原始事件请求体
    pub async fn handle(&self, body: &[u8]) -> Result<HandlerOutcome, HandlerError> {
        let started = Instant::now();
        info!(event = events::INVOCATION_START, bytes = body.len());

        let result = match Self::parse_event(body) {
            Ok(image) => self.handle_event(&image).await,
            Err(err) => Err(err),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => info!(
                event = events::INVOCATION_COMPLETE,
                elapsed_ms,
                message = outcome.message()
            ),
            Err(err) if err.is_classified() => warn!(
                event = events::INVOCATION_ERROR,
                kind = err.kind(),
                elapsed_ms,
                error = %err
            ),
            Err(err) => error!(
                event = events::INVOCATION_ERROR,
                kind = err.kind(),
                elapsed_ms,
                error = %err
            ),
        }
        result
    }

    /// 解析对象存储事件
    pub fn parse_event(body: &[u8]) -> Result<ImageLocation, HandlerError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            warn!(event = events::EVENT_MALFORMED, "No data provided");
            return Err(HandlerError::EmptyEvent);
        }

        let raw: Value = serde_json::from_slice(body).map_err(|e| {
            warn!(event = events::EVENT_MALFORMED, error = %e, "事件不是合法JSON");
            HandlerError::MalformedEvent(format!("invalid JSON: {}", e))
        })?;
        info!(event = events::EVENT_RECEIVED, payload = %raw);

        let parsed: ObjectStorageEvent = serde_json::from_value(raw).map_err(|e| {
            warn!(event = events::EVENT_MALFORMED, error = %e, "事件缺少必要字段");
            HandlerError::MalformedEvent(e.to_string())
        })?;

        let image = ImageLocation::from(parsed);
        for (field, value) in [
            ("data.resourceName", &image.object_name),
            ("data.additionalDetails.bucketName", &image.bucket),
            ("data.additionalDetails.namespace", &image.namespace),
        ] {
            if value.trim().is_empty() {
                warn!(event = events::EVENT_MALFORMED, field, "事件字段为空");
                return Err(HandlerError::MalformedEvent(format!("empty field `{}`", field)));
            }
        }

        info!("Processing Image: {}", image);
        Ok(image)
    }

    /// 对已定位的图片执行检测，必要时生成报告
    pub async fn handle_event(&self, image: &ImageLocation) -> Result<HandlerOutcome, HandlerError> {
        info!(
            event = events::DETECTION_START,
            namespace = %image.namespace,
            bucket = %image.bucket,
            object_name = %image.object_name
        );

        let detection = self
            .text_detector
            .detect_text(&self.settings.compartment_id, image)
            .await
            .map_err(|e| {
                error!(event = events::DETECTION_FAILED, error = %e);
                HandlerError::DetectionService(format!("{:#}", e))
            })?;
        debug!(event = events::DETECTION_COMPLETE, ?detection);

        if self.evaluator.all_clear(&detection) {
            info!(
                event = events::DETECTION_ALL_CLEAR,
                words = detection.words.len(),
                "All Words are clear in Image: {}. Processing Complete",
                image
            );
            return Ok(HandlerOutcome::AllClear {
                word_count: detection.words.len(),
            });
        }

        let anomaly_count = self.evaluator.unclear_words(&detection).len();
        info!(
            event = events::DETECTION_ANOMALY,
            anomalies = anomaly_count,
            threshold = self.evaluator.threshold(),
            "Anomalies found in Image: \"{}\". Generating PDF Document",
            image.object_name
        );

        let payload = self
            .payload_builder
            .build(&detection, &image.bucket, &image.namespace, &image.object_name)
            .map_err(|e| {
                warn!(event = events::DOCGEN_PAYLOAD_FAILED, error = %e);
                HandlerError::from(e)
            })?;

        let request = self.request_builder.build(payload, image);
        let body = serde_json::to_string(&request).map_err(HandlerError::internal)?;

        let response = self.invoke_document_generator(body).await?;
        Self::interpret_doc_gen_response(&response)?;

        Ok(HandlerOutcome::DocumentGenerated {
            output_object: output_object_name(&image.object_name),
            anomaly_count,
        })
    }

    async fn invoke_document_generator(&self, body: String) -> Result<InvokeResponse, HandlerError> {
        let function = self
            .function_invoker
            .get_function(&self.settings.function_id)
            .await
            .map_err(|e| {
                error!(event = events::DOCGEN_LOOKUP, error = %e, "查询文档生成函数失败");
                HandlerError::DocGenInvocation(format!("{:#}", e))
            })?;

        info!(
            event = events::DOCGEN_INVOKE,
            function_id = %function.id,
            read_timeout_secs = function.timeout_in_seconds,
            bytes = body.len()
        );

        let response = self
            .function_invoker
            .invoke_function(&function, body)
            .await
            .map_err(|e| {
                error!(event = events::DOCGEN_FAILED, error = %e, "文档生成函数调用失败");
                HandlerError::DocGenInvocation(format!("{:#}", e))
            })?;

        debug!(
            event = events::DOCGEN_RESPONSE,
            status_code = response.status_code,
            body = %truncate(&response.body, MAX_LOGGED_BODY)
        );
        Ok(response)
    }

    /// 传输层 200 与应用层 `code == 200` 同时满足才视为成功
    pub fn interpret_doc_gen_response(response: &InvokeResponse) -> Result<(), HandlerError> {
        if response.status_code != 200 {
            let err = HandlerError::DocGenInvocation(format!(
                "HTTP status {}: {}",
                response.status_code,
                truncate(&response.body, MAX_LOGGED_BODY)
            ));
            warn!(event = events::DOCGEN_FAILED, status_code = response.status_code, error = %err);
            return Err(err);
        }

        let decoded: DocGenResponse = serde_json::from_str(&response.body).map_err(|e| {
            warn!(event = events::DOCGEN_FAILED, error = %e, "文档生成响应无法解析");
            HandlerError::DocGenInvocation(format!("undecodable response body: {}", e))
        })?;

        if decoded.is_success() {
            info!(event = events::DOCGEN_SUCCESS, "{}", MSG_DOCUMENT_GENERATED);
            Ok(())
        } else {
            let err = HandlerError::DocGenApplication {
                code: decoded.code_display(),
            };
            warn!(event = events::DOCGEN_FAILED, error = %err);
            Err(err)
        }
    }
}

fn truncate(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DetectedWord, TextDetectionResult};
    use crate::oci::FunctionDetails;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedDetector {
        result: Option<TextDetectionResult>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextDetector for FixedDetector {
        async fn detect_text(
            &self,
            _compartment_id: &str,
            _image: &ImageLocation,
        ) -> anyhow::Result<TextDetectionResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .ok_or_else(|| anyhow::anyhow!("AI Vision returned 500: boom"))
        }
    }

    struct RecordingInvoker {
        response: Option<InvokeResponse>,
        bodies: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FunctionInvoker for RecordingInvoker {
        async fn get_function(&self, function_id: &str) -> anyhow::Result<FunctionDetails> {
            Ok(FunctionDetails {
                id: function_id.to_string(),
                display_name: None,
                invoke_endpoint: "http://invoke.local".to_string(),
                timeout_in_seconds: 120,
            })
        }

        async fn invoke_function(
            &self,
            _function: &FunctionDetails,
            body: String,
        ) -> anyhow::Result<InvokeResponse> {
            self.bodies.lock().unwrap().push(body);
            self.response
                .clone()
                .ok_or_else(|| anyhow::anyhow!("connection reset"))
        }
    }

    fn settings() -> HandlerSettings {
        HandlerSettings {
            compartment_id: "ocid1.compartment.oc1..aaa".to_string(),
            function_id: "ocid1.fnfunc.oc1..docgen".to_string(),
            confidence_threshold: 0.90,
            display_height: "450px".to_string(),
            template_object: "part2/TextAnomalyTemplate.docx".to_string(),
            font_object: Some("part2/Monoton.zip".to_string()),
        }
    }

    fn handler(
        detection: Option<TextDetectionResult>,
        response: Option<InvokeResponse>,
    ) -> (EventHandler, Arc<FixedDetector>, Arc<RecordingInvoker>) {
        let detector = Arc::new(FixedDetector {
            result: detection,
            calls: AtomicUsize::new(0),
        });
        let invoker = Arc::new(RecordingInvoker {
            response,
            bodies: Mutex::new(Vec::new()),
        });
        let handler = EventHandler::new(
            settings(),
            Collaborators {
                text_detector: detector.clone(),
                function_invoker: invoker.clone(),
            },
        );
        (handler, detector, invoker)
    }

    fn event_body(object_name: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "eventType": "com.oraclecloud.objectstorage.createobject",
            "data": {
                "resourceName": object_name,
                "additionalDetails": {"bucketName": "images", "namespace": "ns"}
            }
        }))
        .unwrap()
    }

    fn low_confidence_word() -> TextDetectionResult {
        TextDetectionResult {
            words: vec![DetectedWord::new(
                "foo",
                0.5,
                &[(0.1, 0.1), (0.2, 0.1), (0.2, 0.2), (0.1, 0.2)],
            )],
        }
    }

    fn invoke_response(status_code: u16, body: &str) -> Option<InvokeResponse> {
        Some(InvokeResponse {
            status_code,
            body: body.to_string(),
        })
    }

    #[tokio::test]
    async fn test_all_clear_skips_document_generation() {
        let detection = TextDetectionResult {
            words: vec![DetectedWord::new("bar", 0.95, &[])],
        };
        let (handler, detector, invoker) = handler(Some(detection), None);

        let outcome = handler.handle(&event_body("x.png")).await.unwrap();
        assert_eq!(outcome, HandlerOutcome::AllClear { word_count: 1 });
        assert_eq!(outcome.message(), "All Words are clear in Image");
        assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
        assert!(invoker.bodies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_anomaly_generates_document() {
        let (handler, _, invoker) =
            handler(Some(low_confidence_word()), invoke_response(200, r#"{"code":200}"#));

        let outcome = handler.handle(&event_body("receipt.png")).await.unwrap();
        assert_eq!(
            outcome,
            HandlerOutcome::DocumentGenerated {
                output_object: "receipt.png.pdf".to_string(),
                anomaly_count: 1
            }
        );
        assert_eq!(outcome.message(), "Document generated successfully");

        let bodies = invoker.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        let sent: Value = serde_json::from_str(&bodies[0]).unwrap();
        let word = &sent["data"]["content"]["words"][0];
        assert_eq!(word["word"], "foo");
        assert_eq!(word["confidence"], 50.0);
        assert_eq!(word["corner1"], serde_json::json!({"x": 0.1, "y": 0.1}));
        assert_eq!(word["corner3"], serde_json::json!({"x": 0.2, "y": 0.2}));
        assert_eq!(
            sent["data"]["content"]["image_with_anomalies"]["mediaType"],
            "image/png"
        );
        assert_eq!(sent["output"]["objectName"], "receipt.png.pdf");
        assert_eq!(sent["template"]["objectName"], "part2/TextAnomalyTemplate.docx");
    }

    #[tokio::test]
    async fn test_application_failure_code() {
        let (handler, _, _) =
            handler(Some(low_confidence_word()), invoke_response(200, r#"{"code":500}"#));

        let err = handler.handle(&event_body("receipt.png")).await.unwrap_err();
        assert!(err
            .response_message()
            .contains("Document generation failure: '500'"));
        assert_eq!(err.kind(), "docgen_application");
    }

    #[tokio::test]
    async fn test_transport_failure_status() {
        let (handler, _, _) =
            handler(Some(low_confidence_word()), invoke_response(502, "bad gateway"));

        let err = handler.handle(&event_body("a.jpg")).await.unwrap_err();
        assert!(matches!(err, HandlerError::DocGenInvocation(_)));
        assert!(err.response_message().contains("HTTP status 502"));
    }

    #[tokio::test]
    async fn test_invoke_error_is_classified() {
        let (handler, _, invoker) = handler(Some(low_confidence_word()), None);

        let err = handler.handle(&event_body("a.jpg")).await.unwrap_err();
        assert!(matches!(err, HandlerError::DocGenInvocation(_)));
        assert!(err.response_message().contains("connection reset"));
        // 不重试
        assert_eq!(invoker.bodies.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_detection_failure() {
        let (handler, _, invoker) = handler(None, None);

        let err = handler.handle(&event_body("a.jpg")).await.unwrap_err();
        assert!(matches!(err, HandlerError::DetectionService(_)));
        assert!(err.response_message().contains("boom"));
        assert!(invoker.bodies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_detection_data() {
        let detection = TextDetectionResult {
            words: vec![DetectedWord::new("foo", 0.2, &[(0.1, 0.1)])],
        };
        let (handler, _, invoker) = handler(Some(detection), invoke_response(200, r#"{"code":200}"#));

        let err = handler.handle(&event_body("a.jpg")).await.unwrap_err();
        assert!(matches!(err, HandlerError::MalformedDetectionData(_)));
        assert!(invoker.bodies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_event_field() {
        let (handler, detector, _) = handler(Some(TextDetectionResult::default()), None);
        let body = br#"{"data":{"resourceName":"a.png","additionalDetails":{"bucketName":"images"}}}"#;

        let err = handler.handle(body).await.unwrap_err();
        assert!(matches!(err, HandlerError::MalformedEvent(_)));
        assert!(err.response_message().contains("namespace"));
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_parse_event_edge_cases() {
        assert!(matches!(
            EventHandler::parse_event(b"  \n"),
            Err(HandlerError::EmptyEvent)
        ));
        assert!(matches!(
            EventHandler::parse_event(b"not json"),
            Err(HandlerError::MalformedEvent(_))
        ));
        assert!(matches!(
            EventHandler::parse_event(
                br#"{"data":{"resourceName":"","additionalDetails":{"bucketName":"b","namespace":"n"}}}"#
            ),
            Err(HandlerError::MalformedEvent(_))
        ));

        let image = EventHandler::parse_event(&event_body("dir/x.jpg")).unwrap();
        assert_eq!(
            image,
            ImageLocation {
                namespace: "ns".to_string(),
                bucket: "images".to_string(),
                object_name: "dir/x.jpg".to_string(),
            }
        );
    }

    #[test]
    fn test_interpret_undecodable_body() {
        let err = EventHandler::interpret_doc_gen_response(&InvokeResponse {
            status_code: 200,
            body: "<html>".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, HandlerError::DocGenInvocation(_)));
    }

    #[test]
    fn test_interpret_missing_code() {
        let err = EventHandler::interpret_doc_gen_response(&InvokeResponse {
            status_code: 200,
            body: r#"{"message":"template not found"}"#.to_string(),
        })
        .unwrap_err();
        assert_eq!(
            err.response_message(),
            "Document generation failure: 'None'. See Application Log"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate("日志内容", 2), "日志");
        assert_eq!(truncate("short", 10), "short");
    }
}
