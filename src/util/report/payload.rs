use thiserror::Error;

use crate::model::docgen::SOURCE_OBJECT_STORAGE;
use crate::model::{Corner, ImageReference, ReportPayload, ReportWord, TextDetectionResult};

pub const DEFAULT_DISPLAY_HEIGHT: &str = "450px";

const MEDIA_TYPE_PNG: &str = "image/png";
const MEDIA_TYPE_JPEG: &str = "image/jpeg";

/// 构建载荷时发现的检测数据问题
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadError {
    #[error("word #{word_index} has {vertex_count} bounding polygon vertices, at least 3 required")]
    MalformedDetectionData {
        word_index: usize,
        vertex_count: usize,
    },
}

/// 报告载荷构建器
#[derive(Debug, Clone)]
pub struct ReportPayloadBuilder {
    display_height: String,
}

impl Default for ReportPayloadBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_HEIGHT)
    }
}

impl ReportPayloadBuilder {
    pub fn new(display_height: impl Into<String>) -> Self {
        Self {
            display_height: display_height.into(),
        }
    }

    /// 将文本检测结果转换为文档生成所需的数据
    pub fn build(
        &self,
        result: &TextDetectionResult,
        bucket: &str,
        namespace: &str,
        object_name: &str,
    ) -> Result<ReportPayload, PayloadError> {
        let words = result
            .words
            .iter()
            .enumerate()
            .map(|(word_index, word)| {
                // corner1 = 左上，corner3 = 右下
                let (Some(first), Some(third)) = (word.vertex(0), word.vertex(2)) else {
                    return Err(PayloadError::MalformedDetectionData {
                        word_index,
                        vertex_count: word.vertex_count(),
                    });
                };

                Ok(ReportWord {
                    word: word.text.clone(),
                    confidence_percent: round_to(word.confidence * 100.0, 1),
                    corner1: Corner {
                        x: round_to(first.x, 2),
                        y: round_to(first.y, 2),
                    },
                    corner3: Corner {
                        x: round_to(third.x, 2),
                        y: round_to(third.y, 2),
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReportPayload {
            image_reference: ImageReference {
                source: SOURCE_OBJECT_STORAGE.to_string(),
                bucket: bucket.to_string(),
                namespace: namespace.to_string(),
                object_name: object_name.to_string(),
                media_type: media_type_for(object_name).to_string(),
                display_height: self.display_height.clone(),
            },
            words,
        })
    }
}

/// 只识别 png，其余一律按 jpeg 处理
pub fn media_type_for(object_name: &str) -> &'static str {
    if object_name.ends_with("png") {
        MEDIA_TYPE_PNG
    } else {
        MEDIA_TYPE_JPEG
    }
}

/// 按小数位四舍六入五成双，`0.125` 保留两位得到 `0.12`
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DetectedWord;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<(f64, f64)> {
        vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
    }

    #[test]
    fn test_media_type() {
        assert_eq!(media_type_for("x.png"), "image/png");
        assert_eq!(media_type_for("x.jpg"), "image/jpeg");
        assert_eq!(media_type_for("x.jpeg"), "image/jpeg");
        // 仅按字面后缀判断
        assert_eq!(media_type_for("scan_png"), "image/png");
        assert_eq!(media_type_for("x.PNG"), "image/jpeg");
    }

    #[test]
    fn test_build_single_word() {
        let result = TextDetectionResult {
            words: vec![DetectedWord::new("foo", 0.5, &square(0.1, 0.1, 0.2, 0.2))],
        };

        let payload = ReportPayloadBuilder::default()
            .build(&result, "images", "ns", "receipt.png")
            .unwrap();

        assert_eq!(payload.image_reference.media_type, "image/png");
        assert_eq!(payload.image_reference.display_height, "450px");
        assert_eq!(payload.image_reference.source, "OBJECT_STORAGE");
        assert_eq!(payload.words.len(), 1);

        let word = &payload.words[0];
        assert_eq!(word.word, "foo");
        assert_eq!(word.confidence_percent, 50.0);
        assert_eq!(word.corner1, Corner { x: 0.1, y: 0.1 });
        assert_eq!(word.corner3, Corner { x: 0.2, y: 0.2 });
    }

    #[test]
    fn test_confidence_and_corner_rounding() {
        let result = TextDetectionResult {
            words: vec![
                DetectedWord::new("a", 0.87654, &square(0.123, 0.456, 0.789, 0.999)),
                DetectedWord::new("b", 0.3, &square(0.0, 0.0, 1.0, 1.0)),
            ],
        };

        let payload = ReportPayloadBuilder::default()
            .build(&result, "b", "n", "o.jpg")
            .unwrap();

        for (built, source) in payload.words.iter().zip(result.words.iter()) {
            assert_eq!(
                built.confidence_percent,
                round_to(source.confidence * 100.0, 1)
            );
        }
        assert_eq!(payload.words[0].confidence_percent, 87.7);
        assert_eq!(payload.words[0].corner1, Corner { x: 0.12, y: 0.46 });
        assert_eq!(payload.words[0].corner3, Corner { x: 0.79, y: 1.0 });
        assert_eq!(payload.words[1].confidence_percent, 30.0);
    }

    #[test]
    fn test_ties_round_to_even() {
        let result = TextDetectionResult {
            words: vec![DetectedWord::new(
                "t",
                0.1225,
                &[(0.125, 0.625), (0.5, 0.5), (0.875, 0.125), (0.0, 0.0)],
            )],
        };

        let payload = ReportPayloadBuilder::default()
            .build(&result, "b", "n", "o.png")
            .unwrap();
        let word = &payload.words[0];
        assert_eq!(word.corner1, Corner { x: 0.12, y: 0.62 });
        assert_eq!(word.corner3, Corner { x: 0.88, y: 0.12 });
        assert_eq!(word.confidence_percent, 12.2);

        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-0.125, 2), -0.12);
    }

    #[test]
    fn test_missing_coordinates_default_to_zero() {
        let result: TextDetectionResult = serde_json::from_str(
            r#"{"words":[{"text":"z","confidence":0.1,"boundingPolygon":{"normalizedVertices":[{"y":0.3},{},{"x":0.4}]}}]}"#,
        )
        .unwrap();

        let payload = ReportPayloadBuilder::default()
            .build(&result, "b", "n", "o.png")
            .unwrap();
        assert_eq!(payload.words[0].corner1, Corner { x: 0.0, y: 0.3 });
        assert_eq!(payload.words[0].corner3, Corner { x: 0.4, y: 0.0 });
    }

    #[test]
    fn test_too_few_vertices() {
        let result = TextDetectionResult {
            words: vec![
                DetectedWord::new("ok", 0.5, &square(0.1, 0.1, 0.2, 0.2)),
                DetectedWord::new("bad", 0.5, &[(0.1, 0.1), (0.2, 0.1)]),
            ],
        };

        let err = ReportPayloadBuilder::default()
            .build(&result, "b", "n", "o.png")
            .unwrap_err();
        assert_eq!(
            err,
            PayloadError::MalformedDetectionData {
                word_index: 1,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn test_payload_json_round_trip() {
        let result = TextDetectionResult {
            words: vec![DetectedWord::new("foo", 0.42, &square(0.1, 0.2, 0.3, 0.4))],
        };
        let payload = ReportPayloadBuilder::new("300px")
            .build(&result, "images", "ns", "a.jpg")
            .unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["image_with_anomalies"]["bucketName"], "images");
        assert_eq!(json["image_with_anomalies"]["height"], "300px");
        assert_eq!(json["words"][0]["confidence"], 42.0);
        assert_eq!(json["words"][0]["corner3"]["y"], 0.4);

        let parsed: ReportPayload = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, payload);
    }
}
