use serde::{Deserialize, Serialize};

/// 文本检测结果（AI Vision `imageText` 节点）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextDetectionResult {
    #[serde(default)]
    pub words: Vec<DetectedWord>,
}

/// 识别出的单词
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedWord {
    #[serde(default)]
    pub text: String,
    /// 置信度 [0,1]，缺失时按 0 处理
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub bounding_polygon: BoundingPolygon,
}

/// 归一化外接多边形，顶点顺序：左上、右上、右下、左下
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingPolygon {
    #[serde(default)]
    pub normalized_vertices: Vec<NormalizedVertex>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedVertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl NormalizedVertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl DetectedWord {
    pub fn new(text: impl Into<String>, confidence: f64, vertices: &[(f64, f64)]) -> Self {
        Self {
            text: text.into(),
            confidence,
            bounding_polygon: BoundingPolygon {
                normalized_vertices: vertices
                    .iter()
                    .map(|&(x, y)| NormalizedVertex::new(x, y))
                    .collect(),
            },
        }
    }

    /// 按下标取顶点（0 起）
    pub fn vertex(&self, index: usize) -> Option<NormalizedVertex> {
        self.bounding_polygon.normalized_vertices.get(index).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.bounding_polygon.normalized_vertices.len()
    }
}

/// AI Vision analyzeImage 响应体（只取文本检测部分）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeImageResult {
    #[serde(rename = "imageText", default)]
    pub image_text: Option<TextDetectionResult>,
}

impl AnalyzeImageResult {
    pub fn into_detection(self) -> TextDetectionResult {
        self.image_text.unwrap_or_default()
    }
}
