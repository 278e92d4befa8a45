use serde::{Deserialize, Serialize};

/// 文档生成数据载荷，字段名与报告模板中的标签一一对应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(rename = "image_with_anomalies")]
    pub image_reference: ImageReference,
    pub words: Vec<ReportWord>,
}

/// 模板中内嵌的原图引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReference {
    pub source: String,
    #[serde(rename = "bucketName")]
    pub bucket: String,
    pub namespace: String,
    #[serde(rename = "objectName")]
    pub object_name: String,
    #[serde(rename = "mediaType")]
    pub media_type: String,
    #[serde(rename = "height")]
    pub display_height: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportWord {
    pub word: String,
    /// 百分制置信度，保留一位小数
    #[serde(rename = "confidence")]
    pub confidence_percent: f64,
    pub corner1: Corner,
    pub corner3: Corner,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub x: f64,
    pub y: f64,
}
