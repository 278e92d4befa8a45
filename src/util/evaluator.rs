//! 置信度评估
//!
//! 判断一张图片里识别出的所有单词是否都足够清晰

use crate::model::{DetectedWord, TextDetectionResult};

/// 默认置信度阈值
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.90;

/// 置信度评估器
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceEvaluator {
    threshold: f64,
}

impl Default for ConfidenceEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl ConfidenceEvaluator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 所有单词置信度均 >= 阈值时返回 true，没有单词时同样为 true
    pub fn all_clear(&self, result: &TextDetectionResult) -> bool {
        result
            .words
            .iter()
            .all(|word| word.confidence >= self.threshold)
    }

    /// 低于阈值的单词
    pub fn unclear_words<'a>(&self, result: &'a TextDetectionResult) -> Vec<&'a DetectedWord> {
        result
            .words
            .iter()
            .filter(|word| word.confidence < self.threshold)
            .collect()
    }
}
