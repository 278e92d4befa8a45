use crate::model::docgen::{
    DocGenRequest, InlineData, ObjectStorageLocation, OutputLocation, CONTENT_TYPE_DOCX,
    CONTENT_TYPE_PDF, CONTENT_TYPE_ZIP, REQUEST_TYPE_SINGLE, SOURCE_INLINE,
    SOURCE_OBJECT_STORAGE, TAG_SYNTAX_DOCGEN_1_0,
};
use crate::model::{ImageLocation, ReportPayload};

/// 文档生成请求构建器
///
/// 模板、字体与输出 PDF 都放在图片所在的同一个 bucket 中
#[derive(Debug, Clone)]
pub struct DocGenRequestBuilder {
    template_object: String,
    font_object: Option<String>,
}

impl DocGenRequestBuilder {
    pub fn new(template_object: impl Into<String>, font_object: Option<String>) -> Self {
        Self {
            template_object: template_object.into(),
            font_object: font_object.filter(|name| !name.trim().is_empty()),
        }
    }

    pub fn build(&self, content: ReportPayload, image: &ImageLocation) -> DocGenRequest {
        let object_storage = |object_name: &str, content_type: &str| ObjectStorageLocation {
            source: SOURCE_OBJECT_STORAGE.to_string(),
            namespace: image.namespace.clone(),
            bucket_name: image.bucket.clone(),
            object_name: object_name.to_string(),
            content_type: content_type.to_string(),
        };

        DocGenRequest {
            request_type: REQUEST_TYPE_SINGLE.to_string(),
            tag_syntax: TAG_SYNTAX_DOCGEN_1_0.to_string(),
            data: InlineData {
                source: SOURCE_INLINE.to_string(),
                content,
            },
            template: object_storage(&self.template_object, CONTENT_TYPE_DOCX),
            fonts: self
                .font_object
                .as_deref()
                .map(|font| object_storage(font, CONTENT_TYPE_ZIP)),
            output: OutputLocation {
                target: SOURCE_OBJECT_STORAGE.to_string(),
                namespace: image.namespace.clone(),
                bucket_name: image.bucket.clone(),
                object_name: output_object_name(&image.object_name),
                content_type: CONTENT_TYPE_PDF.to_string(),
            },
        }
    }
}

/// 报告 PDF 与图片同名，追加 `.pdf`
pub fn output_object_name(image_name: &str) -> String {
    format!("{}.pdf", image_name)
}
