//! 报告数据模块
//!
//! 这个模块负责把文本检测结果整理成文档生成函数能消费的请求，包括：
//! - 报告载荷构建 (payload.rs)
//! - 文档生成请求封装 (envelope.rs)
//!
//! 使用示例：
//! ```rust,ignore
//! use crate::util::report::{DocGenRequestBuilder, ReportPayloadBuilder};
//!
//! let payload = ReportPayloadBuilder::default().build(&result, bucket, namespace, object_name)?;
//! let request = DocGenRequestBuilder::new(template, font).build(payload, &image);
//! ```

pub mod envelope;
pub mod payload;

pub use envelope::{output_object_name, DocGenRequestBuilder};
pub use payload::{media_type_for, round_to, PayloadError, ReportPayloadBuilder};
