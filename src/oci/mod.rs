// OCI 服务访问层：AI Vision 文本检测与 Functions 调用

pub mod factory;
pub mod functions;
pub mod traits;
pub mod vision;

pub use factory::{create_collaborators, Collaborators};
pub use functions::{FunctionsClientConfig, OciFunctionsClient};
pub use traits::{FunctionDetails, FunctionInvoker, TextDetector};
pub use vision::{OciVisionClient, VisionClientConfig};

use reqwest::RequestBuilder;

/// 附加透传的 Authorization 头；请求签名由运行环境（代理/sidecar）负责
pub(crate) fn with_authorization(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token.filter(|t| !t.is_empty()) {
        Some(token) => request.header(reqwest::header::AUTHORIZATION, token),
        None => request,
    }
}
