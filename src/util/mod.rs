pub mod config;
pub mod evaluator;
pub mod http_client; // [global] HTTP客户端模块（支持依赖注入）
pub mod log;
pub mod logging;
pub mod report;
