use std::sync::Arc;
use std::time::Instant;

pub mod api;
pub mod build_info;
pub mod handler;
pub mod model;
pub mod oci;
pub mod server;
pub mod util;

use handler::EventHandler;

/// 应用状态结构
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<EventHandler>,
    /// 进程启动时间，用于健康检查中的运行时长
    pub started_at: Instant,
}

impl AppState {
    pub fn new(handler: EventHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            started_at: Instant::now(),
        }
    }
}
