//! HTTP服务器设置模块
//! 负责监听地址绑定、路由挂载和优雅关闭

use crate::api::routes;
use crate::util::config::Config;
use crate::AppState;
use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::info;

/// HTTP服务器管理器
pub struct ServerManager;

impl ServerManager {
    /// 创建HTTP服务器
    pub async fn create_server(config: &Config, app_state: AppState) -> Result<HttpServer> {
        let listener = Self::bind_listener(&config.bind_address()).await?;
        let local_addr = listener.local_addr()?;
        let app_routes = routes(app_state);

        info!(
            target: "server.http",
            event = "http.server.ready",
            address = %local_addr
        );

        Ok(HttpServer {
            listener,
            app_routes,
            local_addr,
        })
    }

    async fn bind_listener(address: &str) -> Result<TcpListener> {
        info!(
            target: "server.http",
            event = "http.server.bind_start",
            address
        );
        TcpListener::bind(address)
            .await
            .with_context(|| format!("监听地址 {} 绑定失败", address))
    }

    /// 启动服务器，收到退出信号后完成在途请求再返回
    pub async fn start_server(server: HttpServer) -> Result<()> {
        info!(
            target: "server.http",
            event = "http.server.start",
            address = %server.local_addr
        );

        axum::serve(server.listener, server.app_routes)
            .with_graceful_shutdown(Self::shutdown_signal())
            .await?;

        info!(
            target: "server.http",
            event = "http.server.stopped"
        );
        Ok(())
    }

    async fn shutdown_signal() {
        tokio::select! {
            _ = ctrl_c() => {
                info!(
                    target: "server.http",
                    event = "http.server.signal",
                    signal = "SIGINT"
                );
            }
            _ = Self::wait_for_sigterm() => {
                info!(
                    target: "server.http",
                    event = "http.server.signal",
                    signal = "SIGTERM"
                );
            }
        }
    }

    /// 等待 SIGTERM 信号
    async fn wait_for_sigterm() -> Result<(), Box<dyn std::error::Error>> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut term_signal = signal(SignalKind::terminate())?;
            term_signal.recv().await;
            Ok(())
        }
        #[cfg(not(unix))]
        {
            std::future::pending::<()>().await;
            Ok(())
        }
    }
}

/// HTTP服务器实例
pub struct HttpServer {
    listener: TcpListener,
    app_routes: Router,
    local_addr: SocketAddr,
}
