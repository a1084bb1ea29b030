// src/server/mod.rs

mod handlers;
mod input;

pub use input::LinkInput;

use crate::{AppContext, error::*};
use axum::{
    Router,
    routing::{get, post},
};
use log::info;
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};

pub fn router(context: AppContext) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/services", get(handlers::services))
        .route("/api/resolve", post(handlers::resolve))
        .route("/api/download", post(handlers::download))
        .with_state(context)
}

/// 绑定端口
pub async fn bind(addr: SocketAddr) -> AppResult<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("无法绑定监听地址 {}: {}", addr, e)))
}

/// 在已绑定的监听器上运行服务，收到 Ctrl+C / SIGTERM 后优雅退出
pub async fn serve(listener: TcpListener, context: AppContext) -> AppResult<()> {
    let addr = listener.local_addr()?;
    info!("服务已启动: http://{}", addr);

    axum::serve(listener, router(context))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("无法监听 Ctrl+C 信号: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("无法监听 SIGTERM 信号: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("收到 Ctrl+C，正在关闭服务..."),
        _ = terminate => info!("收到 SIGTERM，正在关闭服务..."),
    }
}
