//! # Filegate Gateway
//!
//! 単一バケットに対する一覧・アップロード・ダウンロードを、
//! ファイル本体を経由させずに仲介するステートレスなHTTPフロントエンド。
//!
//! ## 役割
//! - バケット内オブジェクトの一覧ページ提供
//! - 有効期限付き署名付きURLの発行（書き込み・読み取り）
//! - 必須フィールドの検証
//!
//! ## API エンドポイント
//! - `GET /` — 一覧ページ
//! - `POST /get-upload-url` — 署名付きアップロードURL発行
//! - `POST /get-download-url` — 署名付きダウンロードURL発行

mod config;
mod endpoints;
mod error;
mod router;
mod storage;
mod validation;
mod view;

use std::sync::Arc;

use tokio::signal;

use crate::config::{GatewayConfig, GatewayState};
use crate::storage::S3ObjectStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        bucket = %config.bucket_name,
        region = %config.region,
        endpoint = config.endpoint.as_deref().unwrap_or("aws"),
        upload_expiry_secs = config.upload_expiry_secs,
        download_expiry_secs = config.download_expiry_secs,
        "設定を読み込みました"
    );

    let storage = S3ObjectStorage::from_config(&config)?;
    let state = Arc::new(GatewayState::new(&config, Box::new(storage)));
    let app = router::build_router(state);

    tracing::info!("Gatewayを {} で起動します", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gatewayを停止しました");
    Ok(())
}

/// Ctrl-C または SIGTERM を待つ。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Ctrl-Cハンドラの登録に失敗: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERMハンドラの登録に失敗: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("シャットダウンシグナルを受信しました");
}
