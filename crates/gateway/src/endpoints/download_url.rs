//! # POST /get-download-url
//!
//! ストレージからのダウンロード用署名付きURL発行。

use axum::Json;
use filegate_types::{DownloadUrlRequest, DownloadUrlResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::{self, SignOperation, SignedUrl};
use crate::validation::parse_download_request;

/// 読み取り用の署名付きURLを発行する。
///
/// オブジェクトの存在確認は行わない。存在しないキーのURLは
/// クライアントが使用した時点でストレージ側のエラーになる。
pub async fn issue_download_url(
    state: &GatewayState,
    request: &DownloadUrlRequest,
) -> Result<SignedUrl, GatewayError> {
    storage::sign(
        state.storage.as_ref(),
        SignOperation::Read,
        &request.file_key,
        state.download_expiry_secs,
    )
    .await
}

/// POST /get-download-url — 署名付きダウンロードURL発行。
pub async fn handle_download_url(
    state: &GatewayState,
    body: &[u8],
) -> Result<Json<DownloadUrlResponse>, GatewayError> {
    let request = parse_download_request(body)?;
    let signed = issue_download_url(state, &request).await?;

    tracing::info!(
        file_key = %request.file_key,
        expires_in = signed.expires_in,
        "ダウンロードURLを発行しました"
    );

    Ok(Json(DownloadUrlResponse {
        download_url: signed.url,
        expires_in: signed.expires_in,
    }))
}
