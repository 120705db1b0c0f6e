//! # POST /get-upload-url
//!
//! ストレージへのアップロード用署名付きURL発行。

use axum::Json;
use filegate_types::{UploadUrlRequest, UploadUrlResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::{self, SignOperation, SignedUrl};
use crate::validation::parse_upload_request;

/// 書き込み用の署名付きURLを発行する。
///
/// 同名キーの存在確認は行わない。上書きの可否はストレージに委ねる。
pub async fn issue_upload_url(
    state: &GatewayState,
    request: &UploadUrlRequest,
) -> Result<SignedUrl, GatewayError> {
    storage::sign(
        state.storage.as_ref(),
        SignOperation::Write {
            content_type: request.content_type.clone(),
        },
        &request.file_name,
        state.upload_expiry_secs,
    )
    .await
}

/// POST /get-upload-url — 署名付きアップロードURL発行。
///
/// `fileName` と `contentType` のいずれかが欠けている場合は署名せずに400を返す。
pub async fn handle_upload_url(
    state: &GatewayState,
    body: &[u8],
) -> Result<Json<UploadUrlResponse>, GatewayError> {
    let request = parse_upload_request(body)?;
    let signed = issue_upload_url(state, &request).await?;

    tracing::info!(
        file_name = %request.file_name,
        content_type = %request.content_type,
        expires_in = signed.expires_in,
        "アップロードURLを発行しました"
    );

    Ok(Json(UploadUrlResponse {
        upload_url: signed.url,
        expires_in: signed.expires_in,
    }))
}
