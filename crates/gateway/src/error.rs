//! # Gateway エラー型
//!
//! ディスパッチ境界で一律にHTTPレスポンスへ変換される。
//! ボディは常にJSON（`{error, message?}` または `{message}`）。

use axum::http::StatusCode;
use axum::Json;
use filegate_types::{ErrorBody, NotFoundBody};

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 必須フィールドの欠落等。ストレージには到達しない
    #[error("不正なリクエスト: {0}")]
    Validation(String),
    /// ストレージ操作（一覧取得・URL署名）に失敗
    #[error("ストレージ操作に失敗: {0}")]
    Storage(String),
    /// 該当するルートが存在しない
    #[error("ルートが見つかりません")]
    NotFound,
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Storage(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        match self {
            GatewayError::Validation(error) => {
                tracing::warn!(%error, "リクエストを拒否しました");
                (status, Json(ErrorBody { error, message: None })).into_response()
            }
            GatewayError::NotFound => {
                tracing::debug!("ルートが見つかりません");
                (
                    status,
                    Json(NotFoundBody {
                        message: "Not Found".to_string(),
                    }),
                )
                    .into_response()
            }
            GatewayError::Storage(message) | GatewayError::Internal(message) => {
                tracing::error!(%message, "リクエスト処理中にエラーが発生しました");
                (
                    status,
                    Json(ErrorBody {
                        error: "Internal Server Error".to_string(),
                        message: Some(message),
                    }),
                )
                    .into_response()
            }
        }
    }
}
