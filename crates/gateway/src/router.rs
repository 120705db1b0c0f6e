//! # リクエストルーター
//!
//! `(method, path)` を3つの操作のいずれか、またはNotFoundに分類し、
//! 対応するハンドラにディスパッチする。
//! ハンドラのエラーはここで一律にレスポンスへ変換され、呼び出し元に漏れることはない。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::GatewayState;
use crate::endpoints;
use crate::error::GatewayError;

/// リクエストの分類結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// GET /
    List,
    /// POST /get-upload-url
    IssueUploadUrl,
    /// POST /get-download-url
    IssueDownloadUrl,
    /// 上記以外（既知のパスに対するメソッド違いも含む）
    NotFound,
}

impl Route {
    /// パスは完全一致で比較する。
    pub fn classify(method: &Method, path: &str) -> Self {
        match path {
            "/" if method == Method::GET => Route::List,
            "/get-upload-url" if method == Method::POST => Route::IssueUploadUrl,
            "/get-download-url" if method == Method::POST => Route::IssueDownloadUrl,
            _ => Route::NotFound,
        }
    }
}

/// 1リクエストを処理してレスポンスを返す。
///
/// 不正なボディは空オブジェクトとして検証されるため400になり、
/// ストレージの失敗は500に変換される。
pub async fn dispatch(state: &GatewayState, method: &Method, path: &str, body: &[u8]) -> Response {
    let route = Route::classify(method, path);
    tracing::info!(%method, path, ?route, body_len = body.len(), "リクエスト受信");

    match route {
        Route::List => endpoints::handle_list(state).await.into_response(),
        Route::IssueUploadUrl => endpoints::handle_upload_url(state, body)
            .await
            .into_response(),
        Route::IssueDownloadUrl => endpoints::handle_download_url(state, body)
            .await
            .into_response(),
        Route::NotFound => GatewayError::NotFound.into_response(),
    }
}

/// 全リクエストを受けるaxumハンドラ。ルーティングは `dispatch` が担う。
///
/// 読み取れないボディ（上限超過など）は空ボディとして扱い、
/// axumの既定のプレーンテキスト応答ではなく検証エラーのJSONを返す。
async fn handle_request(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(path = uri.path(), error = %rejection, "リクエストボディを読み取れません");
            Bytes::new()
        }
    };
    dispatch(&state, &method, uri.path(), &body).await
}

/// axumルーターを構築する。
///
/// ブラウザが別オリジンのページから呼び出せるよう、CORSは全オリジンを許可する。
pub fn build_router(state: Arc<GatewayState>) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    axum::Router::new()
        .fallback(handle_request)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
