//! # Gatewayエンドポイント
//!
//! 各ハンドラはHTTPフレーミングから独立しており、
//! 状態と生ボディを受け取って `Result<_, GatewayError>` を返す。

pub mod download_url;
pub mod list;
pub mod upload_url;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use download_url::handle_download_url;
pub use list::handle_list;
pub use upload_url::handle_upload_url;
