//! # オブジェクトストレージ
//!
//! Gatewayが依存するストレージバックエンドの抽象インターフェースと、
//! その署名プリミティブを包むURL署名処理。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

pub mod s3;

pub use s3::S3ObjectStorage;

use filegate_types::ObjectSummary;

use crate::error::GatewayError;

/// 署名付きURLで許可する操作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOperation {
    /// 読み取り（GET）
    Read,
    /// 書き込み（PUT）。Content-Typeは署名対象に含まれ、
    /// クライアントは同じ値を送信する必要がある。
    Write { content_type: String },
}

/// URL署名の結果。サーバー側には何の状態も残らない。
/// 有効期限の強制はストレージ側が行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_in: u32,
}

/// オブジェクトストレージの抽象インターフェース。
///
/// 運用者はAWS S3, MinIO, Cloudflare R2等のS3互換ストレージや
/// その他のバックエンドを実装として選択できる。
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// バケット内の全オブジェクトを列挙する。
    async fn list_objects(&self) -> Result<Vec<ObjectSummary>, GatewayError>;

    /// `key` に対する `operation` を `expiry_secs` 秒間許可する署名付きURLを生成する。
    ///
    /// 同一入力でも呼び出しごとに異なるURLが返り得るが、いずれも期限まで有効。
    async fn presign(
        &self,
        operation: &SignOperation,
        key: &str,
        expiry_secs: u32,
    ) -> Result<String, GatewayError>;
}

/// ストレージの署名プリミティブで署名付きURLを発行する。
///
/// オブジェクトの存在確認は行わない。失敗はリトライせずそのまま返す。
pub async fn sign(
    storage: &dyn ObjectStorage,
    operation: SignOperation,
    key: &str,
    expiry_secs: u32,
) -> Result<SignedUrl, GatewayError> {
    let url = storage.presign(&operation, key, expiry_secs).await?;
    tracing::debug!(key, ?operation, expiry_secs, "署名付きURLを発行しました");
    Ok(SignedUrl {
        url,
        expires_in: expiry_secs,
    })
}
