//! # S3互換オブジェクトストレージ実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用する実装。
//! 署名付きURLの生成はローカルで完結し、ストレージへの通信は一覧取得のみ。

use filegate_types::ObjectSummary;
use http02::header::CONTENT_TYPE;
use http02::{HeaderMap, HeaderValue};

use super::{ObjectStorage, SignOperation};
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// S3互換ストレージによるObjectStorage実装。
pub struct S3ObjectStorage {
    /// 内部通信用バケット（一覧取得）
    bucket_internal: s3::Bucket,
    /// クライアント向けバケット（署名付きURL生成用）。
    /// 内部ホスト名と外部ホスト名が異なる場合に使用。
    /// Noneの場合はbucket_internalを使用する。
    bucket_public: Option<s3::Bucket>,
}

impl S3ObjectStorage {
    pub fn new(bucket_internal: s3::Bucket, bucket_public: Option<s3::Bucket>) -> Self {
        Self {
            bucket_internal,
            bucket_public,
        }
    }

    /// S3互換バケットを初期化する。
    ///
    /// 静的キーが未指定の場合、認証情報の解決は環境変数・プロファイル・
    /// インスタンスメタデータの順でrust-s3に委ねる。
    fn init_bucket(config: &GatewayConfig, endpoint: &str) -> anyhow::Result<s3::Bucket> {
        let region = s3::Region::Custom {
            region: config.region.clone(),
            endpoint: endpoint.to_string(),
        };

        let credentials = s3::creds::Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )?;

        let bucket = s3::Bucket::new(&config.bucket_name, region, credentials)?;
        let bucket = if config.path_style {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(*bucket)
    }

    /// 起動設定から構築する。
    pub fn from_config(config: &GatewayConfig) -> anyhow::Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", config.region));

        let bucket_internal = Self::init_bucket(config, &endpoint)?;

        let bucket_public = config
            .public_endpoint
            .as_deref()
            .map(|public_ep| {
                tracing::info!(
                    s3_public_endpoint = %public_ep,
                    "クライアント向けS3エンドポイントを設定"
                );
                Self::init_bucket(config, public_ep)
            })
            .transpose()?;

        Ok(Self::new(bucket_internal, bucket_public))
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    /// ページングはrust-s3側で辿られ、全件を返す。
    async fn list_objects(&self) -> Result<Vec<ObjectSummary>, GatewayError> {
        let pages = self
            .bucket_internal
            .list(String::new(), None)
            .await
            .map_err(|e| GatewayError::Storage(format!("オブジェクト一覧の取得に失敗: {e}")))?;

        Ok(pages
            .into_iter()
            .flat_map(|page| page.contents)
            .map(|object| ObjectSummary {
                key: object.key,
                size_bytes: object.size,
            })
            .collect())
    }

    /// rust-s3はキー先頭の `/` を取り除いて署名する。
    /// そのため `/a.txt` と `a.txt` は同じURLになり、先頭が `/` のキーを持つ
    /// オブジェクトは発行されたURLからは到達できない。
    async fn presign(
        &self,
        operation: &SignOperation,
        key: &str,
        expiry_secs: u32,
    ) -> Result<String, GatewayError> {
        let public_bucket = self.bucket_public.as_ref().unwrap_or(&self.bucket_internal);

        match operation {
            SignOperation::Read => public_bucket
                .presign_get(key, expiry_secs, None)
                .await
                .map_err(|e| {
                    GatewayError::Storage(format!("署名付きダウンロードURL生成失敗: {e}"))
                }),
            SignOperation::Write { content_type } => {
                let value = HeaderValue::from_str(content_type).map_err(|e| {
                    GatewayError::Internal(format!("Content-Typeをヘッダに変換できません: {e}"))
                })?;
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, value);

                public_bucket
                    .presign_put(key, expiry_secs, Some(headers), None)
                    .await
                    .map_err(|e| {
                        GatewayError::Storage(format!("署名付きアップロードURL生成失敗: {e}"))
                    })
            }
        }
    }
}
