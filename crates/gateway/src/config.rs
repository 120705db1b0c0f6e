//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! 設定は起動時に一度だけ構築され、以降は読み取り専用。

use anyhow::{bail, Context};

use crate::storage::ObjectStorage;

/// 署名付きURLのデフォルト有効期限（秒）
pub const DEFAULT_URL_EXPIRY_SECS: u32 = 300;

/// SigV4署名付きURLの有効期限の上限（7日）
pub const MAX_URL_EXPIRY_SECS: u32 = 604_800;

/// デフォルトの待ち受けアドレス
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Gateway起動設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// 対象バケット名（BUCKET_NAME）
    pub bucket_name: String,
    /// S3互換エンドポイント。Noneの場合はAWSのリージョナルエンドポイント
    pub endpoint: Option<String>,
    /// クライアント向け署名付きURLに使うエンドポイント。
    /// 内部ホスト名と外部ホスト名が異なる場合に使用。
    pub public_endpoint: Option<String>,
    /// 署名リージョン（S3_REGION → AWS_REGION → エンドポイントから検出）
    pub region: String,
    /// 静的アクセスキー。Noneの場合は環境の認証情報チェーンに委ねる
    pub access_key: Option<String>,
    /// 静的シークレットキー
    pub secret_key: Option<String>,
    /// パススタイルアドレッシングを使うか
    pub path_style: bool,
    /// アップロードURLの有効期限（秒）
    pub upload_expiry_secs: u32,
    /// ダウンロードURLの有効期限（秒）
    pub download_expiry_secs: u32,
    /// 待ち受けアドレス
    pub listen_addr: String,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の変数解決関数から構築する。空文字列は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bucket_name = get("BUCKET_NAME").context("BUCKET_NAMEが設定されていません")?;
        let endpoint = get("S3_ENDPOINT");
        let public_endpoint = get("S3_PUBLIC_ENDPOINT");
        let region = get("S3_REGION")
            .or_else(|| get("AWS_REGION"))
            .unwrap_or_else(|| detect_region(endpoint.as_deref().unwrap_or_default()));

        let path_style = match get("S3_PATH_STYLE") {
            Some(v) => parse_bool("S3_PATH_STYLE", &v)?,
            // S3互換ストレージ（MinIO等）はパススタイルが前提
            None => endpoint.is_some(),
        };

        let upload_expiry_secs = match get("UPLOAD_URL_EXPIRY_SECS") {
            Some(v) => parse_expiry("UPLOAD_URL_EXPIRY_SECS", &v)?,
            None => DEFAULT_URL_EXPIRY_SECS,
        };
        let download_expiry_secs = match get("DOWNLOAD_URL_EXPIRY_SECS") {
            Some(v) => parse_expiry("DOWNLOAD_URL_EXPIRY_SECS", &v)?,
            None => DEFAULT_URL_EXPIRY_SECS,
        };

        Ok(Self {
            bucket_name,
            endpoint,
            public_endpoint,
            region,
            access_key: get("S3_ACCESS_KEY"),
            secret_key: get("S3_SECRET_KEY"),
            path_style,
            upload_expiry_secs,
            download_expiry_secs,
            listen_addr: get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        })
    }
}

/// AWS S3エンドポイント（s3.REGION.amazonaws.com）からリージョンを検出する。
/// 非AWSエンドポイントではus-east-1をフォールバックとして使用。
pub fn detect_region(endpoint: &str) -> String {
    endpoint
        .find("s3.")
        .and_then(|start| {
            let rest = &endpoint[start + 3..];
            rest.find(".amazonaws.com").map(|end| rest[..end].to_string())
        })
        .filter(|region| !region.is_empty())
        .unwrap_or_else(|| "us-east-1".to_string())
}

fn parse_expiry(name: &str, value: &str) -> anyhow::Result<u32> {
    let secs: u32 = value
        .trim()
        .parse()
        .with_context(|| format!("{name}は秒数（整数）である必要があります: {value}"))?;
    if secs == 0 || secs > MAX_URL_EXPIRY_SECS {
        bail!("{name}は1以上{MAX_URL_EXPIRY_SECS}以下である必要があります: {secs}");
    }
    Ok(secs)
}

fn parse_bool(name: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => bail!("{name}はtrue/falseである必要があります: {value}"),
    }
}

/// Gatewayの共有状態。
/// リクエスト間で共有されるが、起動後に変更されることはない。
pub struct GatewayState {
    /// オブジェクトストレージ（S3互換等、トレイトで抽象化）
    pub storage: Box<dyn ObjectStorage>,
    /// アップロードURLの有効期限（秒）
    pub upload_expiry_secs: u32,
    /// ダウンロードURLの有効期限（秒）
    pub download_expiry_secs: u32,
}

impl GatewayState {
    pub fn new(config: &GatewayConfig, storage: Box<dyn ObjectStorage>) -> Self {
        Self {
            storage,
            upload_expiry_secs: config.upload_expiry_secs,
            download_expiry_secs: config.download_expiry_secs,
        }
    }
}
