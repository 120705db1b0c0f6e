//! # Gatewayクライアント
//!
//! 一覧ページのスクリプトと同じ手順（URL発行 → ストレージと直接転送）を
//! コマンドラインから実行する。

use std::path::Path;

use anyhow::{anyhow, bail, Context};
use filegate_types::{
    DownloadUrlRequest, DownloadUrlResponse, ErrorBody, UploadUrlRequest, UploadUrlResponse,
};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Gateway APIクライアント。
pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// 署名付きアップロードURLを取得する。
    pub async fn upload_url(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> anyhow::Result<UploadUrlResponse> {
        self.post_json(
            "/get-upload-url",
            &UploadUrlRequest {
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
            },
        )
        .await
    }

    /// 署名付きダウンロードURLを取得する。
    pub async fn download_url(&self, file_key: &str) -> anyhow::Result<DownloadUrlResponse> {
        self.post_json(
            "/get-download-url",
            &DownloadUrlRequest {
                file_key: file_key.to_string(),
            },
        )
        .await
    }

    /// ファイルをアップロードし、使用したキーを返す。
    ///
    /// キー省略時はファイル名、Content-Type省略時は拡張子から推定した値を使う。
    pub async fn upload_file(
        &self,
        path: &Path,
        key: Option<&str>,
        content_type: Option<&str>,
    ) -> anyhow::Result<String> {
        let key = match key {
            Some(key) => key.to_string(),
            None => path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .with_context(|| format!("ファイル名を決定できません: {}", path.display()))?,
        };
        let content_type = content_type
            .map(str::to_string)
            .unwrap_or_else(|| guess_content_type(path));

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("ファイルの読み込みに失敗: {}", path.display()))?;

        let issued = self.upload_url(&key, &content_type).await?;
        tracing::debug!(%key, %content_type, bytes = data.len(), "ストレージへアップロードします");

        // 署名にContent-Typeが含まれているため、同じ値を送る必要がある
        let response = self
            .http
            .put(&issued.upload_url)
            .header(CONTENT_TYPE, &content_type)
            .body(data)
            .send()
            .await
            .context("ストレージへの送信に失敗")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("ストレージへのアップロードに失敗: HTTP {status} - {body}");
        }

        Ok(key)
    }

    /// オブジェクトをダウンロードして `output` に書き込み、バイト数を返す。
    pub async fn download_file(&self, key: &str, output: &Path) -> anyhow::Result<u64> {
        let issued = self.download_url(key).await?;

        let response = self
            .http
            .get(&issued.download_url)
            .send()
            .await
            .context("ストレージからの取得に失敗")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("ストレージからのダウンロードに失敗: HTTP {status} - {body}");
        }

        let data = response
            .bytes()
            .await
            .context("レスポンス読み取り失敗")?;
        tokio::fs::write(output, &data)
            .await
            .with_context(|| format!("ファイルの書き込みに失敗: {}", output.display()))?;

        Ok(data.len() as u64)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> anyhow::Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Gatewayへの送信に失敗: {url}"))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .context("レスポンス読み取り失敗")?;

        if !status.is_success() {
            return Err(gateway_error(status, &bytes));
        }

        serde_json::from_slice(&bytes).context("レスポンスのパースに失敗")
    }
}

/// Gatewayのエラーレスポンスを `{error, message}` からエラーに変換する。
fn gateway_error(status: reqwest::StatusCode, body: &[u8]) -> anyhow::Error {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error,
            message: Some(message),
        }) => anyhow!("Gatewayがエラーを返しました: HTTP {status} - {error}: {message}"),
        Ok(ErrorBody { error, .. }) => anyhow!("Gatewayがエラーを返しました: HTTP {status} - {error}"),
        Err(_) => anyhow!(
            "Gatewayがエラーを返しました: HTTP {status} - {}",
            String::from_utf8_lossy(body)
        ),
    }
}

/// 拡張子からContent-Typeを推定する。不明な場合は application/octet-stream。
pub fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// キーの最後のパス要素をローカルのファイル名として使う。
pub fn default_output_name(key: &str) -> Option<&str> {
    key.rsplit('/').next().filter(|name| !name.is_empty())
}
