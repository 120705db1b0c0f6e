//! # Filegate 共有型定義
//!
//! GatewayのHTTP APIでやり取りされるJSON構造をRust構造体として提供する。
//! Gateway本体とCLIの双方がこのクレートを参照する。
//!
//! ## エンコーディング規則
//! - フィールド名はcamelCase（ブラウザ側スクリプトと共通）
//! - 有効期限は秒単位の整数

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// POST /get-upload-url
// ---------------------------------------------------------------------------

/// /get-upload-url リクエスト。
/// 両フィールドとも空でない文字列であること。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// アップロード先のオブジェクトキー
    pub file_name: String,
    /// アップロードするコンテンツのMIMEタイプ（署名に含まれる）
    pub content_type: String,
}

/// /get-upload-url レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// 署名付きアップロードURL（PUT）
    pub upload_url: String,
    /// URLの有効期間（秒）
    pub expires_in: u32,
}

// ---------------------------------------------------------------------------
// POST /get-download-url
// ---------------------------------------------------------------------------

/// /get-download-url リクエスト。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrlRequest {
    /// ダウンロード対象のオブジェクトキー
    pub file_key: String,
}

/// /get-download-url レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrlResponse {
    /// 署名付きダウンロードURL（GET）
    pub download_url: String,
    /// URLの有効期間（秒）
    pub expires_in: u32,
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// バケット内オブジェクト1件の要約。
/// サイズはストレージが報告した値をそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    /// オブジェクトキー
    pub key: String,
    /// オブジェクトサイズ（バイト）
    pub size_bytes: u64,
}

// ---------------------------------------------------------------------------
// エラーレスポンス
// ---------------------------------------------------------------------------

/// 400 / 500 で返却されるエラーボディ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// エラー概要
    pub error: String,
    /// 詳細メッセージ（500の場合のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 404 で返却されるボディ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFoundBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ワイヤ上のフィールド名がcamelCaseであることを確認
    #[test]
    fn test_wire_field_names() {
        let req = UploadUrlRequest {
            file_name: "a.txt".to_string(),
            content_type: "text/plain".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"fileName": "a.txt", "contentType": "text/plain"})
        );

        let resp = DownloadUrlResponse {
            download_url: "http://example.com/x".to_string(),
            expires_in: 300,
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["downloadUrl"], "http://example.com/x");
        assert_eq!(value["expiresIn"], 300);

        let summary = ObjectSummary {
            key: "k".to_string(),
            size_bytes: 2048,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value, serde_json::json!({"key": "k", "sizeBytes": 2048}));
    }

    /// messageが無いエラーボディは`error`のみを出力することを確認
    #[test]
    fn test_error_body_omits_empty_message() {
        let body = ErrorBody {
            error: "fileKey is required".to_string(),
            message: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"fileKey is required"}"#
        );

        let parsed: ErrorBody =
            serde_json::from_str(r#"{"error":"Internal Server Error","message":"boom"}"#)
                .unwrap();
        assert_eq!(parsed.message.as_deref(), Some("boom"));
    }
}
