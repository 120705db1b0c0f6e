//! # リクエストボディの検証
//!
//! 生ボディ → 構造化デコード（失敗時は空オブジェクト）→ 固定スキーマでの
//! 必須フィールド検証 → 型付きリクエスト、の順で処理する。
//! 検証に失敗したリクエストはストレージに到達しない。

use filegate_types::{DownloadUrlRequest, UploadUrlRequest};
use http02::HeaderValue;
use serde_json::{Map, Value};

use crate::error::GatewayError;

/// 生ボディをJSONオブジェクトとしてデコードする。
/// 空ボディ・不正なJSON・オブジェクト以外の値はすべて空オブジェクトとして扱う。
pub fn decode_body(raw: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// 必須の文字列フィールドを取り出す。欠落・null・文字列以外・空文字列はNone。
fn required_str<'a>(body: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    body.get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// /get-upload-url のボディを検証する。
pub fn parse_upload_request(raw: &[u8]) -> Result<UploadUrlRequest, GatewayError> {
    let body = decode_body(raw);

    let (file_name, content_type) = match (
        required_str(&body, "fileName"),
        required_str(&body, "contentType"),
    ) {
        (Some(file_name), Some(content_type)) => (file_name, content_type),
        (None, None) => return Err(validation("fileName and contentType are required")),
        (None, Some(_)) => return Err(validation("fileName is required")),
        (Some(_), None) => return Err(validation("contentType is required")),
    };

    // 署名対象ヘッダになるため、ヘッダ値として表現できない値は拒否する
    if HeaderValue::from_str(content_type).is_err() {
        return Err(validation("contentType must be a valid header value"));
    }

    Ok(UploadUrlRequest {
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
    })
}

/// /get-download-url のボディを検証する。
pub fn parse_download_request(raw: &[u8]) -> Result<DownloadUrlRequest, GatewayError> {
    let body = decode_body(raw);

    let file_key = required_str(&body, "fileKey").ok_or_else(|| validation("fileKey is required"))?;

    Ok(DownloadUrlRequest {
        file_key: file_key.to_string(),
    })
}

fn validation(message: &str) -> GatewayError {
    GatewayError::Validation(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(result: Result<impl std::fmt::Debug, GatewayError>) -> String {
        match result {
            Err(GatewayError::Validation(message)) => message,
            other => panic!("Validationエラーを期待したが {other:?}"),
        }
    }

    #[test]
    fn test_decode_body_falls_back_to_empty_object() {
        assert!(decode_body(b"").is_empty());
        assert!(decode_body(b"{not json").is_empty());
        assert!(decode_body(b"[1, 2, 3]").is_empty());
        assert!(decode_body(b"\"fileKey\"").is_empty());
        assert!(decode_body(b"null").is_empty());

        let map = decode_body(br#"{"fileKey": "a.txt"}"#);
        assert_eq!(map.get("fileKey").and_then(Value::as_str), Some("a.txt"));
    }

    #[test]
    fn test_upload_request_valid() {
        let req =
            parse_upload_request(br#"{"fileName":"a.txt","contentType":"text/plain"}"#).unwrap();
        assert_eq!(req.file_name, "a.txt");
        assert_eq!(req.content_type, "text/plain");
    }

    /// 欠落フィールドに応じたメッセージが返ることを確認
    #[test]
    fn test_upload_request_missing_fields() {
        assert_eq!(
            validation_message(parse_upload_request(b"{}")),
            "fileName and contentType are required"
        );
        assert_eq!(
            validation_message(parse_upload_request(br#"{"contentType":"text/plain"}"#)),
            "fileName is required"
        );
        assert_eq!(
            validation_message(parse_upload_request(br#"{"fileName":"a.txt"}"#)),
            "contentType is required"
        );
        assert_eq!(
            validation_message(parse_upload_request(
                br#"{"fileName":"","contentType":"text/plain"}"#
            )),
            "fileName is required"
        );
        assert_eq!(
            validation_message(parse_upload_request(b"garbage")),
            "fileName and contentType are required"
        );
    }

    /// 文字列以外の値は欠落として扱われることを確認
    #[test]
    fn test_upload_request_non_string_fields() {
        assert_eq!(
            validation_message(parse_upload_request(
                br#"{"fileName":42,"contentType":"text/plain"}"#
            )),
            "fileName is required"
        );
        assert_eq!(
            validation_message(parse_upload_request(
                br#"{"fileName":"a.txt","contentType":null}"#
            )),
            "contentType is required"
        );
    }

    #[test]
    fn test_upload_request_rejects_unrepresentable_content_type() {
        assert_eq!(
            validation_message(parse_upload_request(
                b"{\"fileName\":\"a.txt\",\"contentType\":\"text/plain\\nx-evil: 1\"}"
            )),
            "contentType must be a valid header value"
        );
    }

    #[test]
    fn test_download_request() {
        let req = parse_download_request(br#"{"fileKey":"docs/a.txt"}"#).unwrap();
        assert_eq!(req.file_key, "docs/a.txt");

        let bodies: [&[u8]; 5] = [b"{}", b"", b"[]", br#"{"fileKey":""}"#, br#"{"fileKey":7}"#];
        for body in bodies {
            assert_eq!(
                validation_message(parse_download_request(body)),
                "fileKey is required"
            );
        }
    }
}
