//! # GET /
//!
//! バケット内オブジェクトの一覧ページ。

use axum::response::Html;
use filegate_types::ObjectSummary;

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::view::render_listing;

/// バケット内の全オブジェクトの要約を取得する。
/// サイズはストレージの報告値をそのまま使い、キャッシュはしない。
pub async fn list_objects(state: &GatewayState) -> Result<Vec<ObjectSummary>, GatewayError> {
    let objects = state.storage.list_objects().await?;
    tracing::info!(count = objects.len(), "オブジェクト一覧を取得しました");
    Ok(objects)
}

/// GET / — 一覧ページを返す。
pub async fn handle_list(state: &GatewayState) -> Result<Html<String>, GatewayError> {
    let objects = list_objects(state).await?;
    Ok(Html(render_listing(&objects)))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::endpoints::test_helpers::{test_state, MockStorage};

    /// 一覧の件数とサイズがストレージの報告と一致することを確認
    #[tokio::test]
    async fn test_list_objects_matches_backend() {
        let objects = vec![
            ObjectSummary {
                key: "a.txt".to_string(),
                size_bytes: 0,
            },
            ObjectSummary {
                key: "photos/b.jpg".to_string(),
                size_bytes: 5_000_000_123,
            },
            ObjectSummary {
                key: "c.bin".to_string(),
                size_bytes: 1023,
            },
        ];
        let storage = MockStorage::with_objects(objects.clone());
        let list_calls = storage.list_calls.clone();
        let (state, _) = test_state(storage);

        let result = list_objects(&state).await.unwrap();

        assert_eq!(result, objects);
        assert_eq!(list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_handle_list_renders_page() {
        let (state, calls) = test_state(MockStorage::with_objects(vec![ObjectSummary {
            key: "report.pdf".to_string(),
            size_bytes: 3072,
        }]));

        let Html(page) = handle_list(&state).await.unwrap();

        assert!(page.contains("report.pdf (3.00 KB)"));
        // 一覧表示では署名は発生しない
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_list_backend_failure() {
        let (state, _) = test_state(MockStorage::failing());

        let result = handle_list(&state).await;

        assert!(matches!(result, Err(GatewayError::Storage(_))));
    }
}
