//! # エンドポイントテスト用共通ヘルパー
//!
//! list, upload_url, download_url, routerのテストで共有するモックストレージ。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use filegate_types::ObjectSummary;

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::{ObjectStorage, SignOperation};

/// presign呼び出しの記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignCall {
    pub operation: SignOperation,
    pub key: String,
    pub expiry_secs: u32,
}

/// テスト用のモックObjectStorage。
/// S3への接続なしで一覧と署名付きURLのダミーを返す。
#[derive(Default)]
pub struct MockStorage {
    pub objects: Vec<ObjectSummary>,
    /// trueの場合、全操作がStorageエラーを返す
    pub fail: bool,
    pub calls: Arc<Mutex<Vec<PresignCall>>>,
    pub list_calls: Arc<AtomicUsize>,
}

impl MockStorage {
    pub fn with_objects(objects: Vec<ObjectSummary>) -> Self {
        Self {
            objects,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MockStorage {
    async fn list_objects(&self) -> Result<Vec<ObjectSummary>, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GatewayError::Storage("mock: backend unreachable".to_string()));
        }
        Ok(self.objects.clone())
    }

    async fn presign(
        &self,
        operation: &SignOperation,
        key: &str,
        expiry_secs: u32,
    ) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(PresignCall {
            operation: operation.clone(),
            key: key.to_string(),
            expiry_secs,
        });
        if self.fail {
            return Err(GatewayError::Storage("mock: credentials missing".to_string()));
        }
        let method = match operation {
            SignOperation::Read => "GET",
            SignOperation::Write { .. } => "PUT",
        };
        Ok(format!(
            "http://mock-storage/files/{key}?X-Amz-Expires={expiry_secs}&method={method}&sig=test"
        ))
    }
}

/// テスト用GatewayStateを構築するヘルパー。
/// 呼び出し記録はstorageが状態に移った後も参照できるよう複製して返す。
pub fn test_state(storage: MockStorage) -> (GatewayState, Arc<Mutex<Vec<PresignCall>>>) {
    let calls = storage.calls.clone();
    let state = GatewayState {
        storage: Box::new(storage),
        upload_expiry_secs: 300,
        download_expiry_secs: 300,
    };
    (state, calls)
}

/// 呼び出し記録の件数
pub fn presign_count(calls: &Arc<Mutex<Vec<PresignCall>>>) -> usize {
    calls.lock().unwrap().len()
}
