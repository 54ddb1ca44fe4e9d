//! # Remote Key/Value Store
//!
//! A shared byte store kept by the backend, used for state that must survive
//! a restart of any single DNS server.
//!
//! ```text
//!  get(key) ──► Data(bytes) ──► Some(bytes)
//!           └─► Empty       ──► None
//!  set(key, bytes) ──► stored with the TTL given at construction
//! ```

use std::time::Duration;

use tracing::debug;

use crate::client::BackendClient;
use crate::error::{SyncError, SyncResult};
use crate::proto::{remote_kv_get_response::Value, RemoteKvGetRequest, RemoteKvSetRequest};

/// Client of the remote key/value store.
#[derive(Debug, Clone)]
pub struct RemoteKv {
    client: BackendClient,
    ttl: prost_types::Duration,
}

impl RemoteKv {
    /// Creates a store client writing every key with `ttl`.
    pub fn new(client: BackendClient, ttl: Duration) -> SyncResult<Self> {
        let ttl = prost_types::Duration::try_from(ttl)
            .map_err(|e| SyncError::InvalidConfig(format!("remote kv ttl: {e}")))?;

        Ok(Self { client, ttl })
    }

    /// Returns the value of `key`, or `None` when it has none.
    pub async fn get(&self, key: &str) -> SyncResult<Option<Vec<u8>>> {
        let req = RemoteKvGetRequest {
            key: key.to_string(),
        };
        let resp = self.client.call(self.client.backend().remote_kv_get(req)).await?;

        match resp.value {
            Some(Value::Data(data)) => Ok(Some(data)),
            Some(Value::Empty(_)) => Ok(None),
            None => Err(SyncError::InvalidResponse(format!(
                "remote kv get {key:?}: no value"
            ))),
        }
    }

    /// Stores `data` under `key`.
    pub async fn set(&self, key: &str, data: Vec<u8>) -> SyncResult<()> {
        let len = data.len();
        let req = RemoteKvSetRequest {
            key: key.to_string(),
            data,
            ttl: Some(self.ttl.clone()),
        };
        self.client.call(self.client.backend().remote_kv_set(req)).await?;

        debug!(key, bytes = len, "Remote kv value stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testutil::FakeBackend;

    #[tokio::test]
    async fn test_get_set() {
        let backend = Arc::new(FakeBackend::default());
        let client = BackendClient::new(backend.clone(), Duration::from_secs(5));
        let kv = RemoteKv::new(client, Duration::from_secs(3600)).unwrap();

        assert_eq!(kv.get("k").await.unwrap(), None);

        kv.set("k", b"value".to_vec()).await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), Some(b"value".to_vec()));

        let sets = backend.kv_sets.lock().unwrap().clone();
        assert_eq!(
            sets[0].ttl,
            Some(prost_types::Duration {
                seconds: 3600,
                nanos: 0,
            })
        );
    }
}
