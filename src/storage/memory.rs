//! In-memory persistence gateway
//!
//! Test double with the same whole-value write semantics as the SQLite
//! gateway.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::Result;

use super::AnnotationGateway;

/// In-memory key-value gateway.
#[derive(Default)]
pub struct MemoryGateway {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl AnnotationGateway for MemoryGateway {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_gateway_roundtrip() {
        let gateway = MemoryGateway::new();
        gateway
            .set("k", serde_json::json!(["x"]))
            .await
            .unwrap();
        assert_eq!(
            gateway.get("k").await.unwrap(),
            Some(serde_json::json!(["x"]))
        );
        gateway.remove("k").await.unwrap();
        assert!(gateway.is_empty());
    }
}
