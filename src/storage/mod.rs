//! Persistence gateway
//!
//! Durable per-page key-value storage. The annotation store always writes
//! the *entire* value for a key on any mutation; there is no incremental
//! append or patch at this layer. Values are opaque JSON, so one gateway
//! serves highlights, visualizations and settings alike.

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryGateway;
pub use schema::initialize_schema;
pub use sqlite::{create_pool, SqliteGateway};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Durable key-value storage for annotation sets.
#[async_trait]
pub trait AnnotationGateway: Send + Sync {
    /// Read the stored value for a key, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the stored value for a key.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove a key and its value.
    async fn remove(&self, key: &str) -> Result<()>;

    /// All stored keys. Used by debug and bulk-clear tooling.
    async fn keys(&self) -> Result<Vec<String>>;
}
