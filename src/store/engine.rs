//! Generalized annotation store engine
//!
//! One store instance is the single source of truth for one page's records
//! of one kind. It mediates create/update/delete, keeps the in-memory set
//! synchronized with projected DOM nodes, and writes the *entire* record
//! list to the persistence gateway on every mutation.
//!
//! Writes are not queued: two rapid mutations each write a full snapshot
//! and the later write wins. Within one page context all operations run on
//! one logical task, so the in-memory set itself never races.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::annotations::RecordKind;
use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::page::PageKey;
use crate::projector::Projector;
use crate::storage::AnnotationGateway;

/// A record type the engine can anchor, project and persist.
pub trait AnchoredRecord: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Storage key prefix for this record kind.
    const KIND: RecordKind;

    fn id(&self) -> &str;
}

/// In-memory record set plus its persistence key and projector.
pub struct AnnotationStore<R, P> {
    key: String,
    gateway: Arc<dyn AnnotationGateway>,
    projector: P,
    records: Vec<R>,
    /// Live projection handles by record id. Derived state, never persisted.
    projections: HashMap<String, NodeId>,
}

impl<R: AnchoredRecord, P: Projector<R>> AnnotationStore<R, P> {
    pub fn new(page: &PageKey, gateway: Arc<dyn AnnotationGateway>, projector: P) -> Self {
        Self {
            key: page.storage_key(R::KIND),
            gateway,
            projector,
            records: Vec::new(),
            projections: HashMap::new(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn node_for(&self, id: &str) -> Option<NodeId> {
        self.projections.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read the persisted list and restore each record against the live
    /// document. Records whose anchors no longer resolve are silently
    /// skipped; their stored rows are left untouched. Returns the count of
    /// successfully restored records.
    pub async fn load_and_restore(&mut self, doc: &mut Document) -> Result<usize> {
        let rows = match self.gateway.get(&self.key).await? {
            Some(Value::Array(rows)) => rows,
            Some(_) | None => Vec::new(),
        };
        let total = rows.len();
        let mut restored = 0usize;

        for row in rows {
            let record: R = match serde_json::from_value(row) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!("skipping malformed {} row: {}", R::KIND.as_str(), err);
                    continue;
                }
            };
            match self.projector.project(doc, &record) {
                Some(node) => {
                    self.projections.insert(record.id().to_string(), node);
                    self.records.push(record);
                    restored += 1;
                }
                None => {
                    tracing::debug!(
                        "could not restore {} record {}",
                        R::KIND.as_str(),
                        record.id()
                    );
                }
            }
        }

        tracing::info!(
            "restored {}/{} records for {}",
            restored,
            total,
            self.key
        );
        Ok(restored)
    }

    /// Project a freshly created record and persist the full set. Returns
    /// `None` without persisting if the projection fails.
    pub async fn commit_new(&mut self, doc: &mut Document, record: R) -> Result<Option<R>> {
        let Some(node) = self.projector.project(doc, &record) else {
            return Ok(None);
        };
        self.projections.insert(record.id().to_string(), node);
        self.records.push(record.clone());
        self.persist_all().await?;
        Ok(Some(record))
    }

    /// Adopt a record whose projection was already materialized at the live
    /// selection (containers are inserted directly, not by re-resolving the
    /// just-computed anchor).
    pub async fn commit_projected(&mut self, record: R, node: NodeId) -> Result<()> {
        self.projections.insert(record.id().to_string(), node);
        self.records.push(record);
        self.persist_all().await
    }

    /// Mutate a record in place, refresh its projection side effects, and
    /// re-persist. Returns `false` if the id is unknown.
    pub async fn update<F>(&mut self, doc: &mut Document, id: &str, mutate: F) -> Result<bool>
    where
        F: FnOnce(&mut R),
    {
        let Some(pos) = self.records.iter().position(|r| r.id() == id) else {
            return Ok(false);
        };
        mutate(&mut self.records[pos]);
        if let Some(&node) = self.projections.get(id) {
            let record = self.records[pos].clone();
            self.projector.refresh(doc, &record, node);
        }
        self.persist_all().await?;
        Ok(true)
    }

    /// Remove a record and its projection, then re-persist. Removing an
    /// unknown id is a no-op.
    pub async fn remove(&mut self, doc: &mut Document, id: &str) -> Result<bool> {
        let Some(pos) = self.records.iter().position(|r| r.id() == id) else {
            return Ok(false);
        };
        if let Some(node) = self.projections.remove(id) {
            self.projector.unproject(doc, node);
        }
        self.records.remove(pos);
        self.persist_all().await?;
        Ok(true)
    }

    /// Remove every projection and drop the entire stored key.
    pub async fn clear_all(&mut self, doc: &mut Document) -> Result<()> {
        let nodes: Vec<NodeId> = self.projections.drain().map(|(_, node)| node).collect();
        for node in nodes {
            self.projector.unproject(doc, node);
        }
        self.records.clear();
        self.gateway.remove(&self.key).await
    }

    /// Write the whole in-memory set under this store's key.
    async fn persist_all(&self) -> Result<()> {
        let rows = self
            .records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()?;
        self.gateway.set(&self.key, Value::Array(rows)).await
    }
}
