//! Visualization store
//!
//! Kind-specific front over the generalized engine. A container is inserted
//! at the live selection immediately (loading state); the rendered content
//! arrives asynchronously and is swapped in via [`fill_content`].

use std::sync::Arc;

use crate::anchor::{encode, PointAnchor};
use crate::annotations::{RecordKind, VisualizationRecord, VisualizationSummary};
use crate::dom::{Document, DomRange, NodeId};
use crate::error::{AppError, Result};
use crate::page::PageKey;
use crate::projector::{self, VisualizationProjector};
use crate::storage::AnnotationGateway;

use super::engine::{AnchoredRecord, AnnotationStore};

impl AnchoredRecord for VisualizationRecord {
    const KIND: RecordKind = RecordKind::Visualizations;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Per-page visualization set.
pub struct VisualizationStore {
    inner: AnnotationStore<VisualizationRecord, VisualizationProjector>,
}

impl VisualizationStore {
    pub fn new(page: &PageKey, gateway: Arc<dyn AnnotationGateway>) -> Self {
        Self {
            inner: AnnotationStore::new(page, gateway, VisualizationProjector),
        }
    }

    pub fn storage_key(&self) -> &str {
        self.inner.storage_key()
    }

    pub async fn load_and_restore(&mut self, doc: &mut Document) -> Result<usize> {
        self.inner.load_and_restore(doc).await
    }

    /// Create a placeholder container next to the selection's anchor
    /// element and persist the record. Returns `None` when the anchor
    /// element cannot be encoded.
    pub async fn create_from_selection(
        &mut self,
        doc: &mut Document,
        selection: &DomRange,
        insert_after: bool,
    ) -> Result<Option<VisualizationRecord>> {
        let endpoint = if insert_after {
            selection.end
        } else {
            selection.start
        };
        let Some(anchor_element) = doc.element_ancestor(endpoint) else {
            return Ok(None);
        };
        let Some(path) = encode(doc, anchor_element) else {
            return Ok(None);
        };
        let Some(parent) = doc.parent(anchor_element) else {
            return Ok(None);
        };
        let anchor = PointAnchor { path, insert_after };
        let record =
            VisualizationRecord::new(anchor, selection.text(doc).trim().to_string());

        // The container goes in at the live position right away; the anchor
        // path is only re-resolved on a later restore.
        let container = projector::build_container(doc, &record.id);
        if insert_after {
            doc.insert_after(parent, container, anchor_element);
        } else {
            doc.insert_before(parent, container, anchor_element);
        }

        self.inner.commit_projected(record.clone(), container).await?;
        Ok(Some(record))
    }

    /// Swap in externally rendered content for a pending container and
    /// persist it on the record. Returns `false` for an unknown id; markup
    /// without a root svg element is a render failure.
    pub async fn fill_content(
        &mut self,
        doc: &mut Document,
        id: &str,
        markup: &str,
    ) -> Result<bool> {
        let Some(container) = self.inner.node_for(id) else {
            return Ok(false);
        };
        projector::fill_content(doc, container, markup)
            .map_err(|err| AppError::BadRequest(err.to_string()))?;
        let markup = markup.to_string();
        self.inner
            .update(doc, id, move |record| {
                record.rendered_content = Some(markup)
            })
            .await
    }

    pub async fn delete(&mut self, doc: &mut Document, id: &str) -> Result<bool> {
        self.inner.remove(doc, id).await
    }

    pub async fn clear_all(&mut self, doc: &mut Document) -> Result<()> {
        self.inner.clear_all(doc).await
    }

    pub fn get(&self, id: &str) -> Option<&VisualizationRecord> {
        self.inner.get(id)
    }

    pub fn records(&self) -> &[VisualizationRecord] {
        self.inner.records()
    }

    pub fn node_for(&self, id: &str) -> Option<NodeId> {
        self.inner.node_for(id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Reduced listing for the overlay UI.
    pub fn export(&self) -> Vec<VisualizationSummary> {
        self.inner.records().iter().map(Into::into).collect()
    }
}
