//! Highlight store
//!
//! Kind-specific front over the generalized engine: selection preconditions,
//! fresh anchor computation, comment editing and the reduced export shape.

use std::sync::Arc;

use crate::anchor::{encode, RangeAnchor};
use crate::annotations::{
    Comments, HighlightColor, HighlightRecord, HighlightSummary, RecordKind,
};
use crate::dom::{Document, DomRange, NodeId};
use crate::error::Result;
use crate::page::PageKey;
use crate::projector::HighlightProjector;
use crate::storage::AnnotationGateway;

use super::engine::{AnchoredRecord, AnnotationStore};

impl AnchoredRecord for HighlightRecord {
    const KIND: RecordKind = RecordKind::Highlights;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Per-page highlight set.
pub struct HighlightStore {
    inner: AnnotationStore<HighlightRecord, HighlightProjector>,
}

impl HighlightStore {
    pub fn new(page: &PageKey, gateway: Arc<dyn AnnotationGateway>) -> Self {
        Self {
            inner: AnnotationStore::new(page, gateway, HighlightProjector),
        }
    }

    pub fn storage_key(&self) -> &str {
        self.inner.storage_key()
    }

    pub async fn load_and_restore(&mut self, doc: &mut Document) -> Result<usize> {
        self.inner.load_and_restore(doc).await
    }

    /// Create a highlight from a live selection. Returns `None` (and
    /// persists nothing) for a collapsed or empty selection, or when either
    /// endpoint cannot be anchored.
    ///
    /// The anchor is always computed from the selection's actual endpoints
    /// in the current document, never from a cached copy.
    pub async fn create_from_selection(
        &mut self,
        doc: &mut Document,
        selection: &DomRange,
        color: Option<HighlightColor>,
    ) -> Result<Option<HighlightRecord>> {
        let text = selection.text(doc);
        if selection.is_collapsed() || text.trim().is_empty() {
            return Ok(None);
        }
        let Some(start_path) = encode(doc, selection.start) else {
            return Ok(None);
        };
        let Some(end_path) = encode(doc, selection.end) else {
            return Ok(None);
        };
        let anchor = RangeAnchor {
            start_path,
            start_offset: selection.start_offset,
            end_path,
            end_offset: selection.end_offset,
        };
        let record = HighlightRecord::new(
            anchor,
            color.unwrap_or_default(),
            text.trim().to_string(),
        );
        self.inner.commit_new(doc, record).await
    }

    /// Replace the comment list on a highlight and refresh its indicator.
    pub async fn update_comment(
        &mut self,
        doc: &mut Document,
        id: &str,
        comments: Comments,
    ) -> Result<bool> {
        self.inner
            .update(doc, id, |record| record.comment = comments)
            .await
    }

    pub async fn delete(&mut self, doc: &mut Document, id: &str) -> Result<bool> {
        self.inner.remove(doc, id).await
    }

    pub async fn clear_all(&mut self, doc: &mut Document) -> Result<()> {
        self.inner.clear_all(doc).await
    }

    pub fn get(&self, id: &str) -> Option<&HighlightRecord> {
        self.inner.get(id)
    }

    pub fn records(&self) -> &[HighlightRecord] {
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

    /// Reduced, DOM-free listing for the overlay UI.
    pub fn export(&self) -> Vec<HighlightSummary> {
        self.inner.records().iter().map(Into::into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;
    use crate::storage::MemoryGateway;

    const PAGE_MARKUP: &str =
        "<html><body><article><p>intro</p><p>hello world</p></article></body></html>";

    fn page() -> PageKey {
        PageKey::new("https://example.com/a?x=1#frag")
    }

    fn select_hello_world(doc: &Document) -> DomRange {
        let article = doc.find_element("article").unwrap();
        let p2 = doc.children(article)[1];
        let text = doc.children(p2)[0];
        DomRange {
            start: text,
            start_offset: 0,
            end: text,
            end_offset: 11,
        }
    }

    #[tokio::test]
    async fn test_create_computes_expected_anchor_and_key() {
        let mut doc = parse_document(PAGE_MARKUP).unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        let mut store = HighlightStore::new(&page(), gateway.clone());
        assert_eq!(
            store.storage_key(),
            "highlights:https://example.com/a?x=1#frag"
        );

        let selection = select_hello_world(&doc);
        let record = store
            .create_from_selection(&mut doc, &selection, None)
            .await
            .unwrap()
            .expect("highlight created");

        assert_eq!(record.text, "hello world");
        assert!(record
            .anchor
            .start_path
            .to_string()
            .ends_with("/p[2]/text()[1]"));
        assert_eq!(record.anchor.start_offset, 0);
        assert_eq!(record.anchor.end_offset, 11);

        // The full set was persisted synchronously.
        let stored = gateway.get(store.storage_key()).await.unwrap().unwrap();
        assert_eq!(stored.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_collapsed_selection() {
        let mut doc = parse_document(PAGE_MARKUP).unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        let mut store = HighlightStore::new(&page(), gateway.clone());

        let mut selection = select_hello_world(&doc);
        selection.end_offset = 0;
        let created = store
            .create_from_selection(&mut doc, &selection, None)
            .await
            .unwrap();
        assert!(created.is_none());
        assert!(gateway.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let mut doc = parse_document(PAGE_MARKUP).unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        let mut store = HighlightStore::new(&page(), gateway);

        let selection = select_hello_world(&doc);
        let record = store
            .create_from_selection(&mut doc, &selection, None)
            .await
            .unwrap()
            .unwrap();

        assert!(store.delete(&mut doc, &record.id).await.unwrap());
        // Second delete is a no-op, not an error.
        assert!(!store.delete(&mut doc, &record.id).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_persist_then_reload_fidelity() {
        let gateway = Arc::new(MemoryGateway::new());
        let original = {
            let mut doc = parse_document(PAGE_MARKUP).unwrap();
            let mut store = HighlightStore::new(&page(), gateway.clone());
            let selection = select_hello_world(&doc);
            let record = store
                .create_from_selection(
                    &mut doc,
                    &selection,
                    Some(HighlightColor::LightGreen),
                )
                .await
                .unwrap()
                .unwrap();
            store
                .update_comment(&mut doc, &record.id, Comments::new(vec!["note A".into()]))
                .await
                .unwrap();
            store.get(&record.id).unwrap().clone()
        };

        // A fresh store instance against a fresh parse of the same page.
        let mut doc = parse_document(PAGE_MARKUP).unwrap();
        let mut store = HighlightStore::new(&page(), gateway);
        let restored = store.load_and_restore(&mut doc).await.unwrap();
        assert_eq!(restored, 1);

        let record = store.get(&original.id).unwrap();
        assert_eq!(record.text, original.text);
        assert_eq!(record.color, original.color);
        assert_eq!(record.comment, original.comment);
        assert_eq!(record.anchor, original.anchor);
    }

    #[tokio::test]
    async fn test_restore_skips_unresolvable_records() {
        let gateway = Arc::new(MemoryGateway::new());
        {
            let mut doc = parse_document(PAGE_MARKUP).unwrap();
            let mut store = HighlightStore::new(&page(), gateway.clone());
            let selection = select_hello_world(&doc);
            store
                .create_from_selection(&mut doc, &selection, None)
                .await
                .unwrap()
                .unwrap();
        }

        // The page reloads without the anchored paragraph.
        let mut doc =
            parse_document("<html><body><article><p>intro</p></article></body></html>")
                .unwrap();
        let mut store = HighlightStore::new(&page(), gateway.clone());
        let restored = store.load_and_restore(&mut doc).await.unwrap();
        assert_eq!(restored, 0);
        assert!(store.is_empty());

        // The stored row is left untouched for a future successful resolve.
        let stored = gateway
            .get("highlights:https://example.com/a?x=1#frag")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_all_removes_key_and_projections() {
        let mut doc = parse_document(PAGE_MARKUP).unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        let mut store = HighlightStore::new(&page(), gateway.clone());
        let selection = select_hello_world(&doc);
        store
            .create_from_selection(&mut doc, &selection, None)
            .await
            .unwrap()
            .unwrap();

        store.clear_all(&mut doc).await.unwrap();
        assert!(store.is_empty());
        assert!(gateway.is_empty());
        // The wrapper is gone and the text is intact.
        let article = doc.find_element("article").unwrap();
        assert_eq!(doc.text_content(article), "introhello world");
        assert!(doc.find_element("span").is_none());
    }

    #[tokio::test]
    async fn test_export_shape() {
        let mut doc = parse_document(PAGE_MARKUP).unwrap();
        let gateway = Arc::new(MemoryGateway::new());
        let mut store = HighlightStore::new(&page(), gateway);
        let selection = select_hello_world(&doc);
        let record = store
            .create_from_selection(&mut doc, &selection, Some(HighlightColor::Pink))
            .await
            .unwrap()
            .unwrap();

        let export = store.export();
        assert_eq!(export.len(), 1);
        let json = serde_json::to_value(&export[0]).unwrap();
        assert_eq!(json["id"], record.id);
        assert_eq!(json["text"], "hello world");
        assert_eq!(json["color"], "pink");
        assert!(json.get("startPath").is_none());
    }
}
