//! Page sessions
//!
//! A [`PageSession`] is the per-context object holding everything one page
//! needs: its identity, the parsed document, and the two annotation stores.
//! It is constructed once when the client opens the page and torn down on
//! close; there is no hidden module-global state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::anchor::{resolve_range, RangeAnchor};
use crate::annotations::{
    Comments, HighlightColor, HighlightRecord, HighlightSummary, VisualizationRecord,
    VisualizationSummary,
};
use crate::dom::{parse_document, serialize_document, Document, DomRange};
use crate::error::Result;
use crate::page::PageKey;
use crate::storage::AnnotationGateway;
use crate::store::{HighlightStore, VisualizationStore};

/// How many records of each kind a restore brought back.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RestoreCounts {
    #[serde(rename = "restoredHighlights")]
    pub highlights: usize,
    #[serde(rename = "restoredVisualizations")]
    pub visualizations: usize,
}

/// One open page: document, identity and stores.
pub struct PageSession {
    page: PageKey,
    title: String,
    document: Document,
    highlights: HighlightStore,
    visualizations: VisualizationStore,
}

impl PageSession {
    /// Parse the page snapshot and restore any persisted annotations
    /// against it. Restore failures drop individual records, never the
    /// session.
    pub async fn open(
        url: &str,
        markup: &str,
        gateway: Arc<dyn AnnotationGateway>,
    ) -> Result<(Self, RestoreCounts)> {
        let page = PageKey::new(url);
        let mut document = parse_document(markup)?;
        let mut highlights = HighlightStore::new(&page, gateway.clone());
        let mut visualizations = VisualizationStore::new(&page, gateway);

        let restored_highlights = highlights.load_and_restore(&mut document).await?;
        let restored_visualizations = visualizations.load_and_restore(&mut document).await?;

        let title = document
            .find_element("title")
            .map(|node| document.text_content(node))
            .unwrap_or_default();

        let session = Self {
            page,
            title,
            document,
            highlights,
            visualizations,
        };
        let counts = RestoreCounts {
            highlights: restored_highlights,
            visualizations: restored_visualizations,
        };
        Ok((session, counts))
    }

    pub fn page(&self) -> &PageKey {
        &self.page
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Serialize the document including all live projections.
    pub fn annotated_markup(&self) -> String {
        serialize_document(&self.document)
    }

    /// Resolve a client-provided selection against the current document.
    fn live_selection(&self, selection: &RangeAnchor) -> Option<DomRange> {
        resolve_range(&self.document, selection)
    }

    pub async fn create_highlight(
        &mut self,
        selection: &RangeAnchor,
        color: Option<HighlightColor>,
    ) -> Result<Option<HighlightRecord>> {
        let Some(range) = self.live_selection(selection) else {
            return Ok(None);
        };
        self.highlights
            .create_from_selection(&mut self.document, &range, color)
            .await
    }

    pub async fn update_comment(&mut self, id: &str, comment: Comments) -> Result<bool> {
        self.highlights
            .update_comment(&mut self.document, id, comment)
            .await
    }

    pub async fn delete_highlight(&mut self, id: &str) -> Result<bool> {
        self.highlights.delete(&mut self.document, id).await
    }

    pub async fn clear_highlights(&mut self) -> Result<()> {
        self.highlights.clear_all(&mut self.document).await
    }

    pub fn export_highlights(&self) -> Vec<HighlightSummary> {
        self.highlights.export()
    }

    pub async fn create_visualization(
        &mut self,
        selection: &RangeAnchor,
        insert_after: bool,
    ) -> Result<Option<VisualizationRecord>> {
        let Some(range) = self.live_selection(selection) else {
            return Ok(None);
        };
        self.visualizations
            .create_from_selection(&mut self.document, &range, insert_after)
            .await
    }

    pub async fn fill_visualization(&mut self, id: &str, markup: &str) -> Result<bool> {
        self.visualizations
            .fill_content(&mut self.document, id, markup)
            .await
    }

    pub async fn delete_visualization(&mut self, id: &str) -> Result<bool> {
        self.visualizations.delete(&mut self.document, id).await
    }

    pub async fn clear_visualizations(&mut self) -> Result<()> {
        self.visualizations.clear_all(&mut self.document).await
    }

    pub fn export_visualizations(&self) -> Vec<VisualizationSummary> {
        self.visualizations.export()
    }

    /// Extract text for summarization: the selection if one is provided,
    /// otherwise the page's main content paragraphs.
    pub fn extract(&self, selection: Option<&RangeAnchor>) -> Extraction {
        match selection {
            Some(sel) => {
                let text = self
                    .live_selection(sel)
                    .map(|range| range.text(&self.document).trim().to_string())
                    .unwrap_or_default();
                Extraction {
                    url: self.page.canonical().to_string(),
                    title: self.title.clone(),
                    paragraphs: vec![Paragraph { text }],
                    mode: ExtractionMode::Selection,
                }
            }
            None => Extraction {
                url: self.page.canonical().to_string(),
                title: self.title.clone(),
                paragraphs: self.page_paragraphs(),
                mode: ExtractionMode::Page,
            },
        }
    }

    /// Paragraph texts from the page's main content container: the first
    /// `article`, `main` or `[role=main]` element, falling back to `body`.
    fn page_paragraphs(&self) -> Vec<Paragraph> {
        let doc = &self.document;
        let container = doc
            .find_element_by(doc.root(), |d, n| {
                matches!(d.tag(n), Some("article") | Some("main"))
                    || d.attr(n, "role") == Some("main")
            })
            .or_else(|| doc.find_element("body"))
            .unwrap_or(doc.root());

        doc.descendants(container)
            .into_iter()
            .filter(|&n| doc.tag(n) == Some("p"))
            .map(|p| doc.text_content(p).trim().to_string())
            .filter(|text| text.len() > 30)
            .map(|text| Paragraph { text })
            .collect()
    }
}

/// Extracted page text for the summarizer.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub url: String,
    pub title: String,
    pub paragraphs: Vec<Paragraph>,
    pub mode: ExtractionMode,
}

impl Extraction {
    /// Paragraphs joined into the summarizer's input payload.
    pub fn joined_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Paragraph {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    Selection,
    Page,
}
