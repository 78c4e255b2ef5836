//! Visualization projection
//!
//! Inserts a placeholder container (loading state) next to the anchor
//! element, then swaps the skeleton for externally rendered content once it
//! arrives. The rendered markup must carry a root `<svg>` element; anything
//! else is a render failure.

use thiserror::Error;

use crate::anchor::resolve_point;
use crate::annotations::VisualizationRecord;
use crate::dom::{parse_fragment, Document, MarkupError, NodeId};

use super::{child_with_class, Projector};

const CONTENT_CLASS: &str = "visualization-content";
const SKELETON_CLASS: &str = "visualization-skeleton";
const LOADING_TEXT_CLASS: &str = "visualization-loading-text";
const CLOSE_BTN_CLASS: &str = "visualization-close-btn";
const LOADING_TEXT: &str = "Generating diagram...";

/// Rendered-content failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Rendered markup error: {0}")]
    Markup(#[from] MarkupError),

    #[error("Rendered content has no root svg element")]
    MissingSvg,

    #[error("Container is not a visualization projection")]
    NotAContainer,
}

pub struct VisualizationProjector;

impl Projector<VisualizationRecord> for VisualizationProjector {
    fn project(&self, doc: &mut Document, record: &VisualizationRecord) -> Option<NodeId> {
        let anchor = resolve_point(doc, &record.anchor)?;
        let parent = doc.parent(anchor)?;
        let container = build_container(doc, &record.id);
        if record.anchor.insert_after {
            doc.insert_after(parent, container, anchor);
        } else {
            doc.insert_before(parent, container, anchor);
        }
        if let Some(content) = &record.rendered_content {
            // Restoring with stale or malformed content leaves the container
            // in its loading state rather than failing the whole record.
            if let Err(err) = fill_content(doc, container, content) {
                tracing::debug!("visualization {} content not restored: {}", record.id, err);
            }
        }
        Some(container)
    }

    fn unproject(&self, doc: &mut Document, node: NodeId) {
        doc.detach(node);
    }
}

/// Build the placeholder container shown while rendering is in flight.
pub fn build_container(doc: &mut Document, id: &str) -> NodeId {
    let container = doc.create_element("div");
    doc.set_attr(container, "id", "visualization-container");
    doc.set_attr(container, "data-viz-id", id);

    let content = doc.create_element("div");
    doc.set_attr(content, "class", CONTENT_CLASS);

    let skeleton = doc.create_element("div");
    doc.set_attr(skeleton, "class", SKELETON_CLASS);

    let loading = doc.create_element("span");
    doc.set_attr(loading, "class", LOADING_TEXT_CLASS);
    let loading_text = doc.create_text(LOADING_TEXT);
    doc.append_child(loading, loading_text);

    let close = doc.create_element("button");
    doc.set_attr(close, "class", CLOSE_BTN_CLASS);

    doc.append_child(skeleton, loading);
    doc.append_child(content, skeleton);
    doc.append_child(container, content);
    doc.append_child(container, close);

    container
}

/// Swap the loading skeleton for rendered content. Expects a root `<svg>`
/// element somewhere in the markup's top level.
pub fn fill_content(
    doc: &mut Document,
    container: NodeId,
    markup: &str,
) -> Result<(), RenderError> {
    let content = child_with_class(doc, container, CONTENT_CLASS).ok_or(RenderError::NotAContainer)?;

    let nodes = parse_fragment(doc, markup)?;
    let svg = nodes
        .into_iter()
        .find(|&n| doc.tag(n) == Some("svg"))
        .ok_or(RenderError::MissingSvg)?;

    if let Some(skeleton) = child_with_class(doc, content, SKELETON_CLASS) {
        doc.detach(skeleton);
    }
    if let Some(close) = child_with_class(doc, container, CLOSE_BTN_CLASS) {
        doc.set_attr(close, "style", "display: flex;");
    }
    doc.append_child(content, svg);
    Ok(())
}
