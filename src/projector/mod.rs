//! DOM projection
//!
//! Materializes annotation records as visible document nodes and tears them
//! down cleanly. Projections are derived and disposable; the record is the
//! source of truth. A projection failure is handled exactly like an anchor
//! resolution failure: the record is dropped from view, nothing panics.

mod highlight;
mod visualization;

pub use highlight::HighlightProjector;
pub use visualization::{build_container, fill_content, RenderError, VisualizationProjector};

use crate::dom::{Document, NodeId};

/// Materializes one record kind in the document.
pub trait Projector<R>: Send + Sync {
    /// Render the record into the document. `None` means the anchor did not
    /// resolve or the projection could not be applied.
    fn project(&self, doc: &mut Document, record: &R) -> Option<NodeId>;

    /// Remove the projection, restoring the surrounding structure so that
    /// path encoding stays stable for every other anchor under the same
    /// parent.
    fn unproject(&self, doc: &mut Document, node: NodeId);

    /// Re-apply record-derived side effects (e.g. the comment indicator)
    /// after the record was mutated.
    fn refresh(&self, doc: &mut Document, record: &R, node: NodeId) {
        let _ = (doc, record, node);
    }
}

/// First child element carrying the given class attribute.
pub(crate) fn child_with_class(doc: &Document, parent: NodeId, class: &str) -> Option<NodeId> {
    doc.children(parent)
        .iter()
        .copied()
        .find(|&c| doc.attr(c, "class") == Some(class))
}
