//! Anchor resolution
//!
//! Turns stored anchors back into live document positions. Both endpoints of
//! a range anchor decode independently; if either fails the whole resolution
//! fails. Offsets are not validated here: a later projection failure is
//! handled identically to a decode failure (drop the record, never panic
//! past this boundary).

use crate::dom::{Document, DomRange, NodeId};

use super::codec::decode;
use super::types::{PointAnchor, RangeAnchor};

/// Resolve a range anchor into a live range, or `None` if the document no
/// longer matches.
pub fn resolve_range(doc: &Document, anchor: &RangeAnchor) -> Option<DomRange> {
    let start = decode(doc, &anchor.start_path)?;
    let end = decode(doc, &anchor.end_path)?;
    Some(DomRange {
        start,
        start_offset: anchor.start_offset,
        end,
        end_offset: anchor.end_offset,
    })
}

/// Resolve a single-point anchor into its anchor node.
pub fn resolve_point(doc: &Document, anchor: &PointAnchor) -> Option<NodeId> {
    decode(doc, &anchor.path)
}
