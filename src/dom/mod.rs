//! Document model
//!
//! An arena-backed mutable tree standing in for the host page's DOM. Anchor
//! paths index into this arena; all annotation tree surgery goes through
//! [`Document`] methods so sibling and text-node bookkeeping stays
//! centralized.

mod node;
mod parse;
mod serialize;

pub use node::{DomRange, Document, NodeData, NodeId, SplitResult};
pub use parse::{parse_document, parse_fragment, MarkupError};
pub use serialize::{serialize_document, serialize_node};
