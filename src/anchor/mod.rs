//! Anchor module
//!
//! Durable, serializable positions in a document, re-resolvable after the
//! page is reloaded and reparsed.
//!
//! # Overview
//!
//! An anchor path addresses a node structurally, never by content:
//!
//! ```text
//! /html[1]/body[1]/p[2]/text()[1]
//!  │       │       │    └── 1st text-node child
//!  │       │       └─────── 2nd <p> (same-tag siblings only)
//!  │       └─────────────── 1st <body>
//!  └─────────────────────── 1st <html>
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use crate::anchor::{encode, decode, resolve_range, RangeAnchor};
//!
//! // Encode a live node
//! let path = encode(&doc, text_node).unwrap();
//!
//! // Parse a stored path string
//! let path: NodePath = "/html[1]/body[1]/p[2]/text()[1]".parse().unwrap();
//!
//! // Resolve a stored range against a fresh parse of the same page
//! let range = resolve_range(&doc, &anchor);
//! ```

mod codec;
mod parser;
mod resolver;
mod types;

// Re-export main types
pub use types::{NodePath, PathStep, PointAnchor, RangeAnchor, TextStep};

// Re-export parser functions
pub use parser::{parse, PathParseError};

// Re-export codec and resolver
pub use codec::{decode, encode};
pub use resolver::{resolve_point, resolve_range};
