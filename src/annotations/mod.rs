//! Annotation records
//!
//! Data model for persisted annotations: highlights and inserted
//! visualizations, plus the reduced export shapes used by UI listings.

mod types;

pub use types::{
    Comments, HighlightColor, HighlightRecord, HighlightSummary, RecordKind, VisualizationRecord,
    VisualizationSummary,
};
