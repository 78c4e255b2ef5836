//! Marginalia Server Library
//!
//! Core engine for durable web-page annotations: structural anchor paths,
//! best-effort re-resolution against a reparsed page, and per-page record
//! stores synchronized with a key-value persistence gateway. The server
//! binary is in main.rs.
//!
//! # Modules
//!
//! - `dom`: arena-backed document tree (parse, mutate, serialize)
//! - `anchor`: path codec and anchor resolver
//! - `annotations`: record types and export shapes
//! - `store`: the generalized annotation store engine
//! - `projector`: record materialization into the document
//! - `storage`: persistence gateway (SQLite, in-memory)
//! - `textgen`: external summarization / diagram-generation client

pub mod anchor;
pub mod annotations;
pub mod commands;
pub mod config;
pub mod dom;
pub mod error;
pub mod page;
pub mod projector;
pub mod routes;
pub mod session;
pub mod settings;
pub mod state;
pub mod storage;
pub mod store;
pub mod textgen;
