//! This module contains the document tree handed to the backends, a direct encoding of
//! the document-object model produced by the upstream processing pipeline: a root
//! [`Document`](nodes::Document) over [`Node`](nodes::Node)s, each carrying a kind tag,
//! ordered children, and named attributes. All elements are serializeable with `serde`,
//! which gives us JSON fixtures for the data-driven tests and a cheap debugging dump.

pub mod nodes;
