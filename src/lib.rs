//! Rendering of document trees as OpenOffice.org 1.0 Writer markup.
//!
//! This crate is a format-specific backend for a document-processing pipeline: the
//! pipeline's parser produces an abstract document tree (see [`graph`]), and this crate
//! walks that tree and emits the markup that goes into the `content.xml` stream of an
//! OpenOffice.org 1.0 (`.sxw`) document. Parsing the source language, zipping up the
//! final container, and authoring the style sheet the emitted style names refer to are
//! all the caller's business.
//!
//! Notable limitations, inherited from the documents this writer was built for:
//!
//! - Only four section levels are supported.
//! - Footnote backreference generation is not implemented.
//! - Only PNG and TIFF images make it into the packaging manifest (other formats still
//!   render a placeholder, with a warning).
//!
//! Typical use:
//!
//! ```no_run
//! use oowriter::backends::openoffice::render_openoffice;
//! use oowriter::graph::nodes::Document;
//!
//! let doc: Document = serde_json::from_str(r#"{"children": []}"#).unwrap();
//! let rendered = render_openoffice(&doc).unwrap();
//! println!("{}", rendered.content);
//! ```

pub mod backends;
pub mod errors;
pub mod graph;
