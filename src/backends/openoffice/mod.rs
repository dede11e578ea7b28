//! This module renders a document tree as OpenOffice.org 1.0 Writer markup: the body of
//! a `content.xml` stream bracketed by fixed boilerplate, plus the manifest entries for
//! any embedded pictures. Packaging the result into an `.sxw` zip container is the
//! caller's job.

pub mod images;
pub mod styles;
pub mod writer;

use crate::errors::RenderError;
use crate::graph::nodes::Document;

use self::images::{FsImageInspector, ImageInspector};
use self::writer::OpenOfficeWriter;

/// A picture referenced by the rendered document, for the packaging manifest.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Picture {
    /// The source filename, as given in the tree's `uri` attribute.
    pub source: String,
    /// The ready-made `manifest.xml` entry for this picture.
    pub manifest_entry: String,
}

/// The complete render result: one content stream and the picture side channel.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OpenOfficeOutput {
    pub content: String,
    pub pictures: Vec<Picture>,
}

/// Renders the document, reading image metadata from the filesystem.
pub fn render_openoffice(doc: &Document) -> Result<OpenOfficeOutput, RenderError> {
    render_openoffice_with(doc, &FsImageInspector)
}

/// Renders the document with a caller-supplied image-metadata reader.
pub fn render_openoffice_with(
    doc: &Document,
    inspector: &dyn ImageInspector,
) -> Result<OpenOfficeOutput, RenderError> {
    OpenOfficeWriter::new(inspector).render(doc)
}
