use std::fs;

use oowriter::backends::openoffice::images::{ImageInfo, ImageInspector};
use oowriter::backends::openoffice::styles::{CONTENT_FOOTER, CONTENT_HEADER};
use oowriter::backends::openoffice::{OpenOfficeOutput, render_openoffice_with};
use oowriter::errors::ImageReadError;
use oowriter::graph::nodes::Document;

/// Hands back the same metadata for every uri, so tree fixtures don't need image files
/// on disk.
pub struct StubInspector(pub ImageInfo);

impl ImageInspector for StubInspector {
    fn inspect(&self, _uri: &str) -> Result<ImageInfo, ImageReadError> {
        Ok(self.0)
    }
}

pub fn stub_png() -> StubInspector {
    StubInspector(ImageInfo {
        format: image::ImageFormat::Png,
        width: 960,
        height: 480,
    })
}

pub fn render(doc: &Document) -> OpenOfficeOutput {
    render_openoffice_with(doc, &stub_png()).expect("Error rendering document")
}

/// Renders and strips the fixed boilerplate, leaving just the emitted body fragments.
pub fn render_body(doc: &Document) -> String {
    let rendered = render(doc);
    body_of(&rendered.content)
}

pub fn body_of(content: &str) -> String {
    content
        .strip_prefix(CONTENT_HEADER)
        .expect("Missing content header")
        .strip_suffix(CONTENT_FOOTER)
        .expect("Missing content footer")
        .to_string()
}

pub fn load_document(json_fn: &str) -> Document {
    let test_dir = "tests/data/";
    serde_json::from_str(
        &fs::read_to_string(format!("{}{}", test_dir, json_fn)).expect("Unable to find tree json"),
    )
    .expect("Unable to parse tree json")
}

pub fn assert_rendered_doc_matches_expected(json_fn: &str, xml_fn: &str) {
    let test_dir = "tests/data/";
    let body = render_body(&load_document(json_fn));
    let expected =
        fs::read_to_string(format!("{}{}", test_dir, xml_fn)).expect("Unable to find expected xml");
    assert_eq!(body, expected);
}
