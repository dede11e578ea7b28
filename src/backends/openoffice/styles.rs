//! Fixed boilerplate and style-name tables for the OpenOffice writer. The paragraph and
//! character styles named here are defined by the style sheet of the target document
//! template, not by this crate.

/// Opening boilerplate of the content stream, up to and including `<office:body>`.
pub const CONTENT_HEADER: &str = include_str!("../../../templates/openoffice/content-header.xml");

/// Closing boilerplate of the content stream.
pub const CONTENT_FOOTER: &str = include_str!("../../../templates/openoffice/content-footer.xml");

/// Title styles by section depth. Only four section levels are supported.
pub const SECTION_STYLES: [&str; 4] = [".ch title", ".head 1", ".head 2", ".head 3alone"];

pub const END_PARA: &str = "\n</text:p>\n";
pub const END_CHARSTYLE: &str = "</text:span>";
pub const LINE_BREAK: &str = "\n<text:line-break/>";

pub fn start_para(style: &str) -> String {
    format!("\n<text:p text:style-name=\"{}\">\n", style)
}

pub fn start_charstyle(style: &str) -> String {
    format!("<text:span text:style-name=\"{}\">", style)
}

/// Counted space-run marker replacing runs of two or more spaces.
pub fn space_run(count: usize) -> String {
    format!("<text:s text:c=\"{}\"/>", count)
}

/// A `META-INF/manifest.xml` entry for an embedded picture; collected during rendering
/// and consumed by the external packaging step.
pub fn manifest_entry(media_type: &str, name: &str) -> String {
    format!(
        "<manifest:file-entry manifest:media-type=\"{}\" manifest:full-path=\"Pictures/{}\"/>\n",
        media_type, name
    )
}
