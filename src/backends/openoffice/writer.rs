use image::ImageFormat;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::RenderError;
use crate::graph::nodes::{AttrValue, Document, Element, Node, NodeKind};

use super::images::ImageInspector;
use super::styles::{self, END_CHARSTYLE, END_PARA, LINE_BREAK, start_charstyle, start_para};
use super::{OpenOfficeOutput, Picture};

static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new("  +").unwrap());
static RE_ANNOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\d+(?:, #\d+)*$").unwrap());

/// Walks a document tree depth-first and appends markup fragments to an output buffer.
///
/// All state here is scoped to a single render call: construct a fresh writer per
/// document, call [`render`](Self::render), discard. The list/paragraph flags and the
/// paragraph-style stack are each set and cleared by the node that owns them, so they
/// never leak across siblings.
pub struct OpenOfficeWriter<'a> {
    body: Vec<String>,
    para_styles: Vec<&'static str>,
    section_level: usize,
    skip_para_tag: bool,
    in_bullet_list: bool,
    in_enum_list: bool,
    in_thead: bool,
    /// Set after a block element (title, list, figure, quote, admonition) so the next
    /// `.body` paragraph takes the `.body1` first-paragraph style.
    body_one: bool,
    colspecs: Vec<i64>,
    colgroup_pending: bool,
    pictures: Vec<Picture>,
    footnotes: Vec<&'a Element>,
    inspector: &'a dyn ImageInspector,
}

impl<'a> OpenOfficeWriter<'a> {
    pub fn new(inspector: &'a dyn ImageInspector) -> Self {
        OpenOfficeWriter {
            body: vec![],
            para_styles: vec![".body"],
            section_level: 0,
            skip_para_tag: false,
            in_bullet_list: false,
            in_enum_list: false,
            in_thead: false,
            body_one: false,
            colspecs: vec![],
            colgroup_pending: false,
            pictures: vec![],
            footnotes: vec![],
            inspector,
        }
    }

    /// Renders the whole document: fixed header, emitted body, fixed footer.
    pub fn render(mut self, doc: &'a Document) -> Result<OpenOfficeOutput, RenderError> {
        self.footnotes = doc.autofootnotes();
        for node in &doc.children {
            self.render_node(node)?;
        }
        let mut content = String::from(styles::CONTENT_HEADER);
        content.push_str(&self.body.concat());
        content.push_str(styles::CONTENT_FOOTER);
        Ok(OpenOfficeOutput {
            content,
            pictures: self.pictures,
        })
    }

    fn render_node(&mut self, node: &'a Node) -> Result<(), RenderError> {
        match node {
            Node::Text(text) => {
                self.body.push(encode(text));
                Ok(())
            }
            Node::Element(element) => self.render_element(element),
        }
    }

    fn render_children(&mut self, el: &'a Element) -> Result<(), RenderError> {
        for child in &el.children {
            self.render_node(child)?;
        }
        Ok(())
    }

    fn render_element(&mut self, el: &'a Element) -> Result<(), RenderError> {
        match el.kind {
            NodeKind::Paragraph => {
                let text = el.astext();
                let mut style = self.para_styles.last().copied().unwrap_or(".body");
                if self.in_bullet_list {
                    style = ".bullet";
                } else if self.in_enum_list {
                    style = ".numlist";
                } else if text.starts_with("(annotation)") {
                    style = ".code NOTATION";
                } else if (self.body_one || text.starts_with('#')) && style == ".body" {
                    style = ".body1";
                    self.body_one = false;
                }
                if !self.skip_para_tag {
                    self.body.push(start_para(style));
                }
                self.render_children(el)?;
                if !self.skip_para_tag {
                    self.body.push(END_PARA.to_string());
                }
            }

            NodeKind::BlockQuote => {
                self.skip_para_tag = true;
                self.body.push(start_para(".quotes"));
                self.render_children(el)?;
                self.body.push(END_PARA.to_string());
                self.skip_para_tag = false;
                self.body_one = true;
            }

            NodeKind::BulletList => {
                self.in_bullet_list = true;
                self.body
                    .push("\n<text:unordered-list text:style-name=\"BulletList\">\n".to_string());
                self.render_children(el)?;
                self.body.push("</text:unordered-list>\n".to_string());
                self.in_bullet_list = false;
                self.body_one = true;
            }

            NodeKind::EnumeratedList => {
                self.in_enum_list = true;
                self.body
                    .push("\n<text:ordered-list text:style-name=\"NumberedList\">\n".to_string());
                self.render_children(el)?;
                self.body.push("</text:ordered-list>\n".to_string());
                self.in_enum_list = false;
                self.body_one = true;
            }

            NodeKind::ListItem => {
                self.body.push("<text:list-item>".to_string());
                self.render_children(el)?;
                self.body.push("</text:list-item>\n".to_string());
            }

            NodeKind::Section => {
                self.section_level += 1;
                self.body_one = true;
                self.render_children(el)?;
                self.section_level -= 1;
                self.body_one = true;
            }

            NodeKind::Title => {
                // section depths are 1-indexed; a document-level title takes the
                // chapter style as well
                let style = styles::SECTION_STYLES
                    .get(self.section_level.saturating_sub(1))
                    .ok_or(RenderError::SectionDepth {
                        max: styles::SECTION_STYLES.len(),
                        line: el.line.unwrap_or(0),
                    })?;
                self.body.push(start_para(style));
                self.render_children(el)?;
                self.body.push(END_PARA.to_string());
            }

            NodeKind::LiteralBlock | NodeKind::DoctestBlock => self.render_literal_block(el),

            NodeKind::LineBlock => {
                self.body.push(start_para(".quotes"));
                let text = encode(&el.astext());
                let lines: Vec<&str> = text.split('\n').collect();
                self.body.push(lines.join(LINE_BREAK));
                self.body.push(END_PARA.to_string());
            }

            NodeKind::Emphasis => {
                self.body.push(start_charstyle("italic"));
                self.render_children(el)?;
                self.body.push(END_CHARSTYLE.to_string());
            }

            NodeKind::Literal => {
                self.body.push(start_charstyle("code"));
                self.render_children(el)?;
                self.body.push(END_CHARSTYLE.to_string());
            }

            NodeKind::Strong => {
                self.body.push("<strong>".to_string());
                self.render_children(el)?;
                self.body.push("</strong>".to_string());
            }

            NodeKind::FootnoteReference => self.render_footnote_reference(el)?,

            NodeKind::Citation => {
                // backreference generation has never been implemented for this writer
                warn!("footnote backrefs not available");
            }

            NodeKind::Image => self.render_image(el)?,

            NodeKind::Figure => {
                self.body.push(start_para(".figure"));
                self.render_children(el)?;
                self.body.push(END_PARA.to_string());
                self.body_one = true;
            }

            NodeKind::Attention
            | NodeKind::Caution
            | NodeKind::Error
            | NodeKind::Hint
            | NodeKind::Important
            | NodeKind::Note
            | NodeKind::Tip
            | NodeKind::Warning => {
                self.skip_para_tag = false;
                self.para_styles.push(".CALLOUT");
                self.render_children(el)?;
                self.para_styles.pop();
                self.body_one = true;
            }

            NodeKind::Table => {
                self.body
                    .push("<table class=\"table\" frame=\"border\" rules=\"all\">\n".to_string());
                self.render_children(el)?;
                self.body.push("</table>\n".to_string());
            }

            NodeKind::Tgroup => {
                // the column group waits for the colspec children; it is written out
                // when the header or body section begins
                self.colgroup_pending = true;
                self.render_children(el)?;
            }

            NodeKind::Colspec => {
                self.colspecs.push(el.attr_int("colwidth").unwrap_or(0));
            }

            NodeKind::Thead => {
                self.flush_colgroup();
                self.body.push("<thead valign=\"bottom\">\n".to_string());
                self.in_thead = true;
                self.render_children(el)?;
                self.in_thead = false;
                self.body.push("</thead>\n".to_string());
            }

            NodeKind::Tbody => {
                self.flush_colgroup();
                self.body.push("<tbody valign=\"top\">\n".to_string());
                self.render_children(el)?;
                self.body.push("</tbody>\n".to_string());
            }

            NodeKind::Row => {
                self.body.push("<tr>".to_string());
                self.render_children(el)?;
                self.body.push("</tr>\n".to_string());
            }

            NodeKind::Entry => {
                let tag = if self.in_thead { "th" } else { "td" };
                let mut open = format!("<{}", tag);
                if let Some(morerows) = el.attr_int("morerows") {
                    open.push_str(&format!(" rowspan=\"{}\"", morerows + 1));
                }
                if let Some(morecols) = el.attr_int("morecols") {
                    open.push_str(&format!(" colspan=\"{}\"", morecols + 1));
                }
                open.push('>');
                self.body.push(open);
                if el.children.is_empty() {
                    self.body.push("&nbsp;".to_string());
                }
                self.render_children(el)?;
                self.body.push(format!("</{}>\n", tag));
            }

            NodeKind::IndexEntry => {
                self.body.push(start_para(".body"));
                for entry in el.astext().split('\n') {
                    self.body.push(format!(
                        "<text:alphabetical-index-mark text:string-value=\"{}\"/>\n",
                        encode(entry)
                    ));
                }
                self.body.push(END_PARA.to_string());
            }

            NodeKind::Interpreted => {
                self.body.push(encode(&el.astext()));
            }

            NodeKind::Raw => {
                if el.attr_str("format") == Some("openoffice") {
                    self.body.push(el.astext());
                }
            }

            NodeKind::Topic => {
                // a "contents" topic is the table-of-contents placeholder; drop it
                if el.attr_str("class") != Some("contents") {
                    self.render_children(el)?;
                }
            }

            NodeKind::SystemMessage => {
                warn!("{}", el.astext());
            }

            // rendered at the point(s) of reference, nothing to do at the definition
            NodeKind::Footnote => {}

            NodeKind::Comment | NodeKind::Docinfo | NodeKind::Label => {}

            // transparent: no markup of their own, children rendered in place
            NodeKind::Author
            | NodeKind::Authors
            | NodeKind::Caption
            | NodeKind::Date
            | NodeKind::Decoration
            | NodeKind::Generated
            | NodeKind::Legend
            | NodeKind::Reference
            | NodeKind::Revision
            | NodeKind::Target => self.render_children(el)?,

            NodeKind::Abbreviation
            | NodeKind::Acronym
            | NodeKind::Address
            | NodeKind::CitationReference
            | NodeKind::Classifier
            | NodeKind::Contact
            | NodeKind::Copyright
            | NodeKind::Definition
            | NodeKind::DefinitionList
            | NodeKind::DefinitionListItem
            | NodeKind::Description
            | NodeKind::Field
            | NodeKind::FieldBody
            | NodeKind::FieldList
            | NodeKind::FieldName
            | NodeKind::Footer
            | NodeKind::Header
            | NodeKind::Option
            | NodeKind::OptionArgument
            | NodeKind::OptionGroup
            | NodeKind::OptionList
            | NodeKind::OptionListItem
            | NodeKind::OptionString
            | NodeKind::Organization
            | NodeKind::Pending
            | NodeKind::Problematic
            | NodeKind::Rubric
            | NodeKind::Sidebar
            | NodeKind::Status
            | NodeKind::SubstitutionDefinition
            | NodeKind::SubstitutionReference
            | NodeKind::Subtitle
            | NodeKind::Term
            | NodeKind::TitleReference
            | NodeKind::Transition
            | NodeKind::Version => {
                return Err(RenderError::UnsupportedNode {
                    kind: el.kind.to_string(),
                    line: el.line.unwrap_or(0),
                    text: el.astext(),
                });
            }
        }
        Ok(())
    }

    /// Code blocks render line by line, bracketed by empty first/last-line paragraphs so
    /// the style sheet can control the spacing around the block.
    fn render_literal_block(&mut self, el: &'a Element) {
        self.body.push(start_para(".code first"));
        self.body.push(END_PARA.to_string());
        let text = encode(&el.astext());
        let mut lines: Vec<&str> = text.split('\n').collect();
        while lines.last() == Some(&"") {
            lines.pop();
        }
        for line in lines {
            self.body.push(start_para(".code"));
            let line = fix_annotation(line);
            let line = compress_spaces(&line);
            self.body.push(line);
            self.body.push(END_PARA.to_string());
        }
        self.body.push(start_para(".code last"));
        self.body.push(END_PARA.to_string());
        self.body_one = true;
    }

    /// A footnote reference carries no body of its own: the matching auto-numbered
    /// definition is rendered inline, in full, at every reference site.
    fn render_footnote_reference(&mut self, el: &'a Element) -> Result<(), RenderError> {
        let name = require_str(el, "refid")?;
        let id = require_str(el, "id")?;
        let number = require_attr(el, "auto")?;
        let Some(footnote) = self
            .footnotes
            .iter()
            .copied()
            .find(|footnote| footnote.attr_str("name") == Some(name))
        else {
            warn!("no auto-numbered footnote found for reference \"{}\"", name);
            return Ok(());
        };
        self.body.push(format!("<text:footnote text:id=\"{}\">\n", id));
        self.body.push(format!(
            "<text:footnote-citation text:string-value=\"{}\"/>\n",
            number
        ));
        self.body.push("<text:footnote-body>\n".to_string());
        self.body.push(start_para(".body"));
        for child in &footnote.children {
            if let Node::Element(child_el) = child {
                if child_el.kind == NodeKind::Paragraph {
                    self.body.push(encode(&child_el.astext()));
                }
            }
        }
        self.body.push(END_PARA.to_string());
        self.body.push("</text:footnote-body>\n".to_string());
        self.body.push("</text:footnote>".to_string());
        Ok(())
    }

    fn render_image(&mut self, el: &'a Element) -> Result<(), RenderError> {
        let uri = require_str(el, "uri")?.to_string();
        let info = self
            .inspector
            .inspect(&uri)
            .map_err(|source| RenderError::ImageRead {
                uri: uri.clone(),
                source,
            })?;
        let (width, height) = info.physical_size(el.attr_int("scale"));
        match info.format {
            ImageFormat::Png => self.pictures.push(Picture {
                source: uri.clone(),
                manifest_entry: styles::manifest_entry("image/png", &uri),
            }),
            ImageFormat::Tiff => self.pictures.push(Picture {
                source: uri.clone(),
                manifest_entry: styles::manifest_entry("image/tiff", &uri),
            }),
            other => warn!("image format {:?} not recognized: {}", other, uri),
        }
        self.body.push("<draw:image draw:style-name=\"image\"\n".to_string());
        self.body.push(format!("draw:name=\"{}\"\n", uri));
        self.body.push("text:anchor-type=\"char\"\n".to_string());
        self.body.push(format!("svg:width=\"{:.2}inch\"\n", width));
        self.body.push(format!("svg:height=\"{:.2}inch\"\n", height));
        self.body.push("draw:z-index=\"0\"\n".to_string());
        self.body.push(format!("xlink:href=\"#Pictures/{}\"\n", uri));
        self.body.push("xlink:type=\"simple\"\n".to_string());
        self.body.push("xlink:show=\"embed\"\n".to_string());
        self.body.push("xlink:actuate=\"onLoad\"/>".to_string());
        self.body.push("Figure X.X\n".to_string());
        self.render_children(el)
    }

    /// Emits the deferred column group once all colspec widths are known. Each column
    /// gets its width as a rounded percentage of the total.
    fn flush_colgroup(&mut self) {
        if !self.colgroup_pending {
            return;
        }
        self.body.push("<colgroup>\n".to_string());
        let total: i64 = self.colspecs.iter().sum();
        if total > 0 {
            for width in &self.colspecs {
                let percent = (*width as f64 * 100.0 / total as f64 + 0.5) as i64;
                self.body.push(format!("<col colwidth=\"{}%\" />\n", percent));
            }
        }
        self.body.push("</colgroup>\n".to_string());
        self.colspecs.clear();
        self.colgroup_pending = false;
    }
}

fn require_attr<'b>(el: &'b Element, name: &str) -> Result<&'b AttrValue, RenderError> {
    el.attr(name).ok_or_else(|| RenderError::MissingAttribute {
        kind: el.kind.to_string(),
        attribute: name.to_string(),
    })
}

fn require_str<'b>(el: &'b Element, name: &str) -> Result<&'b str, RenderError> {
    el.attr_str(name).ok_or_else(|| RenderError::MissingAttribute {
        kind: el.kind.to_string(),
        attribute: name.to_string(),
    })
}

/// Entity-escapes text content. `&` goes first so the other replacements cannot be
/// double-escaped.
pub fn encode(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
        .replace('>', "&gt;")
}

/// Replaces every run of two or more spaces with a counted space-run marker.
fn compress_spaces(line: &str) -> String {
    RE_SPACES
        .replace_all(line, |captures: &regex::Captures| {
            styles::space_run(captures[0].len())
        })
        .into_owned()
}

/// Inserts a separator before a trailing `#N[, #N...]` reference marker on code lines.
fn fix_annotation(line: &str) -> String {
    match RE_ANNOTATION.find(line) {
        Some(found) => format!("{}|{}", &line[..found.start()], &line[found.start()..]),
        None => line.to_string(),
    }
}
