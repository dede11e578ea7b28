use std::collections::HashMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The document vocabulary understood by the backends. These tags mirror the node names
/// used by the upstream document-object model, so a tree serialized by the pipeline
/// deserializes directly into [`Node`]s.
///
/// The set is closed: every kind appears here, whether or not a given backend can render
/// it, so backend dispatch can be an exhaustive match and a missing handler is a compile
/// error rather than a runtime surprise.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Abbreviation,
    Acronym,
    Address,
    Attention,
    Author,
    Authors,
    BlockQuote,
    BulletList,
    Caption,
    Caution,
    Citation,
    CitationReference,
    Classifier,
    Colspec,
    Comment,
    Contact,
    Copyright,
    Date,
    Decoration,
    Definition,
    DefinitionList,
    DefinitionListItem,
    Description,
    Docinfo,
    DoctestBlock,
    Emphasis,
    Entry,
    EnumeratedList,
    Error,
    Field,
    FieldBody,
    FieldList,
    FieldName,
    Figure,
    Footer,
    Footnote,
    FootnoteReference,
    Generated,
    Header,
    Hint,
    Image,
    Important,
    IndexEntry,
    Interpreted,
    Label,
    Legend,
    LineBlock,
    ListItem,
    Literal,
    LiteralBlock,
    Note,
    Option,
    OptionArgument,
    OptionGroup,
    OptionList,
    OptionListItem,
    OptionString,
    Organization,
    Paragraph,
    Pending,
    Problematic,
    Raw,
    Reference,
    Revision,
    Row,
    Rubric,
    Section,
    Sidebar,
    Status,
    Strong,
    SubstitutionDefinition,
    SubstitutionReference,
    Subtitle,
    SystemMessage,
    Table,
    Target,
    Tbody,
    Term,
    Tgroup,
    Thead,
    Tip,
    Title,
    TitleReference,
    Topic,
    Transition,
    Version,
    Warning,
}

impl NodeKind {
    /// The upstream (snake_case) tag name, as it appears in serialized trees.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Abbreviation => "abbreviation",
            NodeKind::Acronym => "acronym",
            NodeKind::Address => "address",
            NodeKind::Attention => "attention",
            NodeKind::Author => "author",
            NodeKind::Authors => "authors",
            NodeKind::BlockQuote => "block_quote",
            NodeKind::BulletList => "bullet_list",
            NodeKind::Caption => "caption",
            NodeKind::Caution => "caution",
            NodeKind::Citation => "citation",
            NodeKind::CitationReference => "citation_reference",
            NodeKind::Classifier => "classifier",
            NodeKind::Colspec => "colspec",
            NodeKind::Comment => "comment",
            NodeKind::Contact => "contact",
            NodeKind::Copyright => "copyright",
            NodeKind::Date => "date",
            NodeKind::Decoration => "decoration",
            NodeKind::Definition => "definition",
            NodeKind::DefinitionList => "definition_list",
            NodeKind::DefinitionListItem => "definition_list_item",
            NodeKind::Description => "description",
            NodeKind::Docinfo => "docinfo",
            NodeKind::DoctestBlock => "doctest_block",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Entry => "entry",
            NodeKind::EnumeratedList => "enumerated_list",
            NodeKind::Error => "error",
            NodeKind::Field => "field",
            NodeKind::FieldBody => "field_body",
            NodeKind::FieldList => "field_list",
            NodeKind::FieldName => "field_name",
            NodeKind::Figure => "figure",
            NodeKind::Footer => "footer",
            NodeKind::Footnote => "footnote",
            NodeKind::FootnoteReference => "footnote_reference",
            NodeKind::Generated => "generated",
            NodeKind::Header => "header",
            NodeKind::Hint => "hint",
            NodeKind::Image => "image",
            NodeKind::Important => "important",
            NodeKind::IndexEntry => "index_entry",
            NodeKind::Interpreted => "interpreted",
            NodeKind::Label => "label",
            NodeKind::Legend => "legend",
            NodeKind::LineBlock => "line_block",
            NodeKind::ListItem => "list_item",
            NodeKind::Literal => "literal",
            NodeKind::LiteralBlock => "literal_block",
            NodeKind::Note => "note",
            NodeKind::Option => "option",
            NodeKind::OptionArgument => "option_argument",
            NodeKind::OptionGroup => "option_group",
            NodeKind::OptionList => "option_list",
            NodeKind::OptionListItem => "option_list_item",
            NodeKind::OptionString => "option_string",
            NodeKind::Organization => "organization",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Pending => "pending",
            NodeKind::Problematic => "problematic",
            NodeKind::Raw => "raw",
            NodeKind::Reference => "reference",
            NodeKind::Revision => "revision",
            NodeKind::Row => "row",
            NodeKind::Rubric => "rubric",
            NodeKind::Section => "section",
            NodeKind::Sidebar => "sidebar",
            NodeKind::Status => "status",
            NodeKind::Strong => "strong",
            NodeKind::SubstitutionDefinition => "substitution_definition",
            NodeKind::SubstitutionReference => "substitution_reference",
            NodeKind::Subtitle => "subtitle",
            NodeKind::SystemMessage => "system_message",
            NodeKind::Table => "table",
            NodeKind::Target => "target",
            NodeKind::Tbody => "tbody",
            NodeKind::Term => "term",
            NodeKind::Tgroup => "tgroup",
            NodeKind::Thead => "thead",
            NodeKind::Tip => "tip",
            NodeKind::Title => "title",
            NodeKind::TitleReference => "title_reference",
            NodeKind::Topic => "topic",
            NodeKind::Transition => "transition",
            NodeKind::Version => "version",
            NodeKind::Warning => "warning",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An attribute value: the upstream model only ever stores strings, smallish integers,
/// or lists of strings (e.g. the `names` attribute).
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::Int(value) => write!(f, "{}", value),
            AttrValue::Str(value) => write!(f, "{}", value),
            AttrValue::List(values) => write!(f, "{}", values.join(" ")),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

/// A tree node: either raw text or an element with a kind, attributes and children.
/// Serialized trees represent text nodes as plain JSON strings.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A non-text node of the document tree.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Element {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, AttrValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    /// 1-indexed source line, when the pipeline recorded one; used in error reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Element {
    pub fn new(kind: NodeKind) -> Self {
        Element {
            kind,
            attributes: HashMap::new(),
            children: vec![],
            line: None,
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_child(Node::text(text))
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        match self.attributes.get(name)? {
            AttrValue::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Integer attribute access; tolerates integers that arrive as strings, which
    /// happens for attributes like `scale` depending on the producing pipeline.
    pub fn attr_int(&self, name: &str) -> Option<i64> {
        match self.attributes.get(name)? {
            AttrValue::Int(value) => Some(*value),
            AttrValue::Str(value) => value.parse().ok(),
            AttrValue::List(_) => None,
        }
    }

    /// Concatenation of all descendant text, in document order.
    pub fn astext(&self) -> String {
        let mut text = String::new();
        collect_text(&self.children, &mut text);
        text
    }
}

fn collect_text(nodes: &[Node], into: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => into.push_str(text),
            Node::Element(element) => collect_text(&element.children, into),
        }
    }
}

/// The document root. Owned by the caller and immutable during rendering; a backend
/// takes `&Document` and never hands it back changed.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Document {
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Document { children }
    }

    /// All auto-numbered footnote definitions, in document order. Footnote references
    /// are resolved against this list by name at the point of reference.
    pub fn autofootnotes(&self) -> Vec<&Element> {
        let mut found = vec![];
        collect_autofootnotes(&self.children, &mut found);
        found
    }
}

fn collect_autofootnotes<'a>(nodes: &'a [Node], into: &mut Vec<&'a Element>) {
    for node in nodes {
        if let Node::Element(element) = node {
            if element.kind == NodeKind::Footnote && element.attr("auto").is_some() {
                into.push(element);
            }
            collect_autofootnotes(&element.children, into);
        }
    }
}
