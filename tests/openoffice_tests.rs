pub mod common;

use common::{assert_rendered_doc_matches_expected, render_body};

use oowriter::errors::RenderError;
use oowriter::graph::nodes::{Document, Element, Node, NodeKind};

use rstest::rstest;

fn section_with_title(title: &str, children: Vec<Node>) -> Element {
    let mut section = Element::new(NodeKind::Section)
        .with_child(Element::new(NodeKind::Title).with_text(title));
    section.children.extend(children);
    section
}

#[test]
fn basic_document() {
    assert_rendered_doc_matches_expected("documents/basic.json", "documents/basic.xml");
}

#[rstest]
#[case(1, ".ch title")]
#[case(2, ".head 1")]
#[case(3, ".head 2")]
#[case(4, ".head 3alone")]
fn title_style_follows_section_depth(#[case] depth: usize, #[case] style: &str) {
    let mut element = section_with_title("Innermost", vec![]);
    for _ in 1..depth {
        element = Element::new(NodeKind::Section).with_child(element);
    }
    let body = render_body(&Document::new(vec![element.into()]));
    assert!(
        body.contains(&format!("<text:p text:style-name=\"{}\">", style)),
        "depth {} should use {}: {}",
        depth,
        style,
        body
    );
}

#[test]
fn sibling_sections_use_the_same_title_style() {
    let doc = Document::new(vec![
        section_with_title("First", vec![]).into(),
        section_with_title("Second", vec![]).into(),
    ]);
    let body = render_body(&doc);
    assert_eq!(body.matches("text:style-name=\".ch title\"").count(), 2);
}

#[test]
fn five_section_levels_are_out_of_range() {
    let mut element = section_with_title("Too deep", vec![]);
    for _ in 1..5 {
        element = Element::new(NodeKind::Section).with_child(element);
    }
    let doc = Document::new(vec![element.into()]);
    let err = oowriter::backends::openoffice::render_openoffice_with(&doc, &common::stub_png())
        .unwrap_err();
    assert!(matches!(err, RenderError::SectionDepth { max: 4, .. }));
}

#[test]
fn block_quote_suppresses_inner_paragraph_tags() {
    let doc = Document::new(vec![
        Element::new(NodeKind::BlockQuote)
            .with_child(Element::new(NodeKind::Paragraph).with_text("Quoted words."))
            .into(),
        Element::new(NodeKind::Paragraph).with_text("Back to normal.").into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:p text:style-name=\".quotes\">"));
    // the quoted paragraph contributes text only, no paragraph tag of its own
    assert_eq!(body.matches("Quoted words.").count(), 1);
    assert_eq!(body.matches("<text:p").count(), 2);
    // the paragraph after the quote takes the first-paragraph style
    assert!(body.contains("<text:p text:style-name=\".body1\">\nBack to normal."));
}

#[test]
fn enumerated_list_paragraphs_use_numlist_style() {
    let doc = Document::new(vec![
        Element::new(NodeKind::EnumeratedList)
            .with_child(
                Element::new(NodeKind::ListItem)
                    .with_child(Element::new(NodeKind::Paragraph).with_text("First")),
            )
            .into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:ordered-list text:style-name=\"NumberedList\">"));
    assert!(body.contains("<text:p text:style-name=\".numlist\">"));
    assert!(body.contains("<text:list-item>"));
}

#[test]
fn admonition_paragraphs_use_callout_style() {
    let doc = Document::new(vec![
        Element::new(NodeKind::Warning)
            .with_child(Element::new(NodeKind::Paragraph).with_text("Mind the gap."))
            .into(),
        Element::new(NodeKind::Paragraph).with_text("Continues.").into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:p text:style-name=\".CALLOUT\">\nMind the gap."));
    assert!(body.contains("<text:p text:style-name=\".body1\">\nContinues."));
}

#[test]
fn annotation_paragraphs_take_the_notation_style() {
    let doc = Document::new(vec![
        Element::new(NodeKind::Paragraph)
            .with_text("(annotation) explains the numbered callouts")
            .into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:p text:style-name=\".code NOTATION\">"));
}

#[test]
fn inline_styles_nest_inside_paragraphs() {
    let doc = Document::new(vec![
        Element::new(NodeKind::Paragraph)
            .with_text("Some ")
            .with_child(Element::new(NodeKind::Emphasis).with_text("emphatic"))
            .with_text(" and ")
            .with_child(Element::new(NodeKind::Strong).with_text("bold"))
            .with_text(" and ")
            .with_child(Element::new(NodeKind::Literal).with_text("literal"))
            .with_text(" text.")
            .into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:span text:style-name=\"italic\">emphatic</text:span>"));
    assert!(body.contains("<strong>bold</strong>"));
    assert!(body.contains("<text:span text:style-name=\"code\">literal</text:span>"));
}

#[test]
fn literal_block_renders_line_by_line() {
    let doc = Document::new(vec![
        Element::new(NodeKind::LiteralBlock)
            .with_text("def f():\n    return  1 #1\n\n")
            .into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:p text:style-name=\".code first\">"));
    assert!(body.contains("<text:p text:style-name=\".code last\">"));
    // indentation and inner runs become counted space markers; the trailing
    // reference marker gets its separator
    assert!(body.contains("<text:s text:c=\"4\"/>return<text:s text:c=\"2\"/>1 |#1"));
    // trailing blank lines are dropped
    assert_eq!(body.matches("<text:p text:style-name=\".code\">").count(), 2);
}

#[test]
fn doctest_block_renders_like_a_literal_block() {
    let doc = Document::new(vec![
        Element::new(NodeKind::DoctestBlock)
            .with_text(">>> 1 + 1\n2")
            .into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:p text:style-name=\".code first\">"));
    assert!(body.contains("&gt;&gt;&gt; 1 + 1"));
}

#[test]
fn line_block_joins_lines_with_breaks() {
    let doc = Document::new(vec![
        Element::new(NodeKind::LineBlock)
            .with_text("Roses & red\nViolets are blue")
            .into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:p text:style-name=\".quotes\">"));
    assert!(body.contains("Roses &amp; red\n<text:line-break/>Violets are blue"));
}

#[test]
fn footnote_referenced_twice_renders_identical_bodies() {
    let doc = Document::new(vec![
        Element::new(NodeKind::Footnote)
            .with_attr("name", "note1")
            .with_attr("auto", 1)
            .with_child(Element::new(NodeKind::Paragraph).with_text("The footnote text."))
            .into(),
        Element::new(NodeKind::Paragraph)
            .with_text("First")
            .with_child(
                Element::new(NodeKind::FootnoteReference)
                    .with_attr("refid", "note1")
                    .with_attr("id", "ref-1")
                    .with_attr("auto", 1),
            )
            .into(),
        Element::new(NodeKind::Paragraph)
            .with_text("Second")
            .with_child(
                Element::new(NodeKind::FootnoteReference)
                    .with_attr("refid", "note1")
                    .with_attr("id", "ref-2")
                    .with_attr("auto", 1),
            )
            .into(),
    ]);
    let body = render_body(&doc);
    assert_eq!(body.matches("The footnote text.").count(), 2);
    assert_eq!(body.matches("<text:footnote-body>").count(), 2);
    assert!(body.contains("<text:footnote text:id=\"ref-1\">"));
    assert!(body.contains("<text:footnote text:id=\"ref-2\">"));
    assert_eq!(
        body.matches("<text:footnote-citation text:string-value=\"1\"/>").count(),
        2
    );
}

#[test]
fn footnote_definition_site_emits_nothing() {
    let doc = Document::new(vec![
        Element::new(NodeKind::Footnote)
            .with_attr("name", "note1")
            .with_attr("auto", 1)
            .with_child(Element::new(NodeKind::Paragraph).with_text("Unreferenced."))
            .into(),
    ]);
    assert_eq!(render_body(&doc), "");
}

#[test]
fn index_entries_become_index_marks() {
    let doc = Document::new(vec![
        Element::new(NodeKind::IndexEntry)
            .with_text("alpha\nbeta & gamma")
            .into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:alphabetical-index-mark text:string-value=\"alpha\"/>"));
    assert!(
        body.contains("<text:alphabetical-index-mark text:string-value=\"beta &amp; gamma\"/>")
    );
}

#[test]
fn raw_passes_through_only_for_the_target_format() {
    let doc = Document::new(vec![
        Element::new(NodeKind::Raw)
            .with_attr("format", "openoffice")
            .with_text("<text:p text:style-name=\".body\">verbatim</text:p>")
            .into(),
        Element::new(NodeKind::Raw)
            .with_attr("format", "html")
            .with_text("<p>dropped</p>")
            .into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("verbatim"));
    assert!(!body.contains("dropped"));
}

#[test]
fn comments_and_contents_topics_are_dropped() {
    let doc = Document::new(vec![
        Element::new(NodeKind::Comment).with_text("internal note").into(),
        Element::new(NodeKind::Topic)
            .with_attr("class", "contents")
            .with_child(Element::new(NodeKind::Paragraph).with_text("toc entry"))
            .into(),
        Element::new(NodeKind::Topic)
            .with_child(Element::new(NodeKind::Paragraph).with_text("kept topic"))
            .into(),
    ]);
    let body = render_body(&doc);
    assert!(!body.contains("internal note"));
    assert!(!body.contains("toc entry"));
    assert!(body.contains("kept topic"));
}

#[test]
fn unsupported_node_kind_aborts_the_render() {
    let doc = Document::new(vec![
        Element::new(NodeKind::Paragraph).with_text("Fine so far.").into(),
        Element::new(NodeKind::Transition).with_line(12).into(),
    ]);
    let err = oowriter::backends::openoffice::render_openoffice_with(&doc, &common::stub_png())
        .unwrap_err();
    let RenderError::UnsupportedNode { kind, line, .. } = err else {
        panic!("expected UnsupportedNode, got {:?}", err);
    };
    assert_eq!(kind, "transition");
    assert_eq!(line, 12);
}

#[test]
fn figure_marks_the_next_paragraph_as_first() {
    let doc = Document::new(vec![
        Element::new(NodeKind::Figure)
            .with_child(Element::new(NodeKind::Caption).with_text("A caption"))
            .into(),
        Element::new(NodeKind::Paragraph).with_text("Afterwards.").into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:p text:style-name=\".figure\">"));
    assert!(body.contains("A caption"));
    assert!(body.contains("<text:p text:style-name=\".body1\">\nAfterwards."));
}

#[test]
fn hash_prefixed_paragraphs_take_the_first_paragraph_style() {
    let doc = Document::new(vec![
        Element::new(NodeKind::Paragraph).with_text("Plain lead-in.").into(),
        Element::new(NodeKind::Paragraph).with_text("# marked paragraph").into(),
    ]);
    let body = render_body(&doc);
    assert!(body.contains("<text:p text:style-name=\".body\">\nPlain lead-in."));
    assert!(body.contains("<text:p text:style-name=\".body1\">\n# marked paragraph"));
}
