use super::*;
use crate::comparison::{ComparisonType as T, ComparisonValue as V};
use crate::dom::{Document, NodeRef, QualName};
use facet_testhelpers::test;

fn at_document_element(doc: &Document) -> (Node<'_>, XPathContext) {
    let node = doc.node(doc.document_element().unwrap());
    let mut context = XPathContext::new();
    context.set_children([node]);
    context.navigate_to_child(0);
    (node, context)
}

fn compare_nodes(
    control: Node<'_>,
    control_ctx: &mut XPathContext,
    test: Node<'_>,
    test_ctx: &mut XPathContext,
    options: StrategyOptions,
) -> Vec<Comparison> {
    let mut control = NodeAndXPath::new(control, control_ctx);
    let mut test = NodeAndXPath::new(test, test_ctx);
    node_comparisons(&mut control, &mut test, options)
        .into_iter()
        .collect()
}

fn compare_elements(control: &str, test: &str, options: StrategyOptions) -> Vec<Comparison> {
    let control = Document::parse(control).unwrap();
    let test = Document::parse(test).unwrap();
    let (c, mut c_ctx) = at_document_element(&control);
    let (t, mut t_ctx) = at_document_element(&test);
    compare_nodes(c, &mut c_ctx, t, &mut t_ctx, options)
}

fn kinds(comparisons: &[Comparison]) -> Vec<ComparisonType> {
    comparisons.iter().map(|c| c.kind).collect()
}

fn differences(comparisons: &[Comparison]) -> Vec<&Comparison> {
    comparisons
        .iter()
        .filter(|c| c.control.value != c.test.value)
        .collect()
}

#[test]
fn test_element_order() {
    let comparisons = compare_elements(
        "<a x=\"1\"/>",
        "<a x=\"1\"/>",
        StrategyOptions::default(),
    );
    assert_eq!(
        kinds(&comparisons),
        [
            T::NodeType,
            T::NamespaceUri,
            T::NamespacePrefix,
            T::HasChildNodes,
            T::ElementTagName,
            T::ElementNumAttributes,
            T::AttrNameLookup,
            T::NamespaceUri,
            T::NamespacePrefix,
            T::AttrValueExplicitlySpecified,
            T::AttrValue,
            T::SchemaLocation,
            T::NoNamespaceSchemaLocation,
        ]
    );
    assert!(differences(&comparisons).is_empty());

    let value = &comparisons[10];
    assert_eq!(value.control.xpath.as_deref(), Some("/a[1]/@x"));
    assert_eq!(value.test.xpath.as_deref(), Some("/a[1]/@x"));
    assert_eq!(value.control.value, V::from("1"));
}

#[test]
fn test_child_count_comparison() {
    let comparisons = compare_elements(
        "<a><b/><c/></a>",
        "<a><c/></a>",
        StrategyOptions::default(),
    );
    let count = &comparisons[3];
    assert_eq!(count.kind, T::ChildNodelistLength);
    assert_eq!(count.control.value, V::Int(2));
    assert_eq!(count.test.value, V::Int(1));

    let comparisons = compare_elements("<a><b/></a>", "<a/>", StrategyOptions::default());
    let has = &comparisons[3];
    assert_eq!(has.kind, T::HasChildNodes);
    assert_eq!(has.control.value, V::Bool(true));
    assert_eq!(has.test.value, V::Bool(false));
}

#[test]
fn test_missing_attribute() {
    let comparisons = compare_elements(
        "<bar a=\"x\" y=\"z\"/>",
        "<bar a=\"x\"/>",
        StrategyOptions::default(),
    );
    let diffs = differences(&comparisons);
    assert_eq!(diffs.len(), 2);

    assert_eq!(diffs[0].kind, T::ElementNumAttributes);
    assert_eq!(diffs[0].control.value, V::Int(2));
    assert_eq!(diffs[0].test.value, V::Int(1));
    assert_eq!(diffs[0].control.xpath.as_deref(), Some("/bar[1]"));

    assert_eq!(diffs[1].kind, T::AttrNameLookup);
    assert_eq!(diffs[1].control.value, V::Bool(true));
    assert_eq!(diffs[1].test.value, V::Bool(false));
    assert_eq!(diffs[1].control.xpath.as_deref(), Some("/bar[1]/@y"));
    assert_eq!(diffs[1].test.xpath.as_deref(), Some("/bar[1]"));
}

#[test]
fn test_extra_test_attribute() {
    let comparisons = compare_elements("<a/>", "<a z=\"1\"/>", StrategyOptions::default());
    let lookup = comparisons
        .iter()
        .find(|c| c.kind == T::AttrNameLookup)
        .unwrap();
    assert_eq!(lookup.control.value, V::Bool(false));
    assert_eq!(lookup.test.value, V::Bool(true));
    assert_eq!(lookup.control.xpath.as_deref(), Some("/a[1]"));
    assert_eq!(lookup.test.xpath.as_deref(), Some("/a[1]/@z"));
}

#[test]
fn test_attribute_order() {
    let control = "<a x=\"1\" y=\"2\"/>";
    let test = "<a y=\"2\" x=\"1\"/>";

    let ignored = compare_elements(control, test, StrategyOptions::default());
    assert!(!kinds(&ignored).contains(&T::AttrSequence));

    let strict = StrategyOptions {
        ignore_attribute_order: false,
    };
    let comparisons = compare_elements(control, test, strict);
    let sequences: Vec<_> = comparisons
        .iter()
        .filter(|c| c.kind == T::AttrSequence)
        .collect();
    assert_eq!(sequences.len(), 2);
    assert_eq!(sequences[0].control.value, V::from("x"));
    assert_eq!(sequences[0].test.value, V::from("y"));
    assert_eq!(sequences[0].control.xpath.as_deref(), Some("/a[1]/@x"));
    assert_eq!(sequences[0].test.xpath.as_deref(), Some("/a[1]/@y"));
    assert_eq!(sequences[1].control.value, V::from("y"));
    assert_eq!(sequences[1].test.value, V::from("x"));
}

#[test]
fn test_attribute_sequence_absent_slot() {
    let strict = StrategyOptions {
        ignore_attribute_order: false,
    };
    let comparisons = compare_elements("<a x=\"1\" y=\"2\"/>", "<a y=\"2\"/>", strict);
    let sequence = comparisons
        .iter()
        .find(|c| c.kind == T::AttrSequence)
        .unwrap();
    assert_eq!(sequence.control.value, V::from("y"));
    assert_eq!(sequence.test.value, V::from("[attribute absent]"));
    assert_eq!(sequence.test.target, None);
    assert_eq!(sequence.test.xpath.as_deref(), Some("/a[1]"));
}

#[test]
fn test_namespaces_and_schema_location() {
    let comparisons = compare_elements(
        "<p:a xmlns:p=\"urn:x\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:schemaLocation=\"urn:x a.xsd\"/>",
        "<q:a xmlns:q=\"urn:x\"/>",
        StrategyOptions::default(),
    );
    let diffs = differences(&comparisons);
    assert_eq!(comparisons.len(), 8);
    assert_eq!(diffs.len(), 2);
    assert_eq!(diffs[0].kind, T::NamespacePrefix);
    assert_eq!(diffs[0].control.value, V::from("p"));
    assert_eq!(diffs[0].test.value, V::from("q"));
    assert_eq!(diffs[1].kind, T::SchemaLocation);
    assert_eq!(diffs[1].control.value, V::from("urn:x a.xsd"));
    assert_eq!(diffs[1].test.value, V::Null);
}

#[test]
fn test_incompatible_kinds() {
    let control = Document::parse("<a><b/></a>").unwrap();
    let test = Document::parse("<a>text</a>").unwrap();
    let (c, mut c_ctx) = at_document_element(&control);
    let (t, mut t_ctx) = at_document_element(&test);
    c_ctx.set_children(c.children());
    t_ctx.set_children(t.children());
    c_ctx.navigate_to_child(0);
    t_ctx.navigate_to_child(0);

    let comparisons = compare_nodes(
        c.children().next().unwrap(),
        &mut c_ctx,
        t.children().next().unwrap(),
        &mut t_ctx,
        StrategyOptions::default(),
    );
    assert_eq!(
        kinds(&comparisons),
        [
            T::NodeType,
            T::NamespaceUri,
            T::NamespacePrefix,
            T::HasChildNodes
        ]
    );
    assert_eq!(comparisons[0].control.value, V::NodeType(NodeType::Element));
    assert_eq!(comparisons[0].test.value, V::NodeType(NodeType::Text));
    assert_eq!(comparisons[0].control.xpath.as_deref(), Some("/a[1]/b[1]"));
    assert_eq!(comparisons[0].test.xpath.as_deref(), Some("/a[1]/text()[1]"));
}

#[test]
fn test_character_data_kinds() {
    let mut doc = Document::new();
    let root = doc.append_element(doc.root, QualName::local("r")).unwrap();
    let text = doc.append_text(root, "x").unwrap();
    let cdata = doc.append_cdata(root, "x").unwrap();
    let comment = doc.append_comment(root, "x").unwrap();
    let other_comment = doc.append_comment(root, "y").unwrap();

    let kind_of = |a, b| {
        let mut a_ctx = XPathContext::new();
        let mut b_ctx = XPathContext::new();
        let comparisons = compare_nodes(
            doc.node(a),
            &mut a_ctx,
            doc.node(b),
            &mut b_ctx,
            StrategyOptions::default(),
        );
        let last = comparisons.last().unwrap().clone();
        (last.kind, last.control.value != last.test.value)
    };

    assert_eq!(kind_of(text, text), (T::TextValue, false));
    assert_eq!(kind_of(text, cdata), (T::TextValue, false));
    assert_eq!(kind_of(cdata, cdata), (T::CdataValue, false));
    assert_eq!(kind_of(comment, other_comment), (T::CommentValue, true));
    assert_eq!(kind_of(comment, text), (T::TextValue, false));
}

#[test]
fn test_processing_instruction() {
    let comparisons = {
        let control = Document::parse("<a><?style href=\"a.css\"?></a>").unwrap();
        let test = Document::parse("<a><?style href=\"b.css\"?></a>").unwrap();
        let c = control.node(control.document_element().unwrap());
        let t = test.node(test.document_element().unwrap());
        compare_nodes(
            c.children().next().unwrap(),
            &mut XPathContext::new(),
            t.children().next().unwrap(),
            &mut XPathContext::new(),
            StrategyOptions::default(),
        )
    };
    let tail: Vec<_> = comparisons.iter().rev().take(2).collect();
    assert_eq!(tail[1].kind, T::ProcessingInstructionTarget);
    assert_eq!(tail[1].control.value, V::from("style"));
    assert_eq!(tail[0].kind, T::ProcessingInstructionData);
    assert_eq!(tail[0].control.value, V::from("href=\"a.css\""));
    assert_eq!(tail[0].test.value, V::from("href=\"b.css\""));
}

#[test]
fn test_document_and_doctype() {
    let control = Document::parse(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <!DOCTYPE a SYSTEM \"a.dtd\"><a/>",
    )
    .unwrap();
    let test = Document::parse("<!DOCTYPE a SYSTEM \"b.dtd\"><a/>").unwrap();

    let comparisons = compare_nodes(
        control.root_node(),
        &mut XPathContext::new(),
        test.root_node(),
        &mut XPathContext::new(),
        StrategyOptions::default(),
    );
    assert_eq!(
        kinds(&comparisons),
        [
            T::NodeType,
            T::NamespaceUri,
            T::NamespacePrefix,
            T::ChildNodelistLength,
            T::HasDoctypeDeclaration,
            T::DoctypeName,
            T::DoctypePublicId,
            T::DoctypeSystemId,
            T::XmlVersion,
            T::XmlStandalone,
            T::XmlEncoding,
        ]
    );
    // The doctype is not counted as a child.
    assert_eq!(comparisons[3].control.value, V::Int(1));

    let diffs = differences(&comparisons);
    let diff_kinds: Vec<_> = diffs.iter().map(|c| c.kind).collect();
    assert_eq!(diff_kinds, [T::DoctypeSystemId, T::XmlEncoding]);
    let system_id = diffs[0];
    assert_eq!(system_id.control.xpath.as_deref(), Some("/"));
    assert_eq!(
        system_id.control.target,
        control.doctype().map(NodeRef::Tree)
    );
    assert_eq!(diffs[1].control.value, V::from("UTF-8"));
    assert_eq!(diffs[1].test.value, V::Null);
}

#[test]
fn test_missing_doctype_skips_doctype_fields() {
    let control = Document::parse("<!DOCTYPE a><a/>").unwrap();
    let test = Document::parse("<a/>").unwrap();
    let comparisons = compare_nodes(
        control.root_node(),
        &mut XPathContext::new(),
        test.root_node(),
        &mut XPathContext::new(),
        StrategyOptions::default(),
    );
    let types = kinds(&comparisons);
    assert!(types.contains(&T::HasDoctypeDeclaration));
    assert!(!types.contains(&T::DoctypeName));
}

#[test]
fn test_standalone_attributes() {
    let control = Document::parse("<a x=\"1\"/>").unwrap();
    let test = Document::parse("<a x=\"2\"/>").unwrap();
    let c = control.root_node().children().next().unwrap();
    let t = test.root_node().children().next().unwrap();

    let comparisons = compare_nodes(
        c.attributes().next().unwrap(),
        &mut XPathContext::new(),
        t.attributes().next().unwrap(),
        &mut XPathContext::new(),
        StrategyOptions::default(),
    );
    assert_eq!(
        kinds(&comparisons),
        [
            T::NodeType,
            T::NamespaceUri,
            T::NamespacePrefix,
            T::AttrValueExplicitlySpecified,
            T::AttrValue,
        ]
    );
    assert_eq!(comparisons[4].test.value, V::from("2"));
}
