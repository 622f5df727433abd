use facet_testhelpers::test;
use xmlsieve::{
    Comparison, ComparisonResult, ComparisonType, ComparisonValue, DiffBuilder, DifferenceEngine,
    DifferenceEvaluators, Document, ElementSelectors,
};

fn collect_all(
    engine: &DifferenceEngine,
    control: &Document,
    test: &Document,
) -> Vec<(Comparison, ComparisonResult)> {
    let mut seen = Vec::new();
    let _ = engine.compare_documents(
        control,
        test,
        &mut |c: &Comparison, outcome: ComparisonResult| seen.push((c.clone(), outcome)),
    );
    seen
}

#[test]
fn missing_attribute_yields_count_and_lookup() {
    let diff = DiffBuilder::parse(r#"<foo><bar a="x" y="z"/></foo>"#, r#"<foo><bar a="x"/></foo>"#)
        .unwrap()
        .build();

    let differences = diff.differences();
    assert_eq!(differences.len(), 2);

    let count = &differences[0].comparison;
    assert_eq!(count.kind, ComparisonType::ElementNumAttributes);
    assert_eq!(count.control.value, ComparisonValue::Int(2));
    assert_eq!(count.test.value, ComparisonValue::Int(1));
    assert_eq!(count.control.xpath.as_deref(), Some("/foo[1]/bar[1]"));

    let lookup = &differences[1].comparison;
    assert_eq!(lookup.kind, ComparisonType::AttrNameLookup);
    assert_eq!(lookup.control.xpath.as_deref(), Some("/foo[1]/bar[1]/@y"));
    assert_eq!(lookup.test.xpath.as_deref(), Some("/foo[1]/bar[1]"));
}

#[test]
fn missing_attribute_stops_at_first_critical() {
    let control = Document::parse(r#"<foo><bar a="x" y="z"/></foo>"#).unwrap();
    let test = Document::parse(r#"<foo><bar a="x"/></foo>"#).unwrap();
    let engine = DifferenceEngine::new().with_evaluator(DifferenceEvaluators::DefaultStopper);

    let seen = collect_all(&engine, &control, &test);
    let (last, outcome) = seen.last().unwrap();
    assert_eq!(*outcome, ComparisonResult::Critical);
    assert_eq!(last.kind, ComparisonType::ElementNumAttributes);
    assert!(
        seen[..seen.len() - 1]
            .iter()
            .all(|(_, outcome)| *outcome == ComparisonResult::Equal)
    );
}

#[test]
fn missing_child_yields_three_differences() {
    let diff = DiffBuilder::parse("<a><b/><c/></a>", "<a><c/></a>")
        .unwrap()
        .build();

    let kinds: Vec<_> = diff
        .differences()
        .iter()
        .map(|d| (d.comparison.kind, d.result))
        .collect();
    assert_eq!(
        kinds,
        [
            (ComparisonType::ChildNodelistLength, ComparisonResult::Different),
            (ComparisonType::ChildNodelistSequence, ComparisonResult::Similar),
            (ComparisonType::ChildLookup, ComparisonResult::Different),
        ]
    );

    let sequence = &diff.differences()[1].comparison;
    assert_eq!(sequence.control.value, ComparisonValue::Int(1));
    assert_eq!(sequence.test.value, ComparisonValue::Int(0));

    let lookup = &diff.differences()[2].comparison;
    assert_eq!(lookup.control.xpath.as_deref(), Some("/a[1]/b[1]"));
    assert_eq!(lookup.control.value, ComparisonValue::from("b"));
    assert_eq!(lookup.test.value, ComparisonValue::Null);
    assert_eq!(lookup.test.xpath.as_deref(), Some("/a[1]"));
}

#[test]
fn reordered_ids_by_name_compare_values() {
    let control = r#"<root><node id="1"/><node id="2"/></root>"#;
    let test = r#"<root><node id="2"/><node id="1"/></root>"#;

    let diff = DiffBuilder::parse(control, test).unwrap().build();
    assert!(!diff.similar());
    let kinds: Vec<_> = diff.differences().iter().map(|d| d.comparison.kind).collect();
    assert_eq!(kinds, [ComparisonType::AttrValue, ComparisonType::AttrValue]);
    assert!(
        diff.differences()
            .iter()
            .all(|d| d.comparison.kind != ComparisonType::ChildLookup)
    );
}

#[test]
fn reordered_ids_by_attribute_are_similar() {
    let control = r#"<root><node id="1"/><node id="2"/></root>"#;
    let test = r#"<root><node id="2"/><node id="1"/></root>"#;

    let diff = DiffBuilder::parse(control, test)
        .unwrap()
        .with_element_selector(ElementSelectors::by_name_and_attributes(["id"]))
        .build();
    assert!(diff.has_differences());
    assert!(diff.similar());
    assert!(
        diff.differences()
            .iter()
            .all(|d| d.comparison.kind == ComparisonType::ChildNodelistSequence)
    );
}

#[test]
fn document_against_itself_is_silent() {
    let doc = Document::parse("<a x=\"1\"><b>text</b><!--c--></a>").unwrap();
    let engine = DifferenceEngine::new();

    assert!(collect_all(&engine, &doc, &doc).is_empty());
    assert!(DiffBuilder::new(&doc, &doc).build().identical());
}

#[test]
fn equal_documents_evaluate_everything_equal() {
    let control = Document::parse("<a x=\"1\"><b>text</b><!--c--><?pi data?></a>").unwrap();
    let test = Document::parse("<a x=\"1\"><b>text</b><!--c--><?pi data?></a>").unwrap();

    let seen = collect_all(&DifferenceEngine::new(), &control, &test);
    assert!(!seen.is_empty());
    assert!(
        seen.iter()
            .all(|(_, outcome)| *outcome == ComparisonResult::Equal)
    );
}
