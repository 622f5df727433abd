use divan::{Bencher, black_box};
use xmlsieve::{DiffBuilder, Document, ElementSelectors};

fn main() {
    divan::main();
}

/// A catalog with `items` entries, each with a few attributes and children.
fn catalog(items: usize) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><catalog>"#);
    for i in 0..items {
        xml.push_str(&format!(
            r#"<item id="{i}" kind="book"><title>Title {i}</title><price currency="EUR">{}</price><!--note {i}--></item>"#,
            i * 3
        ));
    }
    xml.push_str("</catalog>");
    xml
}

/// Helper to make a small change near the end
fn modify_xml(xml: &str) -> String {
    xml.replacen("kind=\"book\"", "kind=\"magazine\"", 1)
        .replace("Title 7<", "Title seven<")
}

fn reversed_catalog(items: usize) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><catalog>"#);
    for i in (0..items).rev() {
        xml.push_str(&format!(
            r#"<item id="{i}" kind="book"><title>Title {i}</title><price currency="EUR">{}</price><!--note {i}--></item>"#,
            i * 3
        ));
    }
    xml.push_str("</catalog>");
    xml
}

#[divan::bench(args = [10, 100, 1000])]
fn identical(bencher: Bencher, items: usize) {
    let control = Document::parse(&catalog(items)).unwrap();
    let test = Document::parse(&catalog(items)).unwrap();
    bencher.bench_local(|| {
        let diff = DiffBuilder::new(black_box(&control), black_box(&test)).build();
        black_box(diff);
    });
}

#[divan::bench(args = [10, 100, 1000])]
fn small_change(bencher: Bencher, items: usize) {
    let xml = catalog(items);
    let control = Document::parse(&xml).unwrap();
    let test = Document::parse(&modify_xml(&xml)).unwrap();
    bencher.bench_local(|| {
        let diff = DiffBuilder::new(black_box(&control), black_box(&test)).build();
        black_box(diff);
    });
}

#[divan::bench(args = [10, 100, 1000])]
fn reordered_by_id(bencher: Bencher, items: usize) {
    let control = Document::parse(&catalog(items)).unwrap();
    let test = Document::parse(&reversed_catalog(items)).unwrap();
    bencher.bench_local(|| {
        let diff = DiffBuilder::new(black_box(&control), black_box(&test))
            .with_element_selector(ElementSelectors::by_name_and_attributes(["id"]))
            .build();
        black_box(diff);
    });
}

#[divan::bench(args = [100])]
fn parse_and_compare_ignoring_comments(bencher: Bencher, items: usize) {
    let control = catalog(items);
    let test = modify_xml(&control);
    bencher.bench_local(|| {
        let diff = DiffBuilder::parse(black_box(&control), black_box(&test))
            .unwrap()
            .ignore_comments()
            .build();
        black_box(diff);
    });
}
