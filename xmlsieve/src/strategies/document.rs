use super::{NodeAndXPath, compare, doctype};
use crate::comparison::{ComparisonType, Comparisons};

/// Doctype presence and, when both sides have one, its fields; then the XML
/// declaration.
pub(super) fn comparisons(
    control: &mut NodeAndXPath<'_, '_>,
    test: &mut NodeAndXPath<'_, '_>,
) -> Comparisons {
    let control_doc = control.node.document();
    let test_doc = test.node.document();
    let control_doctype = control_doc.doctype().map(|id| control_doc.node(id));
    let test_doctype = test_doc.doctype().map(|id| test_doc.node(id));

    let mut out = Comparisons::new();
    out.push(compare(
        ComparisonType::HasDoctypeDeclaration,
        control.detail(control_doctype.is_some()),
        test.detail(test_doctype.is_some()),
    ));
    if let (Some(control_doctype), Some(test_doctype)) = (control_doctype, test_doctype) {
        out.append(doctype::comparisons(
            &control.with_node(control_doctype),
            &test.with_node(test_doctype),
        ));
    }

    let control_decl = &control_doc.declaration;
    let test_decl = &test_doc.declaration;
    out.push(compare(
        ComparisonType::XmlVersion,
        control.detail(control_decl.version.as_str()),
        test.detail(test_decl.version.as_str()),
    ));
    out.push(compare(
        ComparisonType::XmlStandalone,
        control.detail(control_decl.standalone),
        test.detail(test_decl.standalone),
    ));
    out.push(compare(
        ComparisonType::XmlEncoding,
        control.detail(control_decl.encoding.as_deref()),
        test.detail(test_decl.encoding.as_deref()),
    ));
    out
}
