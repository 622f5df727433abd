use super::{NodeAndXPath, StrategyOptions, attribute, compare, namespace};
use crate::attributes::Attributes;
use crate::comparison::{Comparison, ComparisonType, ComparisonValue, Comparisons, Detail};
use crate::dom::Node;

/// Placeholder name for an attribute slot the test element does not fill.
pub(crate) const ATTRIBUTE_ABSENT: &str = "[attribute absent]";

/// Tag name, then everything about attributes.
pub(super) fn comparisons(
    control: &mut NodeAndXPath<'_, '_>,
    test: &mut NodeAndXPath<'_, '_>,
    options: StrategyOptions,
) -> Comparisons {
    let mut out = Comparisons::new();
    out.push(compare(
        ComparisonType::ElementTagName,
        control.detail(control.node.local_name()),
        test.detail(test.node.local_name()),
    ));

    let control_attrs = Attributes::of(control.node);
    let test_attrs = Attributes::of(test.node);
    out.push(compare(
        ComparisonType::ElementNumAttributes,
        control.detail(control_attrs.regular().len()),
        test.detail(test_attrs.regular().len()),
    ));

    for (control_idx, &control_attr) in control_attrs.regular().iter().enumerate() {
        let found = test_attrs.find_matching(control_attr);

        control.context.navigate_to_attribute(&attr_name(control_attr));
        out.push(compare(
            ComparisonType::AttrNameLookup,
            control.detail(true),
            test.detail(found.is_some()),
        ));

        if let Some((test_idx, test_attr)) = found {
            if !options.ignore_attribute_order && test_idx != control_idx {
                out.push(attr_sequence(
                    control,
                    control_attr,
                    test,
                    &test_attrs,
                    control_idx,
                ));
            }

            test.context.navigate_to_attribute(&attr_name(test_attr));
            let control_side = control.with_node(control_attr);
            let test_side = test.with_node(test_attr);
            out.append(namespace::comparisons(&control_side, &test_side));
            out.append(attribute::comparisons(&control_side, &test_side));
            test.context.navigate_to_parent();
        }
        control.context.navigate_to_parent();
    }

    for &test_attr in test_attrs.regular() {
        if control_attrs.find_matching(test_attr).is_some() {
            continue;
        }
        test.context.navigate_to_attribute(&attr_name(test_attr));
        out.push(compare(
            ComparisonType::AttrNameLookup,
            control.detail(false),
            test.detail(true),
        ));
        test.context.navigate_to_parent();
    }

    out.push(compare(
        ComparisonType::SchemaLocation,
        control.detail(control_attrs.schema_location()),
        test.detail(test_attrs.schema_location()),
    ));
    out.push(compare(
        ComparisonType::NoNamespaceSchemaLocation,
        control.detail(control_attrs.no_namespace_schema_location()),
        test.detail(test_attrs.no_namespace_schema_location()),
    ));
    out
}

/// Compares the name of a misplaced control attribute with whatever the
/// test element has in the control attribute's slot. The control context is
/// already positioned at the attribute.
fn attr_sequence(
    control: &NodeAndXPath<'_, '_>,
    control_attr: Node<'_>,
    test: &mut NodeAndXPath<'_, '_>,
    test_attrs: &Attributes<'_>,
    control_idx: usize,
) -> Comparison {
    let control_detail = control.detail_of(control_attr, control_attr.local_name());
    let test_detail = match test_attrs.regular().get(control_idx) {
        Some(&mirror) => {
            test.context.navigate_to_attribute(&attr_name(mirror));
            let detail = test.detail_of(mirror, mirror.local_name());
            test.context.navigate_to_parent();
            detail
        }
        None => Detail::new(
            None,
            Some(test.context.xpath()),
            ComparisonValue::from(ATTRIBUTE_ABSENT),
        ),
    };
    compare(ComparisonType::AttrSequence, control_detail, test_detail)
}

fn attr_name(attr: Node<'_>) -> xylem::QName {
    attr.qual_name()
        .map(|name| name.to_qname())
        .unwrap_or_else(|| xylem::QName::local(attr.node_name()))
}
