use super::{NodeAndXPath, compare};
use crate::comparison::{ComparisonType, Comparisons};

/// Whether the value was written out, then the value itself.
pub(super) fn comparisons(
    control: &NodeAndXPath<'_, '_>,
    test: &NodeAndXPath<'_, '_>,
) -> Comparisons {
    let mut out = Comparisons::new();
    let (Some(control_attr), Some(test_attr)) = (control.node.attribute(), test.node.attribute())
    else {
        return out;
    };
    out.push(compare(
        ComparisonType::AttrValueExplicitlySpecified,
        control.detail(control_attr.specified),
        test.detail(test_attr.specified),
    ));
    out.push(compare(
        ComparisonType::AttrValue,
        control.detail(control_attr.value.as_str()),
        test.detail(test_attr.value.as_str()),
    ));
    out
}
