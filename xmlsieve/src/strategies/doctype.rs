use super::{NodeAndXPath, compare};
use crate::comparison::{ComparisonType, Comparisons};

/// Name, public identifier, system identifier.
pub(super) fn comparisons(
    control: &NodeAndXPath<'_, '_>,
    test: &NodeAndXPath<'_, '_>,
) -> Comparisons {
    let mut out = Comparisons::new();
    let (Some(control_data), Some(test_data)) = (control.node.doctype(), test.node.doctype())
    else {
        return out;
    };
    out.push(compare(
        ComparisonType::DoctypeName,
        control.detail(control_data.name.as_str()),
        test.detail(test_data.name.as_str()),
    ));
    out.push(compare(
        ComparisonType::DoctypePublicId,
        control.detail(control_data.public_id.as_deref()),
        test.detail(test_data.public_id.as_deref()),
    ));
    out.push(compare(
        ComparisonType::DoctypeSystemId,
        control.detail(control_data.system_id.as_deref()),
        test.detail(test_data.system_id.as_deref()),
    ));
    out
}
