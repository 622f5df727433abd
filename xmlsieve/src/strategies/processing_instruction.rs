use super::{NodeAndXPath, compare};
use crate::comparison::{ComparisonType, Comparisons};

/// Target, then data.
pub(super) fn comparisons(
    control: &NodeAndXPath<'_, '_>,
    test: &NodeAndXPath<'_, '_>,
) -> Comparisons {
    let mut out = Comparisons::new();
    out.push(compare(
        ComparisonType::ProcessingInstructionTarget,
        control.detail(&*control.node.node_name()),
        test.detail(&*test.node.node_name()),
    ));
    out.push(compare(
        ComparisonType::ProcessingInstructionData,
        control.detail(control.node.value()),
        test.detail(test.node.value()),
    ));
    out
}
