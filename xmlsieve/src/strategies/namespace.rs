use super::{NodeAndXPath, compare};
use crate::comparison::{ComparisonType, Comparisons};

/// Namespace URI, then prefix.
pub(super) fn comparisons(
    control: &NodeAndXPath<'_, '_>,
    test: &NodeAndXPath<'_, '_>,
) -> Comparisons {
    let mut out = Comparisons::new();
    out.push(compare(
        ComparisonType::NamespaceUri,
        control.detail(control.node.namespace_uri()),
        test.detail(test.node.namespace_uri()),
    ));
    out.push(compare(
        ComparisonType::NamespacePrefix,
        control.detail(control.node.prefix()),
        test.detail(test.node.prefix()),
    ));
    out
}
