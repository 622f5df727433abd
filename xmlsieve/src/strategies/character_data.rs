use super::{NodeAndXPath, compare};
use crate::comparison::{ComparisonType, Comparisons};
use crate::dom::NodeType;

/// Content of text, CDATA and comment nodes. Comments and CDATA sections are
/// only compared as such against their own kind; any other mix is compared
/// as text.
pub(super) fn comparisons(
    control: &NodeAndXPath<'_, '_>,
    test: &NodeAndXPath<'_, '_>,
) -> Comparisons {
    let kind = match (control.node.node_type(), test.node.node_type()) {
        (NodeType::Comment, NodeType::Comment) => ComparisonType::CommentValue,
        (NodeType::CData, NodeType::CData) => ComparisonType::CdataValue,
        _ => ComparisonType::TextValue,
    };
    let mut out = Comparisons::new();
    out.push(compare(
        kind,
        control.detail(control.node.value()),
        test.detail(test.node.value()),
    ));
    out
}
