//! Per node kind comparison strategies.
//!
//! Each strategy turns a control/test node pair into an ordered list of
//! [`Comparison`]s. [`node_comparisons`] runs the checks every node pair gets
//! and then dispatches on the control node's kind. When the test node is of
//! an incompatible kind only the common checks are produced; the node type
//! comparison already reports the mismatch.

mod attribute;
mod character_data;
mod doctype;
mod document;
mod element;
mod namespace;
mod processing_instruction;

use xylem::XPathContext;

use crate::comparison::{Comparison, ComparisonType, ComparisonValue, Comparisons, Detail};
use crate::dom::{Node, NodeType};

/// A node together with the path context addressing it.
pub struct NodeAndXPath<'d, 'x> {
    /// The node
    pub node: Node<'d>,
    /// Path context, positioned at `node`
    pub context: &'x mut XPathContext,
}

impl<'d, 'x> NodeAndXPath<'d, 'x> {
    /// Pair `node` with `context`.
    pub fn new(node: Node<'d>, context: &'x mut XPathContext) -> Self {
        Self { node, context }
    }

    /// Detail for a value taken from this node at the current path.
    pub fn detail(&self, value: impl Into<ComparisonValue>) -> Detail {
        self.detail_of(self.node, value)
    }

    /// Detail for a value taken from `target` at the current path.
    pub fn detail_of(&self, target: Node<'_>, value: impl Into<ComparisonValue>) -> Detail {
        Detail::new(
            Some(target.node_ref()),
            Some(self.context.xpath()),
            value.into(),
        )
    }

    /// Another node addressed through the same context.
    pub fn with_node<'n>(&mut self, node: Node<'n>) -> NodeAndXPath<'n, '_> {
        NodeAndXPath {
            node,
            context: &mut *self.context,
        }
    }
}

/// Knobs that change which comparisons strategies emit.
#[derive(Debug, Clone, Copy)]
pub struct StrategyOptions {
    /// Skip attribute sequence comparisons
    pub ignore_attribute_order: bool,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            ignore_attribute_order: true,
        }
    }
}

/// Children taking part in a comparison: everything but the doctype, which
/// the document strategy compares on its own.
pub fn filtered_children(node: Node<'_>) -> Vec<Node<'_>> {
    node.children()
        .filter(|child| child.node_type() != NodeType::DocumentType)
        .collect()
}

pub(crate) fn compare(
    kind: ComparisonType,
    control: Detail,
    test: Detail,
) -> Comparison {
    Comparison::new(kind, control, test)
}

/// All comparisons for a node pair, children excluded: node type,
/// namespace, child count, then the kind specific ones.
pub fn node_comparisons(
    control: &mut NodeAndXPath<'_, '_>,
    test: &mut NodeAndXPath<'_, '_>,
    options: StrategyOptions,
) -> Comparisons {
    let mut out = Comparisons::new();
    let control_type = control.node.node_type();
    let test_type = test.node.node_type();

    out.push(compare(
        ComparisonType::NodeType,
        control.detail(control_type),
        test.detail(test_type),
    ));
    out.append(namespace::comparisons(control, test));

    if control_type != NodeType::Attribute {
        out.append(children_count(control, test));
    }

    match control_type {
        NodeType::Text | NodeType::CData | NodeType::Comment => {
            if test_type.is_character_data() {
                out.append(character_data::comparisons(control, test));
            }
        }
        NodeType::Document => {
            if test_type == NodeType::Document {
                out.append(document::comparisons(control, test));
            }
        }
        NodeType::DocumentType => {
            if test_type == NodeType::DocumentType {
                out.append(doctype::comparisons(control, test));
            }
        }
        NodeType::Element => {
            if test_type == NodeType::Element {
                out.append(element::comparisons(control, test, options));
            }
        }
        NodeType::ProcessingInstruction => {
            if test_type == NodeType::ProcessingInstruction {
                out.append(processing_instruction::comparisons(control, test));
            }
        }
        NodeType::Attribute => {
            if test_type == NodeType::Attribute {
                out.append(attribute::comparisons(control, test));
            }
        }
    }
    out
}

fn children_count(control: &NodeAndXPath<'_, '_>, test: &NodeAndXPath<'_, '_>) -> Comparisons {
    let control_count = filtered_children(control.node).len();
    let test_count = filtered_children(test.node).len();

    let mut out = Comparisons::new();
    if control_count > 0 && test_count > 0 {
        out.push(compare(
            ComparisonType::ChildNodelistLength,
            control.detail(control_count),
            test.detail(test_count),
        ));
    } else {
        out.push(compare(
            ComparisonType::HasChildNodes,
            control.detail(control_count > 0),
            test.detail(test_count > 0),
        ));
    }
    out
}

#[cfg(test)]
mod tests;
