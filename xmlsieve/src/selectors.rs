//! Element selectors: when may a control element be compared with a test
//! element?
//!
//! The node matcher only pairs two elements if the selector agrees. Every
//! selector here requires at least equal names (namespace URI and local
//! name); they differ in what else has to agree.

use crate::attributes::Attributes;
use crate::dom::{Node, NodeType, QualName};

/// Decides whether two elements are counterparts.
pub trait ElementSelector {
    /// Whether `control` and `test`, both elements, should be compared
    /// with each other.
    fn can_be_compared(&self, control: Node<'_>, test: Node<'_>) -> bool;
}

impl<F> ElementSelector for F
where
    F: Fn(Node<'_>, Node<'_>) -> bool,
{
    fn can_be_compared(&self, control: Node<'_>, test: Node<'_>) -> bool {
        self(control, test)
    }
}

/// Built-in element selectors and combinators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ElementSelectors {
    /// Same namespace URI and local name
    #[default]
    ByName,
    /// Same name and same concatenated direct text
    ByNameAndText,
    /// Same name and text, with the same shape of children all the way down
    ByNameAndTextRec,
    /// Same name and the same regular attributes with the same values
    ByNameAndAllAttributes,
    /// Same name, and for each listed attribute either equal values or
    /// absent on both sides
    ByNameAndAttributes(Vec<QualName>),
    /// Like [`ElementSelectors::ByNameAndAttributes`], listing local names
    /// only; each attribute's namespace is taken from the control element
    ByNameAndAttributesControlNs(Vec<String>),
    /// Same names along the chain of first children for `levels - 1`
    /// levels, then same name and text at the innermost level
    ByNameAndTextAtDepth {
        /// Number of levels to look at, at least 1
        levels: usize,
        /// Skip whitespace-only text when looking for the first child
        ignore_empty_text: bool,
    },
    /// The two subtrees are structurally equal
    Equal,
    /// Any of the selectors agrees
    Or(Vec<ElementSelectors>),
    /// All of the selectors agree
    And(Vec<ElementSelectors>),
    /// The selector disagrees
    Not(Box<ElementSelectors>),
    /// Applies the selector to control elements with this name; other
    /// elements are never matched
    ForElementNamed {
        /// Control element name
        name: QualName,
        /// Selector to apply
        selector: Box<ElementSelectors>,
    },
}

impl ElementSelectors {
    /// Any of `selectors` agrees.
    pub fn or(selectors: impl IntoIterator<Item = ElementSelectors>) -> Self {
        ElementSelectors::Or(selectors.into_iter().collect())
    }

    /// All of `selectors` agree.
    pub fn and(selectors: impl IntoIterator<Item = ElementSelectors>) -> Self {
        ElementSelectors::And(selectors.into_iter().collect())
    }

    /// Negates `selector`.
    pub fn not(selector: ElementSelectors) -> Self {
        ElementSelectors::Not(Box::new(selector))
    }

    /// Applies `selector` only when the control element is named `name`.
    pub fn for_element_named(name: QualName, selector: ElementSelectors) -> Self {
        ElementSelectors::ForElementNamed {
            name,
            selector: Box::new(selector),
        }
    }

    /// Same name and the listed attributes (no namespace) agree.
    pub fn by_name_and_attributes<'s>(names: impl IntoIterator<Item = &'s str>) -> Self {
        ElementSelectors::ByNameAndAttributes(names.into_iter().map(QualName::local).collect())
    }
}

impl ElementSelector for ElementSelectors {
    fn can_be_compared(&self, control: Node<'_>, test: Node<'_>) -> bool {
        match self {
            ElementSelectors::ByName => by_name(control, test),
            ElementSelectors::ByNameAndText => by_name_and_text(control, test),
            ElementSelectors::ByNameAndTextRec => by_name_and_text_rec(control, test),
            ElementSelectors::ByNameAndAllAttributes => {
                by_name(control, test) && all_attributes_equal(control, test)
            }
            ElementSelectors::ByNameAndAttributes(names) => {
                by_name(control, test)
                    && names.iter().all(|name| {
                        attribute_values_equal(
                            control,
                            test,
                            name.namespace.as_deref(),
                            &name.local,
                        )
                    })
            }
            ElementSelectors::ByNameAndAttributesControlNs(names) => {
                by_name(control, test)
                    && names.iter().all(|local| {
                        let namespace = control.element().and_then(|e| {
                            e.attributes
                                .iter()
                                .find(|attr| attr.name.local == local.as_str())
                                .and_then(|attr| attr.name.namespace.as_deref())
                        });
                        attribute_values_equal(control, test, namespace, local)
                    })
            }
            ElementSelectors::ByNameAndTextAtDepth {
                levels,
                ignore_empty_text,
            } => by_name_and_text_at_depth(control, test, *levels, *ignore_empty_text),
            ElementSelectors::Equal => control.deep_eq(&test),
            ElementSelectors::Or(selectors) => selectors
                .iter()
                .any(|selector| selector.can_be_compared(control, test)),
            ElementSelectors::And(selectors) => selectors
                .iter()
                .all(|selector| selector.can_be_compared(control, test)),
            ElementSelectors::Not(selector) => !selector.can_be_compared(control, test),
            ElementSelectors::ForElementNamed { name, selector } => {
                control.qual_name().is_some_and(|n| n.same_name(name))
                    && selector.can_be_compared(control, test)
            }
        }
    }
}

fn by_name(control: Node<'_>, test: Node<'_>) -> bool {
    match (control.qual_name(), test.qual_name()) {
        (Some(c), Some(t)) => c.same_name(t),
        _ => false,
    }
}

fn by_name_and_text(control: Node<'_>, test: Node<'_>) -> bool {
    by_name(control, test) && control.direct_text() == test.direct_text()
}

fn by_name_and_text_rec(control: Node<'_>, test: Node<'_>) -> bool {
    if !by_name_and_text(control, test) {
        return false;
    }
    let control_children: Vec<_> = control.children().collect();
    let test_children: Vec<_> = test.children().collect();
    if control_children.len() != test_children.len() {
        return false;
    }
    control_children
        .iter()
        .zip(&test_children)
        .all(|(&c, &t)| match (c.node_type(), t.node_type()) {
            (NodeType::Element, NodeType::Element) => by_name_and_text_rec(c, t),
            (ct, tt) => ct == tt || (ct.is_text() && tt.is_text()),
        })
}

fn by_name_and_text_at_depth(
    control: Node<'_>,
    test: Node<'_>,
    levels: usize,
    ignore_empty_text: bool,
) -> bool {
    let mut control = control;
    let mut test = test;
    for _ in 1..levels {
        if !by_name(control, test) {
            return false;
        }
        match (
            first_eligible_child(control, ignore_empty_text),
            first_eligible_child(test, ignore_empty_text),
        ) {
            (Some(c), Some(t))
                if c.node_type() == NodeType::Element && t.node_type() == NodeType::Element =>
            {
                control = c;
                test = t;
            }
            _ => return false,
        }
    }
    by_name_and_text(control, test)
}

fn first_eligible_child(node: Node<'_>, ignore_empty_text: bool) -> Option<Node<'_>> {
    node.children()
        .find(|child| !(ignore_empty_text && child.is_whitespace_text()))
}

fn all_attributes_equal(control: Node<'_>, test: Node<'_>) -> bool {
    let control_attrs = Attributes::of(control);
    let test_attrs = Attributes::of(test);
    control_attrs.regular().len() == test_attrs.regular().len()
        && control_attrs.regular().iter().all(|&attr| {
            test_attrs
                .find_matching(attr)
                .is_some_and(|(_, other)| other.value() == attr.value())
        })
}

fn attribute_values_equal(
    control: Node<'_>,
    test: Node<'_>,
    namespace: Option<&str>,
    local: &str,
) -> bool {
    attribute_value(control, namespace, local) == attribute_value(test, namespace, local)
}

fn attribute_value<'a>(node: Node<'a>, namespace: Option<&str>, local: &str) -> Option<&'a str> {
    node.element()
        .and_then(|e| e.attribute(namespace, local))
        .map(|attr| attr.value.as_str())
}
