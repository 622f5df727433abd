//! Pairing the children of a control node with the children of a test node.

use xylem::{Matching, greedy_match};

use crate::dom::{Node, NodeType};
use crate::selectors::{ElementSelector, ElementSelectors};
use crate::trace;

/// Pairs two sibling lists.
pub trait NodeMatcher {
    /// Match `control` against `test`. Nodes left out of the matching are
    /// reported as missing on the other side.
    fn match_nodes(&self, control: &[Node<'_>], test: &[Node<'_>]) -> Matching;
}

/// Decides whether two nodes that are not both elements may be paired.
pub trait NodeTypeMatcher {
    /// Whether a `control` node may be paired with a `test` node of the
    /// given types.
    fn can_be_compared(&self, control: NodeType, test: NodeType) -> bool;
}

/// Same node type, or text with CDATA.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNodeTypeMatcher;

impl NodeTypeMatcher for DefaultNodeTypeMatcher {
    fn can_be_compared(&self, control: NodeType, test: NodeType) -> bool {
        control == test || (control.is_text() && test.is_text())
    }
}

/// Greedy first-fit matching: elements are paired when the selector
/// agrees, all other nodes when the type matcher does.
#[derive(Debug, Clone, Default)]
pub struct DefaultNodeMatcher<S = ElementSelectors, T = DefaultNodeTypeMatcher> {
    selector: S,
    type_matcher: T,
}

impl<S: ElementSelector> DefaultNodeMatcher<S, DefaultNodeTypeMatcher> {
    /// Matcher using `selector` for elements.
    pub fn new(selector: S) -> Self {
        Self {
            selector,
            type_matcher: DefaultNodeTypeMatcher,
        }
    }
}

impl<S: ElementSelector, T: NodeTypeMatcher> DefaultNodeMatcher<S, T> {
    /// Matcher using `selector` for elements and `type_matcher` for
    /// everything else.
    pub fn with_type_matcher(selector: S, type_matcher: T) -> Self {
        Self {
            selector,
            type_matcher,
        }
    }

    fn accepts(&self, control: Node<'_>, test: Node<'_>) -> bool {
        let control_type = control.node_type();
        let test_type = test.node_type();
        match (control_type, test_type) {
            (NodeType::Element, NodeType::Element) => {
                self.selector.can_be_compared(control, test)
            }
            (NodeType::Element, _) | (_, NodeType::Element) => false,
            _ => self.type_matcher.can_be_compared(control_type, test_type),
        }
    }
}

impl<S: ElementSelector, T: NodeTypeMatcher> NodeMatcher for DefaultNodeMatcher<S, T> {
    fn match_nodes(&self, control: &[Node<'_>], test: &[Node<'_>]) -> Matching {
        greedy_match(control, test, |&c, &t| self.accepts(c, t))
    }
}

/// Runs another matcher, then pairs the nodes it left over in order, so
/// that they get compared instead of reported as missing.
#[derive(Debug, Clone, Default)]
pub struct CompareUnmatchedNodeMatcher<M> {
    inner: M,
}

impl<M: NodeMatcher> CompareUnmatchedNodeMatcher<M> {
    /// Wrap `inner`.
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M: NodeMatcher> NodeMatcher for CompareUnmatchedNodeMatcher<M> {
    fn match_nodes(&self, control: &[Node<'_>], test: &[Node<'_>]) -> Matching {
        let matched = self.inner.match_nodes(control, test);
        let leftovers: Vec<_> = matched
            .unmatched_control()
            .zip(matched.unmatched_test())
            .collect();
        if leftovers.is_empty() {
            return matched;
        }
        trace!(paired = leftovers.len(), "pairing unmatched nodes");

        let mut pairs: Vec<_> = matched.pairs().chain(leftovers).collect();
        pairs.sort_unstable_by_key(|&(c, _)| c);
        let mut matching = Matching::with_capacity(control.len(), test.len());
        for (c, t) in pairs {
            matching.add(c, t);
        }
        matching
    }
}

impl<M: NodeMatcher + ?Sized> NodeMatcher for Box<M> {
    fn match_nodes(&self, control: &[Node<'_>], test: &[Node<'_>]) -> Matching {
        (**self).match_nodes(control, test)
    }
}
