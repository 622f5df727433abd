//! XPath-like positional addresses.
//!
//! An [`XPathContext`] is a stack of levels. Each level knows the rendered
//! step that leads to it and the steps of its children, so descending into
//! a child is a lookup rather than a recount. Indices are 1-based and count
//! siblings of the same name (elements) or the same kind (text, comments,
//! processing instructions).

use crate::debug;
use rapidhash::RapidHashMap as HashMap;
use smallvec::SmallVec;

/// A namespace-qualified name, ignoring prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI, if any
    pub namespace: Option<String>,
    /// Local part
    pub local: String,
}

impl QName {
    /// A name without a namespace.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// A name in `namespace`.
    pub fn namespaced(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }
}

/// How a node shows up in a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An element, counted among same-named siblings
    Element(QName),
    /// Text or CDATA, counted together
    Text,
    /// A comment
    Comment,
    /// A processing instruction
    ProcessingInstruction,
    /// Anything else
    Other,
}

impl Segment {
    /// Element segment for `name`.
    pub fn element(name: QName) -> Self {
        Segment::Element(name)
    }
}

/// Anything that can describe itself as a path [`Segment`].
pub trait NodeInfo {
    /// The segment this node contributes to a path.
    fn segment(&self) -> Segment;
}

impl NodeInfo for Segment {
    fn segment(&self) -> Segment {
        self.clone()
    }
}

impl<T: NodeInfo + ?Sized> NodeInfo for &T {
    fn segment(&self) -> Segment {
        (**self).segment()
    }
}

/// Assigns 1-based indices among siblings that share a segment.
///
/// Visiting the same position twice returns the index assigned the first
/// time, so a level can be extended without renumbering.
#[derive(Debug, Clone, Default)]
pub struct SiblingCounter {
    totals: HashMap<Segment, usize>,
    assigned: Vec<Option<usize>>,
}

impl SiblingCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the sibling at `position` and return its index among siblings
    /// sharing `segment`.
    pub fn visit(&mut self, position: usize, segment: &Segment) -> usize {
        if let Some(Some(index)) = self.assigned.get(position) {
            return *index;
        }
        let total = self.totals.entry(segment.clone()).or_insert(0);
        *total += 1;
        let index = *total;
        if position >= self.assigned.len() {
            self.assigned.resize(position + 1, None);
        }
        self.assigned[position] = Some(index);
        index
    }

    /// Forget everything seen so far.
    pub fn reset(&mut self) {
        self.totals.clear();
        self.assigned.clear();
    }
}

#[derive(Debug, Clone, Default)]
struct Level {
    /// Step leading to this level
    step: String,
    /// Rendered steps of this level's children
    children: Vec<String>,
    counter: SiblingCounter,
}

impl Level {
    fn new(step: String) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }
}

/// Mutable cursor tracking the positional path of the node being visited.
#[derive(Debug, Clone)]
pub struct XPathContext {
    /// The starting level, rendering as `/`
    start: Level,
    /// Levels entered below the start
    path: SmallVec<[Level; 8]>,
    prefixes: HashMap<String, String>,
}

impl Default for XPathContext {
    fn default() -> Self {
        Self::new()
    }
}

impl XPathContext {
    /// Create a context positioned at the document level, rendering as `/`.
    pub fn new() -> Self {
        Self {
            start: Level::default(),
            path: SmallVec::new(),
            prefixes: HashMap::default(),
        }
    }

    /// Create a context that renders names in the given namespaces with the
    /// mapped prefixes. Keys are namespace URIs, values are prefixes.
    pub fn with_namespace_context<I, K, V>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut ctx = Self::new();
        ctx.prefixes = prefixes
            .into_iter()
            .map(|(uri, prefix)| (uri.into(), prefix.into()))
            .collect();
        ctx
    }

    /// Replace the children of the current level.
    pub fn set_children<I>(&mut self, children: I)
    where
        I: IntoIterator,
        I::Item: NodeInfo,
    {
        let level = self.current_mut();
        level.children.clear();
        level.counter.reset();
        self.append_children(children);
    }

    /// Add children to the current level. Indices continue from the
    /// children already known.
    pub fn append_children<I>(&mut self, children: I)
    where
        I: IntoIterator,
        I::Item: NodeInfo,
    {
        let prefixes = &self.prefixes;
        let level = self.path.last_mut().unwrap_or(&mut self.start);
        for child in children {
            let segment = child.segment();
            let position = level.children.len();
            let index = level.counter.visit(position, &segment);
            let step = render_step(prefixes, &segment, index);
            level.children.push(step);
        }
    }

    /// Descend into the child at `index` (0-based) of the current level.
    pub fn navigate_to_child(&mut self, index: usize) {
        let step = match self.current().children.get(index) {
            Some(step) => step.clone(),
            None => {
                debug!(index, "navigating to unknown child");
                format!("node()[{}]", index + 1)
            }
        };
        self.path.push(Level::new(step));
    }

    /// Descend into the attribute named `name` of the current element.
    pub fn navigate_to_attribute(&mut self, name: &QName) {
        let step = format!("@{}", qualified(&self.prefixes, name));
        self.path.push(Level::new(step));
    }

    /// Go back up one level. The starting level is never popped.
    pub fn navigate_to_parent(&mut self) {
        self.path.pop();
    }

    /// Number of levels below the starting level.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Render the current position, e.g. `/a[1]/b[2]/@id`. The starting
    /// level renders as `/`.
    pub fn xpath(&self) -> String {
        let mut out = String::new();
        for level in &self.path {
            out.push('/');
            out.push_str(&level.step);
        }
        if out.is_empty() {
            out.push('/');
        }
        out
    }

    fn current(&self) -> &Level {
        self.path.last().unwrap_or(&self.start)
    }

    fn current_mut(&mut self) -> &mut Level {
        self.path.last_mut().unwrap_or(&mut self.start)
    }
}

fn qualified(prefixes: &HashMap<String, String>, name: &QName) -> String {
    let prefix = name
        .namespace
        .as_ref()
        .and_then(|ns| prefixes.get(ns))
        .filter(|p| !p.is_empty());
    match prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.clone(),
    }
}

fn render_step(prefixes: &HashMap<String, String>, segment: &Segment, index: usize) -> String {
    match segment {
        Segment::Element(name) => format!("{}[{index}]", qualified(prefixes, name)),
        Segment::Text => format!("text()[{index}]"),
        Segment::Comment => format!("comment()[{index}]"),
        Segment::ProcessingInstruction => format!("processing-instruction()[{index}]"),
        Segment::Other => format!("node()[{index}]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn el(name: &str) -> Segment {
        Segment::element(QName::local(name))
    }

    #[test]
    fn test_empty() {
        let ctx = XPathContext::new();
        assert_eq!(ctx.xpath(), "/");
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_one_level_of_siblings() {
        let mut ctx = XPathContext::new();
        ctx.set_children([el("foo"), el("foo"), el("bar"), el("foo")]);

        ctx.navigate_to_child(0);
        assert_eq!(ctx.xpath(), "/foo[1]");
        ctx.navigate_to_parent();
        ctx.navigate_to_child(1);
        assert_eq!(ctx.xpath(), "/foo[2]");
        ctx.navigate_to_parent();
        ctx.navigate_to_child(2);
        assert_eq!(ctx.xpath(), "/bar[1]");
        ctx.navigate_to_parent();
        ctx.navigate_to_child(3);
        assert_eq!(ctx.xpath(), "/foo[3]");
    }

    #[test]
    fn test_two_levels() {
        let mut ctx = XPathContext::new();
        ctx.set_children([el("foo")]);
        ctx.navigate_to_child(0);
        assert_eq!(ctx.xpath(), "/foo[1]");

        ctx.set_children([el("foo"), el("bar")]);
        ctx.navigate_to_child(1);
        assert_eq!(ctx.xpath(), "/foo[1]/bar[1]");
        ctx.navigate_to_parent();
        ctx.navigate_to_child(0);
        assert_eq!(ctx.xpath(), "/foo[1]/foo[1]");
        ctx.navigate_to_parent();
        ctx.navigate_to_parent();
        assert_eq!(ctx.xpath(), "/");
    }

    #[test]
    fn test_attributes() {
        let mut ctx = XPathContext::new();
        ctx.set_children([el("foo")]);
        ctx.navigate_to_child(0);
        ctx.navigate_to_attribute(&QName::local("bar"));
        assert_eq!(ctx.xpath(), "/foo[1]/@bar");
        ctx.navigate_to_parent();
        assert_eq!(ctx.xpath(), "/foo[1]");
    }

    #[test]
    fn test_mixed_node_kinds() {
        let mut ctx = XPathContext::new();
        ctx.set_children([
            Segment::Comment,
            Segment::Text,
            el("a"),
            Segment::Text,
            Segment::ProcessingInstruction,
            Segment::Comment,
        ]);

        let expected = [
            "/comment()[1]",
            "/text()[1]",
            "/a[1]",
            "/text()[2]",
            "/processing-instruction()[1]",
            "/comment()[2]",
        ];
        for (i, want) in expected.iter().enumerate() {
            ctx.navigate_to_child(i);
            assert_eq!(&ctx.xpath(), want);
            ctx.navigate_to_parent();
        }
    }

    #[test]
    fn test_append_children_keeps_counting() {
        let mut ctx = XPathContext::new();
        ctx.set_children([el("foo")]);
        ctx.append_children([el("foo"), el("bar")]);

        ctx.navigate_to_child(1);
        assert_eq!(ctx.xpath(), "/foo[2]");
        ctx.navigate_to_parent();
        ctx.navigate_to_child(2);
        assert_eq!(ctx.xpath(), "/bar[1]");
    }

    #[test]
    fn test_set_children_resets_counting() {
        let mut ctx = XPathContext::new();
        ctx.set_children([el("foo"), el("foo")]);
        ctx.set_children([el("foo")]);

        ctx.navigate_to_child(0);
        assert_eq!(ctx.xpath(), "/foo[1]");
    }

    #[test]
    fn test_namespace_prefixes() {
        let mut ctx = XPathContext::with_namespace_context([("urn:x", "x")]);
        ctx.set_children([
            Segment::element(QName::namespaced("urn:x", "foo")),
            Segment::element(QName::namespaced("urn:unmapped", "foo")),
        ]);

        ctx.navigate_to_child(0);
        assert_eq!(ctx.xpath(), "/x:foo[1]");
        ctx.navigate_to_attribute(&QName::namespaced("urn:x", "id"));
        assert_eq!(ctx.xpath(), "/x:foo[1]/@x:id");
        ctx.navigate_to_parent();
        ctx.navigate_to_parent();

        // Different namespace, so it starts its own count.
        ctx.navigate_to_child(1);
        assert_eq!(ctx.xpath(), "/foo[1]");
    }

    #[test]
    fn test_unknown_child_index() {
        let mut ctx = XPathContext::new();
        ctx.navigate_to_child(2);
        assert_eq!(ctx.xpath(), "/node()[3]");
    }

    #[test]
    fn test_parent_of_start_is_start() {
        let mut ctx = XPathContext::new();
        ctx.navigate_to_parent();
        assert_eq!(ctx.xpath(), "/");
    }

    #[test]
    fn test_sibling_counter_memoizes() {
        let mut counter = SiblingCounter::new();
        let foo = el("foo");
        assert_eq!(counter.visit(0, &foo), 1);
        assert_eq!(counter.visit(1, &foo), 2);
        assert_eq!(counter.visit(0, &foo), 1);
        assert_eq!(counter.visit(2, &Segment::Text), 1);
        assert_eq!(counter.visit(3, &foo), 3);
    }
}
