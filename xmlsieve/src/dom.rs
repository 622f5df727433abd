//! Arena-based XML tree.
//!
//! This module provides the document representation the comparison engine
//! walks. Key features:
//! - **indextree Arena**: all tree nodes in contiguous memory
//! - **Attributes inline**: attributes live on their element and are
//!   addressed through [`NodeRef::Attribute`], so a [`Node`] handle can
//!   point at either
//! - **Namespace aware**: element and attribute names carry their namespace
//!   URI and the prefix they were written with

use compact_str::CompactString;
use facet::Facet;
use indextree::{Arena, NodeId};
use std::borrow::Cow;
use std::fmt;

use crate::debug;

/// Namespace of `xmlns` and `xmlns:*` attributes.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// The XML Schema instance namespace (`xsi:schemaLocation` and friends).
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Errors raised while building a [`Document`].
#[derive(Facet, Debug)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum TreeError {
    /// node cannot have children
    NotAContainer,

    /// document already has a document element
    MultipleDocumentElements,

    /// character data is not allowed outside the document element
    TextOutsideElement,

    /// document already has a document type declaration
    DuplicateDoctype,

    /// document type declaration must precede the document element
    DoctypeAfterElement,

    /// node is not an element
    NotAnElement,
}

/// Namespace URI, prefix, and local part of an element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualName {
    /// Namespace URI; never empty
    pub namespace: Option<CompactString>,
    /// Prefix as written in the source
    pub prefix: Option<CompactString>,
    /// Local part
    pub local: CompactString,
}

fn non_empty(s: Option<&str>) -> Option<CompactString> {
    s.filter(|s| !s.is_empty()).map(CompactString::from)
}

impl QualName {
    /// A name in no namespace.
    pub fn local(local: &str) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local: local.into(),
        }
    }

    /// A name in `namespace`, without a prefix. An empty namespace means no
    /// namespace.
    pub fn namespaced(namespace: &str, local: &str) -> Self {
        Self {
            namespace: non_empty(Some(namespace)),
            prefix: None,
            local: local.into(),
        }
    }

    /// A name in `namespace`, written with `prefix`.
    pub fn prefixed(namespace: &str, prefix: &str, local: &str) -> Self {
        Self {
            namespace: non_empty(Some(namespace)),
            prefix: non_empty(Some(prefix)),
            local: local.into(),
        }
    }

    /// Whether both names have the same namespace and local part. Prefixes
    /// are ignored.
    pub fn same_name(&self, other: &QualName) -> bool {
        self.namespace == other.namespace && self.local == other.local
    }

    /// Whether this name is `local` in `namespace`.
    pub fn is(&self, namespace: Option<&str>, local: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local == local
    }

    /// The name as written: `prefix:local` or `local`.
    pub fn node_name(&self) -> Cow<'_, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{prefix}:{}", self.local)),
            None => Cow::Borrowed(self.local.as_str()),
        }
    }

    /// The prefix-free form used for path rendering.
    pub fn to_qname(&self) -> xylem::QName {
        xylem::QName {
            namespace: self.namespace.as_ref().map(|ns| ns.to_string()),
            local: self.local.to_string(),
        }
    }
}

/// One attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeData {
    /// Attribute name
    pub name: QualName,
    /// Attribute value
    pub value: CompactString,
    /// False when the value was defaulted rather than written in the source
    pub specified: bool,
}

impl AttributeData {
    /// Whether this is an `xmlns` or `xmlns:*` declaration.
    pub fn is_namespace_declaration(&self) -> bool {
        self.name.namespace.as_deref() == Some(XMLNS_NAMESPACE)
    }
}

/// Element name and attributes, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Element name
    pub name: QualName,
    /// Attributes, including namespace declarations
    pub attributes: Vec<AttributeData>,
}

impl ElementData {
    /// Look up an attribute by namespace and local name.
    pub fn attribute(&self, namespace: Option<&str>, local: &str) -> Option<&AttributeData> {
        self.attributes
            .iter()
            .find(|attr| attr.name.is(namespace, local))
    }
}

/// A `<!DOCTYPE ...>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTypeData {
    /// Name of the document element the declaration names
    pub name: CompactString,
    /// Public identifier
    pub public_id: Option<CompactString>,
    /// System identifier
    pub system_id: Option<CompactString>,
}

/// What a tree node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document itself; always the arena root
    Document,
    /// Document type declaration
    DocumentType(DocumentTypeData),
    /// Element with its attributes
    Element(ElementData),
    /// Text content
    Text(CompactString),
    /// CDATA section content
    CData(CompactString),
    /// Comment content
    Comment(CompactString),
    /// Processing instruction
    ProcessingInstruction {
        /// Target, e.g. `xml-stylesheet`
        target: CompactString,
        /// Everything after the target
        data: CompactString,
    },
}

/// Fields of the `<?xml ...?>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    /// XML version, `1.0` unless declared otherwise
    pub version: CompactString,
    /// Declared encoding
    pub encoding: Option<CompactString>,
    /// Declared standalone flag
    pub standalone: bool,
}

impl Default for XmlDeclaration {
    fn default() -> Self {
        Self {
            version: "1.0".into(),
            encoding: None,
            standalone: false,
        }
    }
}

/// The kind of a node, as reported in node type comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Element
    Element,
    /// Attribute
    Attribute,
    /// Text
    Text,
    /// CDATA section
    CData,
    /// Processing instruction
    ProcessingInstruction,
    /// Comment
    Comment,
    /// Document
    Document,
    /// Document type declaration
    DocumentType,
}

impl NodeType {
    /// Text or CDATA.
    pub fn is_text(self) -> bool {
        matches!(self, NodeType::Text | NodeType::CData)
    }

    /// Text, CDATA or comment.
    pub fn is_character_data(self) -> bool {
        matches!(self, NodeType::Text | NodeType::CData | NodeType::Comment)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Element => "element",
            NodeType::Attribute => "attribute",
            NodeType::Text => "text",
            NodeType::CData => "cdata-section",
            NodeType::ProcessingInstruction => "processing-instruction",
            NodeType::Comment => "comment",
            NodeType::Document => "document",
            NodeType::DocumentType => "document-type",
        };
        f.write_str(name)
    }
}

/// Document = Arena with the document node at its root.
#[derive(Debug, Clone)]
pub struct Document {
    /// THE tree - all nodes live here
    pub arena: Arena<NodeKind>,

    /// The document node
    pub root: NodeId,

    /// XML declaration fields
    pub declaration: XmlDeclaration,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the document node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeKind::Document);
        Self {
            arena,
            root,
            declaration: XmlDeclaration::default(),
        }
    }

    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeKind {
        self.arena[id].get()
    }

    /// Iterate children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Handle for a tree node.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node {
            doc: self,
            at: NodeRef::Tree(id),
        }
    }

    /// Handle for any node reference produced from this document.
    pub fn resolve(&self, at: NodeRef) -> Node<'_> {
        Node { doc: self, at }
    }

    /// Handle for the document node.
    pub fn root_node(&self) -> Node<'_> {
        self.node(self.root)
    }

    /// The document element, if one has been added.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| matches!(self.get(id), NodeKind::Element(_)))
    }

    /// The document type declaration, if any.
    pub fn doctype(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| matches!(self.get(id), NodeKind::DocumentType(_)))
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, TreeError> {
        let at_document = match self.get(parent) {
            NodeKind::Document => true,
            NodeKind::Element(_) => false,
            _ => return Err(TreeError::NotAContainer),
        };
        if at_document {
            match &kind {
                NodeKind::Text(_) | NodeKind::CData(_) => {
                    return Err(TreeError::TextOutsideElement);
                }
                NodeKind::Element(_) if self.document_element().is_some() => {
                    return Err(TreeError::MultipleDocumentElements);
                }
                _ => {}
            }
        }
        let id = self.arena.new_node(kind);
        parent.append(id, &mut self.arena);
        Ok(id)
    }

    /// Append an element named `name` to `parent`.
    pub fn append_element(&mut self, parent: NodeId, name: QualName) -> Result<NodeId, TreeError> {
        self.append(
            parent,
            NodeKind::Element(ElementData {
                name,
                attributes: Vec::new(),
            }),
        )
    }

    /// Append a text node to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, TreeError> {
        self.append(parent, NodeKind::Text(text.into()))
    }

    /// Append a CDATA section to `parent`.
    pub fn append_cdata(&mut self, parent: NodeId, text: &str) -> Result<NodeId, TreeError> {
        self.append(parent, NodeKind::CData(text.into()))
    }

    /// Append a comment to `parent`.
    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> Result<NodeId, TreeError> {
        self.append(parent, NodeKind::Comment(text.into()))
    }

    /// Append a processing instruction to `parent`.
    pub fn append_processing_instruction(
        &mut self,
        parent: NodeId,
        target: &str,
        data: &str,
    ) -> Result<NodeId, TreeError> {
        self.append(
            parent,
            NodeKind::ProcessingInstruction {
                target: target.into(),
                data: data.into(),
            },
        )
    }

    /// Add a document type declaration. Must come before the document
    /// element.
    pub fn set_doctype(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> Result<NodeId, TreeError> {
        if self.doctype().is_some() {
            return Err(TreeError::DuplicateDoctype);
        }
        if self.document_element().is_some() {
            return Err(TreeError::DoctypeAfterElement);
        }
        let data = DocumentTypeData {
            name: name.into(),
            public_id: public_id.map(CompactString::from),
            system_id: system_id.map(CompactString::from),
        };
        self.append(self.root, NodeKind::DocumentType(data))
    }

    fn element_mut(&mut self, element: NodeId) -> Result<&mut ElementData, TreeError> {
        match self.arena[element].get_mut() {
            NodeKind::Element(data) => Ok(data),
            _ => Err(TreeError::NotAnElement),
        }
    }

    fn put_attribute(
        &mut self,
        element: NodeId,
        name: QualName,
        value: &str,
        specified: bool,
    ) -> Result<(), TreeError> {
        let data = self.element_mut(element)?;
        let attr = AttributeData {
            name,
            value: value.into(),
            specified,
        };
        match data
            .attributes
            .iter_mut()
            .find(|existing| existing.name.same_name(&attr.name))
        {
            Some(existing) => *existing = attr,
            None => data.attributes.push(attr),
        }
        Ok(())
    }

    /// Set an attribute written in the source. Replaces an attribute with
    /// the same namespace and local name.
    pub fn set_attribute(
        &mut self,
        element: NodeId,
        name: QualName,
        value: &str,
    ) -> Result<(), TreeError> {
        self.put_attribute(element, name, value, true)
    }

    /// Set an attribute whose value was defaulted by a DTD rather than
    /// written in the source.
    pub fn set_default_attribute(
        &mut self,
        element: NodeId,
        name: QualName,
        value: &str,
    ) -> Result<(), TreeError> {
        self.put_attribute(element, name, value, false)
    }

    /// Add an `xmlns` (no prefix) or `xmlns:prefix` declaration.
    pub fn declare_namespace(
        &mut self,
        element: NodeId,
        prefix: Option<&str>,
        uri: &str,
    ) -> Result<(), TreeError> {
        let name = match prefix {
            Some(prefix) => QualName::prefixed(XMLNS_NAMESPACE, "xmlns", prefix),
            None => QualName::namespaced(XMLNS_NAMESPACE, "xmlns"),
        };
        self.set_attribute(element, name, uri)
    }

    /// A copy of this document without any comments.
    pub fn without_comments(&self) -> Document {
        let mut doc = self.clone();
        let comments: Vec<NodeId> = doc
            .root
            .descendants(&doc.arena)
            .filter(|&id| matches!(doc.get(id), NodeKind::Comment(_)))
            .collect();
        debug!(removed = comments.len(), "stripping comments");
        for id in comments {
            id.remove(&mut doc.arena);
        }
        doc
    }

    /// A copy of this document with text and CDATA trimmed, dropping nodes
    /// that end up empty.
    pub fn whitespace_stripped(&self) -> Document {
        self.map_text(|text| text.trim().into())
    }

    /// A copy of this document with text and CDATA trimmed and inner runs of
    /// whitespace collapsed to a single space, dropping nodes that end up
    /// empty.
    pub fn whitespace_normalized(&self) -> Document {
        self.map_text(|text| {
            let mut out = CompactString::default();
            for word in text.split_whitespace() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(word);
            }
            out
        })
    }

    fn map_text(&self, f: impl Fn(&str) -> CompactString) -> Document {
        let mut doc = self.clone();
        let texts: Vec<NodeId> = doc
            .root
            .descendants(&doc.arena)
            .filter(|&id| matches!(doc.get(id), NodeKind::Text(_) | NodeKind::CData(_)))
            .collect();
        for id in texts {
            let empty = match doc.arena[id].get_mut() {
                NodeKind::Text(text) | NodeKind::CData(text) => {
                    *text = f(text);
                    text.is_empty()
                }
                _ => false,
            };
            if empty {
                id.remove(&mut doc.arena);
            }
        }
        doc
    }
}

/// Address of a node within one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// A node in the arena
    Tree(NodeId),
    /// The `index`th attribute of `element`
    Attribute {
        /// Owning element
        element: NodeId,
        /// Position in the element's attribute list
        index: usize,
    },
}

/// Borrowed handle to a node (tree node or attribute) of a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    at: NodeRef,
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("type", &self.node_type())
            .field("name", &self.node_name())
            .field("at", &self.at)
            .finish()
    }
}

impl<'a> Node<'a> {
    /// The document this node belongs to.
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// The address of this node.
    pub fn node_ref(&self) -> NodeRef {
        self.at
    }

    /// The arena data of a tree node; `None` for attributes.
    pub fn kind(&self) -> Option<&'a NodeKind> {
        match self.at {
            NodeRef::Tree(id) => Some(self.doc.get(id)),
            NodeRef::Attribute { .. } => None,
        }
    }

    /// Element data, if this is an element.
    pub fn element(&self) -> Option<&'a ElementData> {
        match self.kind() {
            Some(NodeKind::Element(data)) => Some(data),
            _ => None,
        }
    }

    /// Attribute data, if this is an attribute.
    pub fn attribute(&self) -> Option<&'a AttributeData> {
        match self.at {
            NodeRef::Attribute { element, index } => match self.doc.get(element) {
                NodeKind::Element(data) => data.attributes.get(index),
                _ => None,
            },
            NodeRef::Tree(_) => None,
        }
    }

    /// Doctype data, if this is a document type declaration.
    pub fn doctype(&self) -> Option<&'a DocumentTypeData> {
        match self.kind() {
            Some(NodeKind::DocumentType(data)) => Some(data),
            _ => None,
        }
    }

    /// The node type.
    pub fn node_type(&self) -> NodeType {
        match self.kind() {
            None => NodeType::Attribute,
            Some(NodeKind::Document) => NodeType::Document,
            Some(NodeKind::DocumentType(_)) => NodeType::DocumentType,
            Some(NodeKind::Element(_)) => NodeType::Element,
            Some(NodeKind::Text(_)) => NodeType::Text,
            Some(NodeKind::CData(_)) => NodeType::CData,
            Some(NodeKind::Comment(_)) => NodeType::Comment,
            Some(NodeKind::ProcessingInstruction { .. }) => NodeType::ProcessingInstruction,
        }
    }

    /// Qualified name of an element or attribute.
    pub fn qual_name(&self) -> Option<&'a QualName> {
        self.element()
            .map(|e| &e.name)
            .or_else(|| self.attribute().map(|a| &a.name))
    }

    /// Local name of an element or attribute.
    pub fn local_name(&self) -> Option<&'a str> {
        self.qual_name().map(|n| n.local.as_str())
    }

    /// Namespace URI of an element or attribute.
    pub fn namespace_uri(&self) -> Option<&'a str> {
        self.qual_name().and_then(|n| n.namespace.as_deref())
    }

    /// Prefix of an element or attribute.
    pub fn prefix(&self) -> Option<&'a str> {
        self.qual_name().and_then(|n| n.prefix.as_deref())
    }

    /// The DOM node name: the qualified name for elements and attributes,
    /// the target for processing instructions, the doctype name, or one of
    /// `#text`, `#cdata-section`, `#comment`, `#document`.
    pub fn node_name(&self) -> Cow<'a, str> {
        if let Some(attr) = self.attribute() {
            return attr.name.node_name();
        }
        match self.kind() {
            Some(NodeKind::Document) | None => Cow::Borrowed("#document"),
            Some(NodeKind::DocumentType(data)) => Cow::Borrowed(data.name.as_str()),
            Some(NodeKind::Element(data)) => data.name.node_name(),
            Some(NodeKind::Text(_)) => Cow::Borrowed("#text"),
            Some(NodeKind::CData(_)) => Cow::Borrowed("#cdata-section"),
            Some(NodeKind::Comment(_)) => Cow::Borrowed("#comment"),
            Some(NodeKind::ProcessingInstruction { target, .. }) => Cow::Borrowed(target.as_str()),
        }
    }

    /// The DOM node value: character data content, attribute value, or
    /// processing instruction data.
    pub fn value(&self) -> Option<&'a str> {
        if let Some(attr) = self.attribute() {
            return Some(attr.value.as_str());
        }
        match self.kind() {
            Some(NodeKind::Text(text) | NodeKind::CData(text) | NodeKind::Comment(text)) => {
                Some(text.as_str())
            }
            Some(NodeKind::ProcessingInstruction { data, .. }) => Some(data.as_str()),
            _ => None,
        }
    }

    /// Child nodes in document order. Attributes are not children.
    pub fn children(self) -> impl Iterator<Item = Node<'a>> {
        let doc = self.doc;
        let ids = match self.at {
            NodeRef::Tree(id) => Some(id.children(&doc.arena)),
            NodeRef::Attribute { .. } => None,
        };
        ids.into_iter().flatten().map(move |id| Node {
            doc,
            at: NodeRef::Tree(id),
        })
    }

    /// Whether this node has any children.
    pub fn has_children(&self) -> bool {
        self.children().next().is_some()
    }

    /// Attributes of an element in document order, namespace declarations
    /// included.
    pub fn attributes(self) -> impl Iterator<Item = Node<'a>> {
        let doc = self.doc;
        let element = match self.at {
            NodeRef::Tree(id) => Some(id),
            NodeRef::Attribute { .. } => None,
        };
        let count = self.element().map_or(0, |e| e.attributes.len());
        element.into_iter().flat_map(move |element| {
            (0..count).map(move |index| Node {
                doc,
                at: NodeRef::Attribute { element, index },
            })
        })
    }

    /// The parent tree node. Attributes have no parent, like in the DOM.
    pub fn parent(&self) -> Option<Node<'a>> {
        match self.at {
            NodeRef::Tree(id) => self.doc.arena[id].parent().map(|p| self.doc.node(p)),
            NodeRef::Attribute { .. } => None,
        }
    }

    /// Whether `other` is this very node of this very document.
    pub fn is_same_node(&self, other: &Node<'_>) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.at == other.at
    }

    /// Text or CDATA consisting only of whitespace.
    pub fn is_whitespace_text(&self) -> bool {
        self.node_type().is_text() && self.value().is_some_and(|v| v.trim().is_empty())
    }

    /// Concatenated text and CDATA of the direct children.
    pub fn direct_text(&self) -> String {
        self.children()
            .filter(|child| child.node_type().is_text())
            .filter_map(|child| child.value())
            .collect()
    }

    /// Structural equality of the subtrees rooted at both nodes: same kinds,
    /// names, values, attributes (in any order) and children (in order).
    pub fn deep_eq(&self, other: &Node<'_>) -> bool {
        if self.node_type() != other.node_type() {
            return false;
        }
        if let (Some(a), Some(b)) = (self.attribute(), other.attribute()) {
            return a.name.same_name(&b.name) && a.value == b.value;
        }
        let same_data = match (self.kind(), other.kind()) {
            (Some(NodeKind::Element(a)), Some(NodeKind::Element(b))) => {
                a.name.same_name(&b.name)
                    && a.attributes.len() == b.attributes.len()
                    && a.attributes.iter().all(|attr| {
                        b.attribute(attr.name.namespace.as_deref(), &attr.name.local)
                            .is_some_and(|other| other.value == attr.value)
                    })
            }
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        if !same_data {
            return false;
        }
        let mut ours = self.children();
        let mut theirs = other.children();
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.deep_eq(&b) => {}
                _ => return false,
            }
        }
    }
}

impl xylem::NodeInfo for Node<'_> {
    fn segment(&self) -> xylem::Segment {
        match self.node_type() {
            NodeType::Element => match self.qual_name() {
                Some(name) => xylem::Segment::Element(name.to_qname()),
                None => xylem::Segment::Other,
            },
            NodeType::Text | NodeType::CData => xylem::Segment::Text,
            NodeType::Comment => xylem::Segment::Comment,
            NodeType::ProcessingInstruction => xylem::Segment::ProcessingInstruction,
            NodeType::Attribute | NodeType::Document | NodeType::DocumentType => {
                xylem::Segment::Other
            }
        }
    }
}
