//! What gets compared, and how it turned out.

use compact_str::CompactString;
use facet::Facet;
use std::fmt;

use crate::dom::{NodeRef, NodeType};

/// The property a [`Comparison`] looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum ComparisonType {
    /// XML version of the documents
    XmlVersion,
    /// `standalone` flag of the XML declaration
    XmlStandalone,
    /// Encoding declared in the XML declaration
    XmlEncoding,
    /// Whether a doctype is present
    HasDoctypeDeclaration,
    /// Doctype name
    DoctypeName,
    /// Doctype public identifier
    DoctypePublicId,
    /// Doctype system identifier
    DoctypeSystemId,
    /// `xsi:schemaLocation` attribute
    SchemaLocation,
    /// `xsi:noNamespaceSchemaLocation` attribute
    NoNamespaceSchemaLocation,
    /// Node type
    NodeType,
    /// Namespace prefix
    NamespacePrefix,
    /// Namespace URI
    NamespaceUri,
    /// Text content
    TextValue,
    /// Comment content
    CommentValue,
    /// CDATA content
    CdataValue,
    /// Processing instruction target
    ProcessingInstructionTarget,
    /// Processing instruction data
    ProcessingInstructionData,
    /// Local name of an element
    ElementTagName,
    /// Whether an attribute was written in the source or defaulted
    AttrValueExplicitlySpecified,
    /// Number of regular attributes
    ElementNumAttributes,
    /// Attribute value
    AttrValue,
    /// Whether a node has children, when one side has none
    HasChildNodes,
    /// Number of children, when both sides have some
    ChildNodelistLength,
    /// Position of a matched child among its siblings
    ChildNodelistSequence,
    /// A child without a partner on the other side
    ChildLookup,
    /// An attribute without a partner on the other side
    AttrNameLookup,
    /// Position of a matched attribute
    AttrSequence,
}

impl ComparisonType {
    /// Every comparison type, in declaration order.
    pub const ALL: [ComparisonType; 27] = [
        ComparisonType::XmlVersion,
        ComparisonType::XmlStandalone,
        ComparisonType::XmlEncoding,
        ComparisonType::HasDoctypeDeclaration,
        ComparisonType::DoctypeName,
        ComparisonType::DoctypePublicId,
        ComparisonType::DoctypeSystemId,
        ComparisonType::SchemaLocation,
        ComparisonType::NoNamespaceSchemaLocation,
        ComparisonType::NodeType,
        ComparisonType::NamespacePrefix,
        ComparisonType::NamespaceUri,
        ComparisonType::TextValue,
        ComparisonType::CommentValue,
        ComparisonType::CdataValue,
        ComparisonType::ProcessingInstructionTarget,
        ComparisonType::ProcessingInstructionData,
        ComparisonType::ElementTagName,
        ComparisonType::AttrValueExplicitlySpecified,
        ComparisonType::ElementNumAttributes,
        ComparisonType::AttrValue,
        ComparisonType::HasChildNodes,
        ComparisonType::ChildNodelistLength,
        ComparisonType::ChildNodelistSequence,
        ComparisonType::ChildLookup,
        ComparisonType::AttrNameLookup,
        ComparisonType::AttrSequence,
    ];

    /// Human readable description of the compared property.
    pub fn description(self) -> &'static str {
        match self {
            ComparisonType::XmlVersion => "xml version",
            ComparisonType::XmlStandalone => "xml standalone",
            ComparisonType::XmlEncoding => "xml encoding",
            ComparisonType::HasDoctypeDeclaration => "presence of doctype declaration",
            ComparisonType::DoctypeName => "doctype name",
            ComparisonType::DoctypePublicId => "doctype public identifier",
            ComparisonType::DoctypeSystemId => "doctype system identifier",
            ComparisonType::SchemaLocation => "xsi:schemaLocation attribute",
            ComparisonType::NoNamespaceSchemaLocation => "xsi:noNamespaceSchemaLocation attribute",
            ComparisonType::NodeType => "node type",
            ComparisonType::NamespacePrefix => "namespace prefix",
            ComparisonType::NamespaceUri => "namespace URI",
            ComparisonType::TextValue => "text value",
            ComparisonType::CommentValue => "comment value",
            ComparisonType::CdataValue => "CDATA section value",
            ComparisonType::ProcessingInstructionTarget => "processing instruction target",
            ComparisonType::ProcessingInstructionData => "processing instruction data",
            ComparisonType::ElementTagName => "element tag name",
            ComparisonType::AttrValueExplicitlySpecified => "attribute value explicitly specified",
            ComparisonType::ElementNumAttributes => "number of element attributes",
            ComparisonType::AttrValue => "attribute value",
            ComparisonType::HasChildNodes => "presence of child nodes to be",
            ComparisonType::ChildNodelistLength => "number of child nodes",
            ComparisonType::ChildNodelistSequence => "sequence of child nodes",
            ComparisonType::ChildLookup => "presence of child node",
            ComparisonType::AttrNameLookup => "attribute name",
            ComparisonType::AttrSequence => "sequence of attributes",
        }
    }

    /// Whether a difference of this type still leaves the documents
    /// similar.
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            ComparisonType::XmlVersion
                | ComparisonType::XmlStandalone
                | ComparisonType::XmlEncoding
                | ComparisonType::HasDoctypeDeclaration
                | ComparisonType::DoctypeSystemId
                | ComparisonType::SchemaLocation
                | ComparisonType::NoNamespaceSchemaLocation
                | ComparisonType::NamespacePrefix
                | ComparisonType::AttrValueExplicitlySpecified
                | ComparisonType::ChildNodelistSequence
                | ComparisonType::AttrSequence
        )
    }
}

impl fmt::Display for ComparisonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of a single comparison, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Facet)]
#[repr(u8)]
pub enum ComparisonResult {
    /// Both sides agree
    Equal,
    /// The sides differ in a way that does not matter much
    Similar,
    /// The sides differ
    Different,
    /// The sides differ so much that comparing further is pointless;
    /// stops the traversal
    Critical,
}

impl ComparisonResult {
    /// Everything but [`ComparisonResult::Critical`] lets the traversal go on.
    pub fn is_recoverable(self) -> bool {
        self != ComparisonResult::Critical
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonResult::Equal => "equal",
            ComparisonResult::Similar => "similar",
            ComparisonResult::Different => "different",
            ComparisonResult::Critical => "critical",
        })
    }
}

/// The scalar a comparison extracted from one side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonValue {
    /// Nothing to compare, e.g. a missing node or an undeclared encoding
    Null,
    /// A flag
    Bool(bool),
    /// A count or position
    Int(usize),
    /// A name or text
    Str(CompactString),
    /// A node type
    NodeType(NodeType),
}

impl From<bool> for ComparisonValue {
    fn from(value: bool) -> Self {
        ComparisonValue::Bool(value)
    }
}

impl From<usize> for ComparisonValue {
    fn from(value: usize) -> Self {
        ComparisonValue::Int(value)
    }
}

impl From<&str> for ComparisonValue {
    fn from(value: &str) -> Self {
        ComparisonValue::Str(value.into())
    }
}

impl From<Option<&str>> for ComparisonValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(ComparisonValue::Null, ComparisonValue::from)
    }
}

impl From<NodeType> for ComparisonValue {
    fn from(value: NodeType) -> Self {
        ComparisonValue::NodeType(value)
    }
}

impl fmt::Display for ComparisonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonValue::Null => f.write_str("null"),
            ComparisonValue::Bool(b) => write!(f, "{b}"),
            ComparisonValue::Int(n) => write!(f, "{n}"),
            ComparisonValue::Str(s) => f.write_str(s),
            ComparisonValue::NodeType(t) => write!(f, "{t}"),
        }
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    /// The node the value was taken from; `None` when the node does not
    /// exist on this side
    pub target: Option<NodeRef>,
    /// Where the value was found
    pub xpath: Option<String>,
    /// The compared value
    pub value: ComparisonValue,
}

impl Detail {
    /// Create a detail.
    pub fn new(target: Option<NodeRef>, xpath: Option<String>, value: ComparisonValue) -> Self {
        Self {
            target,
            xpath,
            value,
        }
    }
}

/// One atomic check between a control and a test property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// What is compared
    pub kind: ComparisonType,
    /// Control side
    pub control: Detail,
    /// Test side
    pub test: Detail,
}

impl Comparison {
    /// Create a comparison.
    pub fn new(kind: ComparisonType, control: Detail, test: Detail) -> Self {
        Self {
            kind,
            control,
            test,
        }
    }

    /// `Equal` when both values agree, `Different` otherwise.
    pub fn default_outcome(&self) -> ComparisonResult {
        if self.control.value == self.test.value {
            ComparisonResult::Equal
        } else {
            ComparisonResult::Different
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Expected {} '{}' but was '{}' - comparing {} to {}",
            self.kind,
            self.control.value,
            self.test.value,
            self.control.xpath.as_deref().unwrap_or("<absent>"),
            self.test.xpath.as_deref().unwrap_or("<absent>"),
        )
    }
}

/// Comparisons in the order they are to be evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparisons(Vec<Comparison>);

impl Comparisons {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comparison.
    pub fn push(&mut self, comparison: Comparison) {
        self.0.push(comparison);
    }

    /// Append all comparisons of `other`, keeping their order.
    pub fn append(&mut self, other: Comparisons) {
        self.0.extend(other.0);
    }

    /// Iterate in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Comparison> {
        self.0.iter()
    }

    /// Number of comparisons.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no comparisons.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Comparisons {
    type Item = Comparison;
    type IntoIter = std::vec::IntoIter<Comparison>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Extend<Comparison> for Comparisons {
    fn extend<I: IntoIterator<Item = Comparison>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_recoverable_types() {
        let recoverable: Vec<_> = ComparisonType::ALL
            .into_iter()
            .filter(|t| t.is_recoverable())
            .collect();
        assert_eq!(recoverable.len(), 11);
        assert!(!ComparisonType::NodeType.is_recoverable());
        assert!(!ComparisonType::DoctypePublicId.is_recoverable());
        assert!(ComparisonType::DoctypeSystemId.is_recoverable());
    }

    #[test]
    fn test_result_order() {
        assert!(ComparisonResult::Equal < ComparisonResult::Similar);
        assert!(ComparisonResult::Different < ComparisonResult::Critical);
        assert!(ComparisonResult::Different.is_recoverable());
        assert!(!ComparisonResult::Critical.is_recoverable());
    }

    #[test]
    fn test_default_outcome() {
        let detail = |value: ComparisonValue| Detail::new(None, Some("/a[1]".into()), value);
        let same = Comparison::new(
            ComparisonType::TextValue,
            detail("x".into()),
            detail("x".into()),
        );
        assert_eq!(same.default_outcome(), ComparisonResult::Equal);

        let differs = Comparison::new(
            ComparisonType::XmlEncoding,
            detail(Some("UTF-8").into()),
            detail(None::<&str>.into()),
        );
        assert_eq!(differs.default_outcome(), ComparisonResult::Different);
        assert_eq!(differs.test.value, ComparisonValue::Null);
    }

    #[test]
    fn test_display() {
        let comparison = Comparison::new(
            ComparisonType::AttrValue,
            Detail::new(None, Some("/a[1]/@x".into()), "1".into()),
            Detail::new(None, None, ComparisonValue::Null),
        );
        assert_eq!(
            comparison.to_string(),
            "Expected attribute value '1' but was 'null' - comparing /a[1]/@x to <absent>"
        );
    }
}
