//! Splitting an element's attributes into regular attributes and the
//! namespace-related ones that get special treatment.

use crate::dom::{Node, XMLNS_NAMESPACE, XSI_NAMESPACE};

/// An element's attributes, sorted into what is compared one by one and
/// what is compared as schema location.
#[derive(Debug, Clone)]
pub struct Attributes<'a> {
    regular: Vec<Node<'a>>,
    schema_location: Option<&'a str>,
    no_namespace_schema_location: Option<&'a str>,
}

impl<'a> Attributes<'a> {
    /// Sort the attributes of `element`. Namespace declarations and
    /// attributes in the schema instance namespace are not regular.
    pub fn of(element: Node<'a>) -> Self {
        let mut attributes = Attributes {
            regular: Vec::new(),
            schema_location: None,
            no_namespace_schema_location: None,
        };
        for attr in element.attributes() {
            match attr.namespace_uri() {
                Some(XMLNS_NAMESPACE) => {}
                Some(XSI_NAMESPACE) => match attr.local_name() {
                    Some("schemaLocation") => attributes.schema_location = attr.value(),
                    Some("noNamespaceSchemaLocation") => {
                        attributes.no_namespace_schema_location = attr.value()
                    }
                    _ => {}
                },
                _ => attributes.regular.push(attr),
            }
        }
        attributes
    }

    /// Regular attributes in document order.
    pub fn regular(&self) -> &[Node<'a>] {
        &self.regular
    }

    /// Value of `xsi:schemaLocation`.
    pub fn schema_location(&self) -> Option<&'a str> {
        self.schema_location
    }

    /// Value of `xsi:noNamespaceSchemaLocation`.
    pub fn no_namespace_schema_location(&self) -> Option<&'a str> {
        self.no_namespace_schema_location
    }

    /// The regular attribute with the same namespace and local name as
    /// `attr`, with its position.
    pub fn find_matching(&self, attr: Node<'_>) -> Option<(usize, Node<'a>)> {
        let wanted = attr.qual_name()?;
        self.regular
            .iter()
            .enumerate()
            .find(|(_, candidate)| candidate.qual_name().is_some_and(|n| n.same_name(wanted)))
            .map(|(idx, candidate)| (idx, *candidate))
    }
}
