//! Import of documents parsed by `roxmltree`.
//!
//! roxmltree reports neither the XML declaration nor the document type
//! declaration, so [`Document::parse`] reads both from the prolog of the
//! source text. CDATA sections arrive merged into text and are imported as
//! text; build the tree by hand when the distinction matters.

use compact_str::CompactString;
use indextree::NodeId;

use crate::debug;
use crate::dom::{
    AttributeData, Document, DocumentTypeData, ElementData, NodeKind, QualName, XMLNS_NAMESPACE,
    XmlDeclaration,
};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

impl Document {
    /// Parse `text` with roxmltree (DTDs allowed) and import the result,
    /// including the XML declaration and document type declaration.
    pub fn parse(text: &str) -> Result<Document, roxmltree::Error> {
        let mut options = roxmltree::ParsingOptions::default();
        options.allow_dtd = true;
        let parsed = roxmltree::Document::parse_with_options(text, options)?;
        let prolog = Prolog::read(text);

        let mut doc = Document::new();
        doc.declaration = prolog.declaration;
        if let Some(doctype) = prolog.doctype {
            let id = doc.arena.new_node(NodeKind::DocumentType(doctype));
            doc.root.append(id, &mut doc.arena);
        }
        let root = doc.root;
        import_children(&mut doc, root, parsed.root());
        Ok(doc)
    }

    /// Import an already parsed roxmltree document. The XML declaration is
    /// left at its defaults and no doctype is recorded.
    pub fn from_roxmltree(parsed: &roxmltree::Document<'_>) -> Document {
        let mut doc = Document::new();
        let root = doc.root;
        import_children(&mut doc, root, parsed.root());
        doc
    }
}

fn import_children(doc: &mut Document, parent: NodeId, source: roxmltree::Node<'_, '_>) {
    let at_document = source.is_root();
    for child in source.children() {
        let kind = match child.node_type() {
            roxmltree::NodeType::Element => NodeKind::Element(import_element(child)),
            roxmltree::NodeType::Text if at_document => continue,
            roxmltree::NodeType::Text => NodeKind::Text(child.text().unwrap_or_default().into()),
            roxmltree::NodeType::Comment => {
                NodeKind::Comment(child.text().unwrap_or_default().into())
            }
            roxmltree::NodeType::PI => match child.pi() {
                Some(pi) => NodeKind::ProcessingInstruction {
                    target: pi.target.into(),
                    data: pi.value.unwrap_or_default().into(),
                },
                None => continue,
            },
            roxmltree::NodeType::Root => continue,
        };
        let id = doc.arena.new_node(kind);
        parent.append(id, &mut doc.arena);
        if child.is_element() {
            import_children(doc, id, child);
        }
    }
}

fn import_element(node: roxmltree::Node<'_, '_>) -> ElementData {
    let tag = node.tag_name();
    let name = match tag.namespace() {
        Some(ns) => QualName::prefixed(ns, node.lookup_prefix(ns).unwrap_or_default(), tag.name()),
        None => QualName::local(tag.name()),
    };

    let mut attributes = Vec::new();
    for (prefix, uri) in declared_namespaces(node) {
        let name = match prefix {
            Some(prefix) => QualName::prefixed(XMLNS_NAMESPACE, "xmlns", prefix),
            None => QualName::namespaced(XMLNS_NAMESPACE, "xmlns"),
        };
        attributes.push(AttributeData {
            name,
            value: uri.into(),
            specified: true,
        });
    }
    for attr in node.attributes() {
        let name = match attr.namespace() {
            Some(ns) => {
                QualName::prefixed(ns, node.lookup_prefix(ns).unwrap_or_default(), attr.name())
            }
            None => QualName::local(attr.name()),
        };
        attributes.push(AttributeData {
            name,
            value: attr.value().into(),
            specified: true,
        });
    }

    ElementData { name, attributes }
}

/// Namespaces bound on `node` itself rather than inherited from its parent.
fn declared_namespaces<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
) -> Vec<(Option<&'a str>, &'a str)> {
    let inherited = node.parent_element().map(in_scope).unwrap_or_default();
    in_scope(node)
        .into_iter()
        .filter(|binding| !inherited.contains(binding))
        .collect()
}

fn in_scope<'a, 'input>(node: roxmltree::Node<'a, 'input>) -> Vec<(Option<&'a str>, &'a str)> {
    node.namespaces()
        .filter(|ns| ns.uri() != XML_NAMESPACE)
        .map(|ns| (ns.name(), ns.uri()))
        .collect()
}

/// XML declaration and doctype read from the start of the source text.
#[derive(Debug, Default)]
struct Prolog {
    declaration: XmlDeclaration,
    doctype: Option<DocumentTypeData>,
}

impl Prolog {
    fn read(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut prolog = Prolog::default();

        let mut rest = text;
        if let Some(after) = text.strip_prefix("<?xml")
            && after.starts_with(|c: char| c.is_ascii_whitespace())
            && let Some(end) = after.find("?>")
        {
            prolog.declaration = read_declaration(&after[..end]);
            rest = &after[end + 2..];
        }

        // The doctype must precede the document element.
        let first_element = first_start_tag(rest).unwrap_or(rest.len());
        if let Some(start) = rest[..first_element].find("<!DOCTYPE") {
            prolog.doctype = read_doctype(&rest[start + "<!DOCTYPE".len()..]);
        }
        debug!(doctype = prolog.doctype.is_some(), "read prolog");
        prolog
    }
}

fn read_declaration(body: &str) -> XmlDeclaration {
    let mut declaration = XmlDeclaration::default();
    let mut cursor = Cursor(body);
    while let Some(key) = cursor.word() {
        cursor.skip_whitespace();
        if !cursor.eat('=') {
            break;
        }
        cursor.skip_whitespace();
        let Some(value) = cursor.quoted() else {
            break;
        };
        match key {
            "version" => declaration.version = value.into(),
            "encoding" => declaration.encoding = Some(value.into()),
            "standalone" => declaration.standalone = value == "yes",
            _ => {}
        }
    }
    declaration
}

fn read_doctype(body: &str) -> Option<DocumentTypeData> {
    let mut cursor = Cursor(body);
    let name = cursor.word()?;
    let mut doctype = DocumentTypeData {
        name: name.into(),
        public_id: None,
        system_id: None,
    };
    match cursor.word() {
        Some("PUBLIC") => {
            doctype.public_id = cursor.quoted().map(CompactString::from);
            doctype.system_id = cursor.quoted().map(CompactString::from);
        }
        Some("SYSTEM") => {
            doctype.system_id = cursor.quoted().map(CompactString::from);
        }
        _ => {}
    }
    Some(doctype)
}

/// Offset of the first start tag that is not a declaration, comment or PI.
fn first_start_tag(text: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(found) = text[offset..].find('<') {
        let at = offset + found;
        let next = text[at + 1..].chars().next()?;
        if next != '!' && next != '?' {
            return Some(at);
        }
        // Skip comments whole so a `<` inside one is not mistaken for a tag.
        let skip_to = if text[at..].starts_with("<!--") {
            text[at..].find("-->").map(|end| at + end + 3)
        } else {
            Some(at + 1)
        };
        offset = skip_to?;
    }
    None
}

/// Minimal scanner over declaration bodies.
struct Cursor<'a>(&'a str);

impl<'a> Cursor<'a> {
    fn skip_whitespace(&mut self) {
        self.0 = self.0.trim_start();
    }

    fn eat(&mut self, c: char) -> bool {
        match self.0.strip_prefix(c) {
            Some(rest) => {
                self.0 = rest;
                true
            }
            None => false,
        }
    }

    /// A run of name characters, after leading whitespace.
    fn word(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let end = self
            .0
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '[' | '>' | '"' | '\''))
            .unwrap_or(self.0.len());
        if end == 0 {
            return None;
        }
        let (word, rest) = self.0.split_at(end);
        self.0 = rest;
        Some(word)
    }

    /// A single or double quoted literal, after leading whitespace.
    fn quoted(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let quote = self.0.chars().next().filter(|c| matches!(c, '"' | '\''))?;
        let body = &self.0[1..];
        let end = body.find(quote)?;
        self.0 = &body[end + 1..];
        Some(&body[..end])
    }
}
