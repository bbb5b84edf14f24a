//! Single-node XML serializer.
//!
//! Serializes one XPath result node, and the subtree below it, as compact XML
//! on a single logical line. Namespace declarations are added wherever the
//! serialized fragment would otherwise use an undeclared prefix, so every
//! fragment can be re-parsed on its own. A standalone namespaced attribute
//! is followed by its declaration: `p:x="1" xmlns:p="urn:p"`.

use sxd_document::dom::{ChildOfElement, ChildOfRoot, Element, ProcessingInstruction};
use sxd_document::QName;
use sxd_xpath::nodeset::Node;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Serializes `node` to an XML string.
///
/// # Examples
///
/// ```
/// use sxd_document::parser;
/// use xq::output::xml::to_xml;
///
/// let package = parser::parse("<a x='1'><b>hi</b></a>").unwrap();
/// let doc = package.as_document();
/// let value = sxd_xpath::evaluate_xpath(&doc, "/a").unwrap();
/// if let sxd_xpath::Value::Nodeset(nodes) = value {
///     let node = nodes.document_order()[0];
///     assert_eq!(to_xml(node), r#"<a x="1"><b>hi</b></a>"#);
/// }
/// ```
pub fn to_xml(node: Node<'_>) -> String {
    let mut serializer = Serializer::default();
    serializer.node(node);
    serializer.out
}

/// In-scope namespace bindings of the serialized output. `None` as prefix
/// means the default namespace; `None` as URI means "no namespace".
type Binding<'d> = (Option<String>, Option<&'d str>);

#[derive(Default)]
struct Serializer<'d> {
    out: String,
    scope: Vec<Binding<'d>>,
    generated: usize,
}

impl<'d> Serializer<'d> {
    fn node(&mut self, node: Node<'d>) {
        match node {
            Node::Root(root) => {
                for child in root.children() {
                    match child {
                        ChildOfRoot::Element(element) => self.element(element),
                        ChildOfRoot::Comment(comment) => self.comment(comment.text()),
                        ChildOfRoot::ProcessingInstruction(pi) => self.processing_instruction(pi),
                    }
                }
            }
            Node::Element(element) => self.element(element),
            Node::Attribute(attribute) => {
                let mut declarations = Vec::new();
                let name = self.attribute_name(
                    attribute.name(),
                    attribute.preferred_prefix(),
                    &mut declarations,
                );
                self.out.push_str(&name);
                self.out.push_str("=\"");
                write_escaped_attr(&mut self.out, attribute.value());
                self.out.push('"');
                self.declarations(declarations);
            }
            Node::Text(text) => write_escaped_text(&mut self.out, text.text()),
            Node::Comment(comment) => self.comment(comment.text()),
            Node::Namespace(namespace) => {
                self.out.push_str("xmlns:");
                self.out.push_str(namespace.prefix());
                self.out.push_str("=\"");
                write_escaped_attr(&mut self.out, namespace.uri());
                self.out.push('"');
            }
            Node::ProcessingInstruction(pi) => self.processing_instruction(pi),
        }
    }

    fn element(&mut self, element: Element<'d>) {
        let mark = self.scope.len();
        let mut declarations = Vec::new();

        let name = self.element_name(element.name(), element.preferred_prefix(), &mut declarations);
        let attributes: Vec<(String, &str)> = element
            .attributes()
            .into_iter()
            .map(|attribute| {
                let name = self.attribute_name(
                    attribute.name(),
                    attribute.preferred_prefix(),
                    &mut declarations,
                );
                (name, attribute.value())
            })
            .collect();

        self.out.push('<');
        self.out.push_str(&name);
        self.declarations(declarations);
        for (attr_name, value) in attributes {
            self.out.push(' ');
            self.out.push_str(&attr_name);
            self.out.push_str("=\"");
            write_escaped_attr(&mut self.out, value);
            self.out.push('"');
        }

        let children = element.children();
        if children.is_empty() {
            self.out.push_str("/>");
        } else {
            self.out.push('>');
            for child in children {
                match child {
                    ChildOfElement::Element(child) => self.element(child),
                    ChildOfElement::Text(text) => write_escaped_text(&mut self.out, text.text()),
                    ChildOfElement::Comment(comment) => self.comment(comment.text()),
                    ChildOfElement::ProcessingInstruction(pi) => self.processing_instruction(pi),
                }
            }
            self.out.push_str("</");
            self.out.push_str(&name);
            self.out.push('>');
        }

        self.scope.truncate(mark);
    }

    fn declarations(&mut self, declarations: Vec<(Option<String>, &'d str)>) {
        for (prefix, uri) in declarations {
            self.out.push_str(" xmlns");
            if let Some(prefix) = prefix {
                self.out.push(':');
                self.out.push_str(&prefix);
            }
            self.out.push_str("=\"");
            write_escaped_attr(&mut self.out, uri);
            self.out.push('"');
        }
    }

    fn comment(&mut self, text: &str) {
        self.out.push_str("<!--");
        self.out.push_str(text);
        self.out.push_str("-->");
    }

    fn processing_instruction(&mut self, pi: ProcessingInstruction<'d>) {
        self.out.push_str("<?");
        self.out.push_str(pi.target());
        if let Some(value) = pi.value() {
            self.out.push(' ');
            self.out.push_str(value);
        }
        self.out.push_str("?>");
    }

    /// Resolves the URI currently bound to `prefix` in the output.
    fn lookup(&self, prefix: Option<&str>) -> Option<&'d str> {
        self.scope
            .iter()
            .rev()
            .find(|(bound, _)| bound.as_deref() == prefix)
            .and_then(|(_, uri)| *uri)
    }

    fn declare(
        &mut self,
        prefix: Option<&str>,
        uri: Option<&'d str>,
        declarations: &mut Vec<(Option<String>, &'d str)>,
    ) {
        let prefix = prefix.map(str::to_string);
        self.scope.push((prefix.clone(), uri));
        declarations.push((prefix, uri.unwrap_or("")));
    }

    fn element_name(
        &mut self,
        name: QName<'d>,
        prefix: Option<&'d str>,
        declarations: &mut Vec<(Option<String>, &'d str)>,
    ) -> String {
        match (name.namespace_uri(), prefix) {
            (None, _) => {
                if self.lookup(None).is_some() {
                    // Undeclare an inherited default namespace.
                    self.declare(None, None, declarations);
                }
                name.local_part().to_string()
            }
            (Some(XML_NAMESPACE), _) => format!("xml:{}", name.local_part()),
            (Some(uri), None) => {
                if self.lookup(None) != Some(uri) {
                    self.declare(None, Some(uri), declarations);
                }
                name.local_part().to_string()
            }
            (Some(uri), Some(prefix)) => {
                if self.lookup(Some(prefix)) != Some(uri) {
                    self.declare(Some(prefix), Some(uri), declarations);
                }
                format!("{}:{}", prefix, name.local_part())
            }
        }
    }

    fn attribute_name(
        &mut self,
        name: QName<'d>,
        prefix: Option<&'d str>,
        declarations: &mut Vec<(Option<String>, &'d str)>,
    ) -> String {
        let uri = match name.namespace_uri() {
            None => return name.local_part().to_string(),
            Some(XML_NAMESPACE) => return format!("xml:{}", name.local_part()),
            Some(uri) => uri,
        };

        if let Some(prefix) = prefix {
            if self.lookup(Some(prefix)) != Some(uri) {
                self.declare(Some(prefix), Some(uri), declarations);
            }
            return format!("{}:{}", prefix, name.local_part());
        }

        // A namespaced attribute needs a prefix: reuse one bound to the URI
        // or make one up.
        let existing = self
            .scope
            .iter()
            .rev()
            .filter_map(|(bound, bound_uri)| bound.as_deref().filter(|_| *bound_uri == Some(uri)))
            .find(|bound| self.lookup(Some(*bound)) == Some(uri))
            .map(str::to_string);

        let prefix = match existing {
            Some(prefix) => prefix,
            None => {
                let generated = format!("ns{}", self.generated);
                self.generated += 1;
                self.declare(Some(&generated), Some(uri), declarations);
                generated
            }
        };
        format!("{}:{}", prefix, name.local_part())
    }
}

fn write_escaped_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
}

fn write_escaped_attr(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
}
