//! Result formatting.
//!
//! Turns XPath results into the lines printed on stdout. Find mode prints
//! text-like nodes as their text and everything else as XML; exec mode
//! prints scalars by type and nodes as XML.

pub mod number;
pub mod xml;

use sxd_xpath::nodeset::Node;
use sxd_xpath::Value;

pub use number::format_number;
pub use xml::to_xml;

/// Renders one find-mode match.
///
/// Text, comment and attribute nodes yield their inner text, namespace
/// nodes their URI, and element, root and processing-instruction nodes
/// their serialized XML.
pub fn render_match(node: Node<'_>) -> String {
    match node {
        Node::Text(_) | Node::Comment(_) | Node::Attribute(_) => node.string_value(),
        Node::Namespace(namespace) => namespace.uri().to_string(),
        Node::Root(_) | Node::Element(_) | Node::ProcessingInstruction(_) => to_xml(node),
    }
}

/// Renders an exec-mode result as output lines.
pub fn render_value(value: &Value<'_>) -> Vec<String> {
    match value {
        Value::Boolean(b) => vec![b.to_string()],
        Value::Number(n) => vec![format_number(*n)],
        Value::String(s) => vec![s.clone()],
        Value::Nodeset(nodes) => nodes.document_order().into_iter().map(to_xml).collect(),
    }
}

/// Short name of a result's type, for diagnostics.
pub fn value_kind(value: &Value<'_>) -> &'static str {
    match value {
        Value::Boolean(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Nodeset(_) => "node-set",
    }
}
