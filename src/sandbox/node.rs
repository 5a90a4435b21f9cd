//! The rendered UI tree handed back to the host.

use std::collections::BTreeMap;
use std::fmt;

use super::value::Value;

/// A rendered UI node.
///
/// This is the "opaque UI handle" of a successful render: a plain tree the
/// host can walk, diff or print. `Display` produces JSX-like markup, which is
/// what the CLI shows and what tests assert against.
#[derive(Debug, Clone, PartialEq)]
pub enum UiNode {
    Element(ElementNode),
    Text(String),
    Fragment(Vec<UiNode>),
}

/// A single element with its tag, props and children.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    pub props: BTreeMap<String, Value>,
    pub children: Vec<UiNode>,
}

impl UiNode {
    pub fn element(
        tag: impl Into<String>,
        props: BTreeMap<String, Value>,
        children: Vec<UiNode>,
    ) -> Self {
        UiNode::Element(ElementNode {
            tag: tag.into(),
            props,
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        UiNode::Text(text.into())
    }

    pub fn fragment(children: Vec<UiNode>) -> Self {
        UiNode::Fragment(children)
    }

    /// Concatenated text content of the subtree.
    pub fn text_content(&self) -> String {
        match self {
            UiNode::Text(text) => text.clone(),
            UiNode::Element(element) => element
                .children
                .iter()
                .map(UiNode::text_content)
                .collect::<Vec<_>>()
                .join(""),
            UiNode::Fragment(children) => children
                .iter()
                .map(UiNode::text_content)
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

fn write_prop(f: &mut fmt::Formatter<'_>, name: &str, value: &Value) -> fmt::Result {
    match value {
        Value::Str(s) => write!(f, " {}=\"{}\"", name, s),
        Value::Bool(true) => write!(f, " {}", name),
        other => write!(f, " {}={{{}}}", name, other),
    }
}

impl fmt::Display for UiNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiNode::Text(text) => write!(f, "{text}"),
            UiNode::Fragment(children) => {
                for child in children {
                    write!(f, "{child}")?;
                }
                Ok(())
            }
            UiNode::Element(element) => {
                write!(f, "<{}", element.tag)?;
                for (name, value) in &element.props {
                    write_prop(f, name, value)?;
                }
                if element.children.is_empty() {
                    write!(f, " />")
                } else {
                    write!(f, ">")?;
                    for child in &element.children {
                        write!(f, "{child}")?;
                    }
                    write!(f, "</{}>", element.tag)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_self_closing_element() {
        let node = UiNode::element("Spinner", BTreeMap::new(), vec![]);
        assert_eq!(node.to_string(), "<Spinner />");
    }

    #[test]
    fn display_element_with_string_prop_and_text_child() {
        let mut props = BTreeMap::new();
        props.insert("className".to_string(), Value::string("card"));
        let node = UiNode::element("div", props, vec![UiNode::text("Hi")]);
        assert_eq!(node.to_string(), "<div className=\"card\">Hi</div>");
    }

    #[test]
    fn display_numeric_prop_uses_braces() {
        let mut props = BTreeMap::new();
        props.insert("width".to_string(), Value::Number(3.0));
        let node = UiNode::element("Chart", props, vec![]);
        assert_eq!(node.to_string(), "<Chart width={3} />");
    }

    #[test]
    fn text_content_walks_the_tree() {
        let node = UiNode::fragment(vec![
            UiNode::element("span", BTreeMap::new(), vec![UiNode::text("a")]),
            UiNode::text("b"),
        ]);
        assert_eq!(node.text_content(), "ab");
    }
}
