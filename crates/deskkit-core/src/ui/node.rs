//! Backend-neutral view tree
//!
//! Every shell component renders into a [`Node`]. Hosts (a webview bridge,
//! the terminal playground, tests) walk the tree and draw it however they
//! like. Interactive elements carry an [`Action`] instead of a callback so
//! the tree stays plain data.

use std::collections::BTreeMap;

use super::action::Action;

/// A node in the rendered view tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// Renders nothing
    #[default]
    Empty,
    /// Plain text
    Text(String),
    /// A tagged element with attributes and children
    Element(Element),
    /// Several sibling nodes without a wrapper
    Fragment(Vec<Node>),
}

/// An element node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub class: Option<String>,
    pub attrs: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub on_click: Option<Action>,
    pub on_double_click: Option<Action>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            on_click: None,
            on_double_click: None,
            children: Vec::new(),
        }
    }

    /// Append a class name
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        let class = class.as_ref().trim();
        if class.is_empty() {
            return self;
        }
        self.class = Some(match self.class.take() {
            Some(existing) => format!("{} {}", existing, class),
            None => class.to_string(),
        });
        self
    }

    /// Append a class name only when `condition` holds
    pub fn class_if(self, condition: bool, class: impl AsRef<str>) -> Self {
        if condition { self.class(class) } else { self }
    }

    /// Set an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Set an inline style property
    pub fn style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    pub fn on_click(mut self, action: Action) -> Self {
        self.on_click = Some(action);
        self
    }

    pub fn on_double_click(mut self, action: Action) -> Self {
        self.on_double_click = Some(action);
        self
    }

    /// Append a child, skipping empty nodes
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        let child = child.into();
        if !child.is_empty() {
            self.children.push(child);
        }
        self
    }

    /// Append several children, skipping empty nodes
    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        for child in children {
            self = self.child(child);
        }
        self
    }

    /// Whether the class list contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.class
            .as_deref()
            .map(|list| list.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn attr_value(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

impl Node {
    /// Create a text node
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Create a fragment, dropping empty children
    pub fn fragment<I, N>(children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        let children: Vec<Node> = children
            .into_iter()
            .map(Into::into)
            .filter(|n| !n.is_empty())
            .collect();
        if children.is_empty() { Node::Empty } else { Node::Fragment(children) }
    }

    /// Whether this node renders nothing
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Empty => true,
            Node::Fragment(children) => children.iter().all(Node::is_empty),
            _ => false,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    fn child_nodes(&self) -> &[Node] {
        match self {
            Node::Element(el) => &el.children,
            Node::Fragment(children) => children,
            _ => &[],
        }
    }

    /// Depth-first search for the first element matching `pred`
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if let Node::Element(el) = self {
            if pred(el) {
                return Some(el);
            }
        }
        self.child_nodes().iter().find_map(|child| child.find(pred))
    }

    /// Collect every element matching `pred`, in document order
    pub fn find_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect(pred, &mut out);
        out
    }

    fn collect<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if let Node::Element(el) = self {
            if pred(el) {
                out.push(el);
            }
        }
        for child in self.child_nodes() {
            child.collect(pred, out);
        }
    }

    /// Find the element tagged with `data-region="<region>"`
    pub fn region(&self, region: &str) -> Option<&Element> {
        self.find(&|el| el.attr_value("data-region") == Some(region))
    }

    /// All text in the subtree, space separated
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Node::Text(text) if !text.is_empty() => out.push(text),
            _ => {
                for child in self.child_nodes() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Every click action in the subtree, in document order
    pub fn actions(&self) -> Vec<&Action> {
        self.find_all(&|el| el.on_click.is_some())
            .into_iter()
            .filter_map(|el| el.on_click.as_ref())
            .collect()
    }
}

impl Element {
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        for child in &self.children {
            child.collect_text(&mut parts);
        }
        parts.join(" ")
    }

    /// Depth-first search among this element's descendants
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        self.children.iter().find_map(|child| child.find(pred))
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<Option<Node>> for Node {
    fn from(node: Option<Node>) -> Self {
        node.unwrap_or_default()
    }
}

impl From<Vec<Node>> for Node {
    fn from(children: Vec<Node>) -> Self {
        Node::fragment(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_skips_empty_children() {
        let el = Element::new("div")
            .child(Node::Empty)
            .child(Node::fragment(Vec::<Node>::new()))
            .child("hello");
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn test_class_appends() {
        let el = Element::new("div").class("a").class_if(false, "b").class("c");
        assert_eq!(el.class.as_deref(), Some("a c"));
        assert!(el.has_class("c"));
        assert!(!el.has_class("b"));
    }

    #[test]
    fn test_region_lookup_and_text() {
        let node: Node = Element::new("div")
            .child(
                Element::new("span")
                    .attr("data-region", "greeting")
                    .child("hi")
                    .child("there"),
            )
            .into();
        let region = node.region("greeting").expect("region");
        assert_eq!(region.text_content(), "hi there");
        assert!(node.region("missing").is_none());
    }

    #[test]
    fn test_actions_in_document_order() {
        let node: Node = Element::new("nav")
            .child(Element::new("a").on_click(Action::Navigate("/a".into())))
            .child(Element::new("a").on_click(Action::Navigate("/b".into())))
            .into();
        let actions = node.actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1], &Action::Navigate("/b".into()));
    }
}
