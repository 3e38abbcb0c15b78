//! Render tree.

use std::fmt::Write;

/// A node of the render tree: an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    Element(Element),
    Text(String),
}

/// An element with attributes and children, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<RenderNode>,
}

/// Starts an element.
pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

pub fn text(value: impl Into<String>) -> RenderNode {
    RenderNode::Text(value.into())
}

impl Element {
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Adds a class. Empty names are ignored.
    pub fn class(mut self, name: &str) -> Self {
        if name.is_empty() {
            return self;
        }
        match self.attrs.iter_mut().find(|(key, _)| *key == "class") {
            Some((_, classes)) => {
                classes.push(' ');
                classes.push_str(name);
            }
            None => self.attrs.push(("class", name.to_string())),
        }
        self
    }

    pub fn class_if(self, condition: bool, name: &str) -> Self {
        if condition {
            self.class(name)
        } else {
            self
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((key, value.into()));
        self
    }

    /// Boolean attribute such as `disabled`, present only when `on`.
    pub fn flag(self, key: &'static str, on: bool) -> Self {
        if on {
            self.attr(key, key)
        } else {
            self
        }
    }

    pub fn child(mut self, node: impl Into<RenderNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn child_opt(self, node: Option<impl Into<RenderNode>>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<RenderNode>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(text(value))
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split(' ').any(|c| c == name))
    }
}

impl From<Element> for RenderNode {
    fn from(element: Element) -> Self {
        RenderNode::Element(element)
    }
}

impl RenderNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            RenderNode::Element(element) => Some(element),
            RenderNode::Text(_) => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            RenderNode::Text(value) => out.push_str(value),
            RenderNode::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Every element carrying `class`, depth first.
    pub fn find_all(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |element| {
            if element.has_class(class) {
                found.push(element);
            }
        });
        found
    }

    pub fn find(&self, class: &str) -> Option<&Element> {
        self.find_all(class).into_iter().next()
    }

    pub fn find_id(&self, id: &str) -> Option<&Element> {
        let mut found = None;
        self.walk(&mut |element| {
            if found.is_none() && element.get_attr("id") == Some(id) {
                found = Some(element);
            }
        });
        found
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        if let RenderNode::Element(element) = self {
            visit(element);
            for child in &element.children {
                child.walk(visit);
            }
        }
    }

    /// Serializes to HTML. Text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            RenderNode::Text(value) => out.push_str(&crate::escape_html(value)),
            RenderNode::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                for (key, value) in &element.attrs {
                    let _ = write!(out, " {}=\"{}\"", key, crate::escape_html(value));
                }
                if is_void(element.tag) {
                    out.push('>');
                    return;
                }
                out.push('>');
                for child in &element.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

impl Element {
    pub fn to_html(&self) -> String {
        RenderNode::Element(self.clone()).to_html()
    }

    pub fn text_content(&self) -> String {
        RenderNode::Element(self.clone()).text_content()
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "input" | "br")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_accumulate() {
        let node = el("div").class("post").class("").class_if(true, "liked");
        assert_eq!(node.get_attr("class"), Some("post liked"));
        assert!(node.has_class("liked"));
        assert!(!node.has_class("lik"));
    }

    #[test]
    fn html_escapes_text_and_attributes() {
        let node: RenderNode = el("a")
            .attr("title", "\"x\" & y")
            .text("<script>")
            .into();
        assert_eq!(
            node.to_html(),
            "<a title=\"&quot;x&quot; &amp; y\">&lt;script&gt;</a>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node: RenderNode = el("img").attr("src", "u").into();
        assert_eq!(node.to_html(), "<img src=\"u\">");
    }

    #[test]
    fn lookup_by_class_and_id() {
        let tree: RenderNode = el("div")
            .child(el("span").class("a").id("one").text("1"))
            .child(el("p").child(el("span").class("a").text("2")))
            .into();
        assert_eq!(tree.find_all("a").len(), 2);
        assert_eq!(tree.find_id("one").unwrap().text_content(), "1");
        assert_eq!(tree.text_content(), "12");
    }
}
