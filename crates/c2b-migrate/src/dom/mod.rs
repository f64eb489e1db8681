//! Arena-based HTML document.
//!
//! Export pages are parsed with html5ever into a flat arena of nodes, with
//! parent and child links stored as indices. The queries here cover what the
//! hierarchy parser and the content transformer need: lookup by tag, id and
//! class, direct children, and text content.

mod serialize;
mod sink;

pub(crate) use serialize::{escape_attr, escape_text, is_raw_text_element, is_void_element};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use sink::DocumentSink;

/// Index of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Element attribute (local name only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with lower-case tag name and attributes in source order.
    Element { tag: String, attrs: Vec<Attribute> },
    /// Text content.
    Text(String),
    /// Comment, processing instruction or doctype; never serialized.
    Other,
}

#[derive(Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Parsed HTML document.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }
}

impl Document {
    /// Parse an HTML string. Parsing is lenient and never fails.
    pub fn parse(html: &str) -> Self {
        parse_document(DocumentSink::default(), ParseOpts::default())
            .from_utf8()
            .one(html.as_bytes())
    }

    /// Document root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Node payload.
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    /// Direct children in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].children.iter().copied()
    }

    /// All descendants of `id` in document order (pre-order), excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.clone();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Whether `id` is an element with the given tag.
    pub fn is_tag(&self, id: NodeId, name: &str) -> bool {
        self.tag(id) == Some(name)
    }

    /// Attributes of an element (empty for other nodes).
    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// Value of an attribute.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Whether the element's `class` attribute contains `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        if let NodeData::Text(t) = &self.nodes[id.0].data {
            text.push_str(t);
        }
        for node in self.descendants(id) {
            if let NodeData::Text(t) = &self.nodes[node.0].data {
                text.push_str(t);
            }
        }
        text
    }

    /// First descendant of `from` matching `predicate`.
    pub fn find(&self, from: NodeId, predicate: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        self.descendants(from).find(|&id| predicate(id))
    }

    /// All descendants of `from` matching `predicate`, in document order.
    pub fn find_all(&self, from: NodeId, predicate: impl Fn(NodeId) -> bool) -> Vec<NodeId> {
        self.descendants(from).filter(|&id| predicate(id)).collect()
    }

    /// First element with the given tag anywhere in the document.
    pub fn first_by_tag(&self, name: &str) -> Option<NodeId> {
        self.find(self.root(), |id| self.is_tag(id, name))
    }

    /// First `tag` element whose `id` attribute equals `id`.
    pub fn element_by_id(&self, tag: &str, id: &str) -> Option<NodeId> {
        self.find(self.root(), |n| self.is_tag(n, tag) && self.attr(n, "id") == Some(id))
    }

    /// All `tag` elements carrying `class`, in document order.
    pub fn elements_with_class(&self, tag: &str, class: &str) -> Vec<NodeId> {
        self.find_all(self.root(), |n| self.is_tag(n, tag) && self.has_class(n, class))
    }

    /// Trimmed text of the `<title>` element, empty when absent.
    pub fn title(&self) -> String {
        self.first_by_tag("title")
            .map(|id| self.text_content(id).trim().to_owned())
            .unwrap_or_default()
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Append text, merging with a trailing text node.
    fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last()
            && let NodeData::Text(existing) = &mut self.nodes[last.0].data
        {
            existing.push_str(text);
            return;
        }
        let node = self.push(NodeData::Text(text.to_owned()));
        self.append(parent, node);
    }

    fn insert_before(&mut self, sibling: NodeId, child: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let index = siblings.iter().position(|&c| c == sibling).unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    fn insert_text_before(&mut self, sibling: NodeId, text: &str) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == sibling)
            .unwrap_or(0);
        if index > 0 {
            let prev = self.nodes[parent.0].children[index - 1];
            if let NodeData::Text(existing) = &mut self.nodes[prev.0].data {
                existing.push_str(text);
                return;
            }
        }
        let node = self.push(NodeData::Text(text.to_owned()));
        self.insert_before(sibling, node);
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        let children = std::mem::take(&mut self.nodes[from.0].children);
        for child in children {
            self.nodes[child.0].parent = Some(to);
            self.nodes[to.0].children.push(child);
        }
    }

    fn add_attrs_if_missing(&mut self, id: NodeId, extra: Vec<Attribute>) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            for attr in extra {
                if !attrs.iter().any(|a| a.name == attr.name) {
                    attrs.push(attr);
                }
            }
        }
    }
}

/// Pre-order iterator over descendants.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.nodes[id.0].children.iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title() {
        let doc = Document::parse("<html><head><title>  Space : Home \n</title></head></html>");
        assert_eq!(doc.title(), "Space : Home");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let doc = Document::parse("<p>no title</p>");
        assert_eq!(doc.title(), "");
    }

    #[test]
    fn test_element_by_id() {
        let doc = Document::parse(r#"<div id="other"></div><div id="main-content"><p>x</p></div>"#);
        let main = doc.element_by_id("div", "main-content").unwrap();
        assert_eq!(doc.text_content(main), "x");
        assert!(doc.element_by_id("span", "main-content").is_none());
    }

    #[test]
    fn test_elements_with_class_in_order() {
        let doc = Document::parse(
            r#"<div class="pageSection a">1</div><div class="x">-</div><div class="b pageSection">2</div>"#,
        );
        let sections = doc.elements_with_class("div", "pageSection");
        let texts: Vec<_> = sections.iter().map(|&s| doc.text_content(s)).collect();
        assert_eq!(texts, ["1", "2"]);
    }

    #[test]
    fn test_attributes_keep_source_order() {
        let doc = Document::parse(r#"<a title="t" href="x.html" class="c">x</a>"#);
        let a = doc.first_by_tag("a").unwrap();
        let names: Vec<_> = doc.attrs(a).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["title", "href", "class"]);
        assert_eq!(doc.attr(a, "href"), Some("x.html"));
    }

    #[test]
    fn test_descendants_pre_order() {
        let doc = Document::parse("<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>");
        let ul = doc.first_by_tag("ul").unwrap();
        let items: Vec<_> = doc
            .descendants(ul)
            .filter(|&n| doc.is_tag(n, "li"))
            .map(|n| doc.text_content(n))
            .collect();
        assert_eq!(items, ["ab", "b", "c"]);
    }

    #[test]
    fn test_entities_decoded_in_text() {
        let doc = Document::parse("<p>a &amp; b&nbsp;</p>");
        let p = doc.first_by_tag("p").unwrap();
        assert_eq!(doc.text_content(p), "a & b\u{a0}");
    }

    #[test]
    fn test_misnested_markup_recovers() {
        let doc = Document::parse("<table><tr><td>cell</td></tr></table><p>after");
        assert!(doc.first_by_tag("td").is_some());
        let p = doc.first_by_tag("p").unwrap();
        assert_eq!(doc.text_content(p), "after");
    }
}
