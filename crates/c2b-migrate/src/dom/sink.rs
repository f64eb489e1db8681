//! html5ever `TreeSink` building a [`Document`].

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName, local_name, ns};

use super::{Attribute, Document, NodeData, NodeId};

/// Name reported for handles that are not elements.
static NO_NAME: QualName = QualName {
    prefix: None,
    ns: ns!(),
    local: local_name!(""),
};

/// Handle passed around by the tree builder.
///
/// Element handles carry their qualified name so `elem_name` can borrow it
/// from the handle itself instead of from the `RefCell`-guarded arena.
#[derive(Debug, Clone)]
pub(super) struct Handle {
    id: NodeId,
    name: Option<Rc<QualName>>,
}

impl Handle {
    fn node(id: NodeId) -> Self {
        Self { id, name: None }
    }
}

/// Tree builder target.
///
/// html5ever's `TreeSink` methods take `&self`, so the document lives in a
/// `RefCell`.
#[derive(Default)]
pub(super) struct DocumentSink {
    doc: RefCell<Document>,
}

fn convert_attrs(attrs: Vec<Html5Attribute>) -> Vec<Attribute> {
    attrs
        .into_iter()
        .map(|a| Attribute {
            name: a.name.local.to_string(),
            value: a.value.to_string(),
        })
        .collect()
}

impl TreeSink for DocumentSink {
    type Handle = Handle;
    type Output = Document;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Document {
        self.doc.into_inner()
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // Exports are not always valid HTML; recover like a browser would.
    }

    fn get_document(&self) -> Handle {
        Handle::node(self.doc.borrow().root())
    }

    fn elem_name<'a>(&'a self, target: &'a Handle) -> &'a QualName {
        target.name.as_deref().unwrap_or(&NO_NAME)
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Handle {
        let id = self.doc.borrow_mut().push(NodeData::Element {
            tag: name.local.to_string(),
            attrs: convert_attrs(attrs),
        });
        Handle {
            id,
            name: Some(Rc::new(name)),
        }
    }

    fn create_comment(&self, _text: StrTendril) -> Handle {
        Handle::node(self.doc.borrow_mut().push(NodeData::Other))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Handle {
        Handle::node(self.doc.borrow_mut().push(NodeData::Other))
    }

    fn append(&self, parent: &Handle, child: NodeOrText<Handle>) {
        let mut doc = self.doc.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => doc.append(parent.id, node.id),
            NodeOrText::AppendText(text) => doc.append_text(parent.id, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Handle,
        prev_element: &Handle,
        child: NodeOrText<Handle>,
    ) {
        let has_parent = self.doc.borrow().parent(element.id).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut doc = self.doc.borrow_mut();
        let root = doc.root();
        let doctype = doc.push(NodeData::Other);
        doc.append(root, doctype);
    }

    fn get_template_contents(&self, target: &Handle) -> Handle {
        target.clone()
    }

    fn same_node(&self, x: &Handle, y: &Handle) -> bool {
        x.id == y.id
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Handle, new_node: NodeOrText<Handle>) {
        let mut doc = self.doc.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => doc.insert_before(sibling.id, node.id),
            NodeOrText::AppendText(text) => doc.insert_text_before(sibling.id, &text),
        }
    }

    fn add_attrs_if_missing(&self, target: &Handle, attrs: Vec<Html5Attribute>) {
        self.doc
            .borrow_mut()
            .add_attrs_if_missing(target.id, convert_attrs(attrs));
    }

    fn remove_from_parent(&self, target: &Handle) {
        self.doc.borrow_mut().detach(target.id);
    }

    fn reparent_children(&self, node: &Handle, new_parent: &Handle) {
        self.doc
            .borrow_mut()
            .reparent_children(node.id, new_parent.id);
    }
}
