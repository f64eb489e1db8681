//! Allow-list reconstruction of export markup.

use crate::dom::{
    Document, NodeData, NodeId, escape_attr, escape_text, is_raw_text_element, is_void_element,
};
use crate::report::ErrorLog;

use super::ContentTransformer;
use super::images;

/// Attributes copied onto rebuilt elements.
const ALLOWED_ATTRIBUTES: &[&str] = &[
    "id", "class", "style", "href", "src", "alt", "title", "colspan", "rowspan", "width",
    "height",
];

/// Whether `href` points at another document of the export.
pub(super) fn is_internal_link(href: &str) -> bool {
    const EXTERNAL: [&str; 4] = ["http://", "https://", "mailto:", "#"];
    href.ends_with(".html") && !EXTERNAL.iter().any(|prefix| href.starts_with(prefix))
}

/// Attribute value replacing the source value on output.
struct Rewrite {
    name: &'static str,
    value: String,
}

impl ContentTransformer<'_> {
    /// Append the rebuilt markup of `node` to `out`.
    pub(super) fn rebuild(
        &mut self,
        doc: &Document,
        node: NodeId,
        page_id: Option<u64>,
        errors: &mut ErrorLog,
        out: &mut String,
    ) {
        let tag = match doc.data(node) {
            NodeData::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    escape_text(text, out);
                }
                return;
            }
            NodeData::Element { tag, .. } => tag.as_str(),
            NodeData::Document | NodeData::Other => return,
        };

        let mut rewrite = None;
        match tag {
            "a" => {
                if let Some(page_id) = page_id
                    && doc
                        .attr(node, "data-nice-type")
                        .is_some_and(|t| t.starts_with("PDF"))
                    && let Some(attachment_id) = self.upload_linked_pdf(doc, node, page_id, errors)
                {
                    out.push_str(&format!(
                        r#"<p><canvas data-pdfurl="/attachments/{attachment_id}"></canvas>&nbsp;</p>"#
                    ));
                    return;
                }
                if let Some(href) = doc.attr(node, "href")
                    && is_internal_link(href)
                {
                    rewrite = self.link_slug(href, errors).map(|value| Rewrite {
                        name: "href",
                        value,
                    });
                }
            }
            "img" if page_id.is_some() => {
                if let Some(src) = doc.attr(node, "src")
                    && images::is_local_image(src)
                {
                    rewrite = self.inline_image(src, errors).map(|value| Rewrite {
                        name: "src",
                        value,
                    });
                }
            }
            _ => {}
        }

        out.push('<');
        out.push_str(tag);
        for attr in doc.attrs(node) {
            if !ALLOWED_ATTRIBUTES.contains(&attr.name.as_str()) {
                continue;
            }
            let value = match &rewrite {
                Some(r) if r.name == attr.name => r.value.as_str(),
                _ => attr.value.as_str(),
            };
            out.push(' ');
            out.push_str(&attr.name);
            out.push_str("=\"");
            escape_attr(value, out);
            out.push('"');
        }

        if is_void_element(tag) {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if is_raw_text_element(tag) {
            for child in doc.children(node) {
                if let NodeData::Text(text) = doc.data(child) {
                    out.push_str(text.trim());
                }
            }
        } else {
            for child in doc.children(node) {
                self.rebuild(doc, child, page_id, errors, out);
            }
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    /// Upload the PDF behind a Confluence file link.
    fn upload_linked_pdf(
        &mut self,
        doc: &Document,
        link: NodeId,
        page_id: u64,
        errors: &mut ErrorLog,
    ) -> Option<u64> {
        let container_id = doc
            .attr(link, "data-linked-resource-container-id")
            .unwrap_or_default();
        let resource_id = doc
            .attr(link, "data-linked-resource-id")
            .unwrap_or_default();
        let href = format!("attachments/{container_id}/{resource_id}.pdf");
        let filename = match doc.attr(link, "data-linked-resource-default-alias") {
            Some(alias) if !alias.is_empty() => alias.to_owned(),
            _ => format!("{resource_id}.pdf"),
        };
        self.attachments
            .upload(self.store, &self.files, page_id, &href, &filename, errors)
    }

    /// Read a local image into a `data:` URL.
    fn inline_image(&self, src: &str, errors: &mut ErrorLog) -> Option<String> {
        match self.files.bytes(src) {
            Ok(bytes) => Some(images::data_url(src, &bytes)),
            Err(e) => {
                errors.record(self.files.resolve(src).display().to_string(), e);
                None
            }
        }
    }
}
