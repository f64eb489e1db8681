//! Table-of-contents parsing for Confluence exports.
//!
//! The export's `index.html` carries the space hierarchy as nested `ul`
//! lists inside its second `div.pageSection`. Each linked list item becomes
//! an [`ExportNode`] whose nesting depth decides the BookStack content kind.

use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::dom::{Document, NodeId};
use crate::report::ErrorLog;

/// File name of the export's table of contents.
pub const INDEX_FILE: &str = "index.html";

/// BookStack content kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentKind {
    Shelf,
    Book,
    Chapter,
    Page,
}

impl ContentKind {
    /// Kind for a nesting depth: 1 is a shelf, 2 a book, 3 a chapter and
    /// anything deeper a page. Depth 0 has no kind.
    #[must_use]
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            0 => None,
            1 => Some(Self::Shelf),
            2 => Some(Self::Book),
            3 => Some(Self::Chapter),
            _ => Some(Self::Page),
        }
    }

    /// API endpoint for objects of this kind.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Shelf => "/shelves",
            Self::Book => "/books",
            Self::Chapter => "/chapters",
            Self::Page => "/pages",
        }
    }

    /// Display name, as used in the `Type` tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shelf => "Shelf",
            Self::Book => "Book",
            Self::Chapter => "Chapter",
            Self::Page => "Page",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the export's table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNode {
    /// Link text, trimmed.
    pub title: String,
    /// Link target relative to the export root.
    pub href: String,
    /// Nesting level, starting at 1.
    pub depth: usize,
    /// Nested entries in document order.
    pub children: Vec<ExportNode>,
}

impl ExportNode {
    /// Content kind derived from the depth.
    #[must_use]
    pub fn kind(&self) -> Option<ContentKind> {
        ContentKind::from_depth(self.depth)
    }
}

/// Error reading or interpreting an index document.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Navigation section not found ({found} pageSection blocks, need 2)")]
    MissingSection { found: usize },

    #[error("Navigation section has no list")]
    MissingList,
}

impl HierarchyError {
    /// Whether the index could not be read at all, as opposed to being read
    /// but lacking the expected structure.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Parse the hierarchy out of index HTML.
///
/// # Errors
///
/// Returns [`HierarchyError::MissingSection`] or
/// [`HierarchyError::MissingList`] if the document lacks the navigation list.
pub fn parse_html(html: &str) -> Result<Vec<ExportNode>, HierarchyError> {
    let doc = Document::parse(html);
    let sections = doc.elements_with_class("div", "pageSection");
    let Some(&section) = sections.get(1) else {
        return Err(HierarchyError::MissingSection {
            found: sections.len(),
        });
    };
    let list = doc
        .find(section, |n| doc.is_tag(n, "ul"))
        .ok_or(HierarchyError::MissingList)?;
    Ok(parse_list(&doc, list, 1))
}

/// Read and parse an index file.
///
/// # Errors
///
/// Returns [`HierarchyError::Io`] if the file cannot be read, or a
/// structural error from [`parse_html`].
pub fn read_index(path: &Path) -> Result<Vec<ExportNode>, HierarchyError> {
    let html = fs::read_to_string(path).map_err(|source| HierarchyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_html(&html)
}

/// Read and parse an index file, degrading to an empty hierarchy.
///
/// Read failures are recorded in `errors`, structural problems are logged as
/// warnings.
pub fn parse_index(path: &Path, errors: &mut ErrorLog) -> Vec<ExportNode> {
    match read_index(path) {
        Ok(nodes) => nodes,
        Err(e) if e.is_io() => {
            errors.record(path.display().to_string(), e);
            Vec::new()
        }
        Err(e) => {
            warn!("{e} in {}", path.display());
            Vec::new()
        }
    }
}

/// Locate the export's `index.html` under `root`.
///
/// Directories are searched breadth first so the shallowest index wins;
/// siblings are visited in name order. Unreadable directories and symlinks
/// are skipped.
#[must_use]
pub fn find_index(root: &Path) -> Option<PathBuf> {
    let mut queue = VecDeque::from([root.to_path_buf()]);
    while let Some(dir) = queue.pop_front() {
        let candidate = dir.join(INDEX_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping {}: {e}", dir.display());
                continue;
            }
        };
        let mut subdirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .map(|entry| entry.path())
            .collect();
        subdirs.sort();
        queue.extend(subdirs);
    }
    None
}

fn parse_list(doc: &Document, list: NodeId, depth: usize) -> Vec<ExportNode> {
    let mut nodes = Vec::new();
    for item in doc.children(list).filter(|&n| doc.is_tag(n, "li")) {
        let Some(link) = doc.find(item, |n| doc.is_tag(n, "a")) else {
            continue;
        };
        let children = doc
            .children(item)
            .filter(|&n| doc.is_tag(n, "ul"))
            .flat_map(|sub| parse_list(doc, sub, depth + 1))
            .collect();
        nodes.push(ExportNode {
            title: doc.text_content(link).trim().to_owned(),
            href: doc.attr(link, "href").unwrap_or_default().to_owned(),
            depth,
            children,
        });
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index(list: &str) -> String {
        format!(
            r#"<html><head><title>Space</title></head><body>
            <div class="pageSection"><h2>Space details</h2></div>
            <div class="pageSection"><h2>Available Pages:</h2>{list}</div>
            </body></html>"#
        )
    }

    fn titles(nodes: &[ExportNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn test_from_depth() {
        assert_eq!(ContentKind::from_depth(0), None);
        assert_eq!(ContentKind::from_depth(1), Some(ContentKind::Shelf));
        assert_eq!(ContentKind::from_depth(2), Some(ContentKind::Book));
        assert_eq!(ContentKind::from_depth(3), Some(ContentKind::Chapter));
        assert_eq!(ContentKind::from_depth(4), Some(ContentKind::Page));
        for depth in 5..12 {
            assert_eq!(ContentKind::from_depth(depth), Some(ContentKind::Page));
        }
    }

    #[test]
    fn test_kind_display_and_endpoint() {
        assert_eq!(ContentKind::Chapter.to_string(), "Chapter");
        assert_eq!(ContentKind::Shelf.endpoint(), "/shelves");
        assert_eq!(ContentKind::Page.endpoint(), "/pages");
    }

    #[test]
    fn test_parse_nested_list() {
        let html = index(
            r#"<ul>
              <li><a href="Space_1.html">Space</a>
                <ul>
                  <li><a href="A_2.html"> Page A </a>
                    <ul><li><a href="A1_3.html">Page A.1</a></li></ul>
                  </li>
                </ul>
              </li>
            </ul>"#,
        );
        let nodes = parse_html(&html).unwrap();
        assert_eq!(
            nodes,
            vec![ExportNode {
                title: "Space".to_owned(),
                href: "Space_1.html".to_owned(),
                depth: 1,
                children: vec![ExportNode {
                    title: "Page A".to_owned(),
                    href: "A_2.html".to_owned(),
                    depth: 2,
                    children: vec![ExportNode {
                        title: "Page A.1".to_owned(),
                        href: "A1_3.html".to_owned(),
                        depth: 3,
                        children: Vec::new(),
                    }],
                }],
            }]
        );
    }

    #[test]
    fn test_parse_preserves_order() {
        let html = index(
            r#"<ul><li><a href="s.html">S</a><ul>
              <li><a href="c.html">C</a></li>
              <li><a href="a.html">A</a></li>
              <li><a href="b.html">B</a></li>
            </ul></li></ul>"#,
        );
        let nodes = parse_html(&html).unwrap();
        assert_eq!(titles(&nodes[0].children), ["C", "A", "B"]);
    }

    #[test]
    fn test_item_without_link_is_skipped() {
        let html = index(
            r#"<ul>
              <li><a href="one.html">One</a></li>
              <li><span>No link</span></li>
              <li><a href="two.html">Two</a></li>
            </ul>"#,
        );
        let nodes = parse_html(&html).unwrap();
        assert_eq!(titles(&nodes), ["One", "Two"]);
        assert!(nodes.iter().all(|n| n.depth == 1));
    }

    #[test]
    fn test_link_without_href() {
        let nodes = parse_html(&index("<ul><li><a>Orphan</a></li></ul>")).unwrap();
        assert_eq!(nodes[0].href, "");
    }

    #[test]
    fn test_only_first_section_is_not_navigation() {
        let html = r#"<div class="pageSection"><ul><li><a href="x.html">X</a></li></ul></div>"#;
        let err = parse_html(html).unwrap_err();
        assert!(matches!(err, HierarchyError::MissingSection { found: 1 }));
        assert!(!err.is_io());
    }

    #[test]
    fn test_section_without_list() {
        let html = r#"<div class="pageSection"></div><div class="pageSection"><p>empty</p></div>"#;
        assert!(matches!(
            parse_html(html).unwrap_err(),
            HierarchyError::MissingList
        ));
    }

    #[test]
    fn test_parse_index_missing_file_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INDEX_FILE);
        let mut errors = ErrorLog::default();

        assert!(parse_index(&path, &mut errors).is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.records()[0].context, path.display().to_string());
        assert!(read_index(&path).unwrap_err().is_io());
    }

    #[test]
    fn test_parse_index_without_navigation_is_only_warned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INDEX_FILE);
        fs::write(&path, r#"<div class="pageSection">only one</div>"#).unwrap();
        let mut errors = ErrorLog::default();

        assert!(parse_index(&path, &mut errors).is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_find_index_prefers_shallowest() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();
        fs::create_dir_all(dir.path().join("z")).unwrap();
        fs::write(deep.join(INDEX_FILE), "").unwrap();
        fs::write(dir.path().join("z").join(INDEX_FILE), "").unwrap();

        assert_eq!(
            find_index(dir.path()),
            Some(dir.path().join("z").join(INDEX_FILE))
        );
    }

    #[test]
    fn test_find_index_sibling_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b", "a"] {
            let sub = dir.path().join(name);
            fs::create_dir_all(&sub).unwrap();
            fs::write(sub.join(INDEX_FILE), "").unwrap();
        }
        assert_eq!(
            find_index(dir.path()),
            Some(dir.path().join("a").join(INDEX_FILE))
        );
    }

    #[test]
    fn test_find_index_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_index(dir.path()), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_index_skips_symlinked_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join(INDEX_FILE), "").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked")).unwrap();

        assert_eq!(find_index(dir.path()), None);
    }
}
