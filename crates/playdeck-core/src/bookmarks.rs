//! Bookmark tree source.
//!
//! The bookmark store is an external collaborator: a read-only tree of
//! folders and url-bearing leaves, queried by folder id and never mutated
//! by the core. The production implementation loads the tree from a JSON
//! file; tests build one in memory via [`FileTree::from_roots`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BookmarkError;

/// Opaque external identity of a playable item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A playable unit: id, display title, and a URL the core treats as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub url: String,
}

/// A folder of the bookmark tree (url-less node).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub title: String,
}

/// One node of the bookmark tree as stored on disk.
///
/// Nodes with a `url` are items; nodes without one are folders. Nodes may
/// omit `id` in the file; a UUID is assigned at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BookmarkNode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TreeFile {
    Many(Vec<BookmarkNode>),
    One(BookmarkNode),
}

/// Read-only access to the bookmark tree.
pub trait BookmarkSource {
    /// Resolve a single item by id.
    fn get(&self, id: &ItemId) -> Result<Item, BookmarkError>;

    /// Collect every item under the given folder, depth-first in document
    /// order. This order is significant: it is the queue input order.
    fn collect_items(&self, folder_id: &str) -> Result<Vec<Item>, BookmarkError>;

    /// Every folder of the tree, in document order.
    fn folders(&self) -> Vec<Folder>;
}

/// Bookmark tree backed by a JSON file.
pub struct FileTree {
    roots: Vec<BookmarkNode>,
    items: HashMap<ItemId, Item>,
}

impl FileTree {
    /// Load and index a tree from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a URL is
    /// invalid, or two nodes share an id.
    pub fn load(path: &Path) -> Result<Self, BookmarkError> {
        let content = std::fs::read_to_string(path).map_err(|e| BookmarkError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let parsed: TreeFile =
            serde_json::from_str(&content).map_err(|e| BookmarkError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let roots = match parsed {
            TreeFile::Many(nodes) => nodes,
            TreeFile::One(node) => vec![node],
        };
        Self::from_roots(roots)
    }

    /// Index an in-memory tree. Nodes missing an id get a UUID v4.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid URLs or duplicate ids.
    pub fn from_roots(mut roots: Vec<BookmarkNode>) -> Result<Self, BookmarkError> {
        let mut items = HashMap::new();
        for root in &mut roots {
            index_node(root, &mut items)?;
        }
        Ok(Self { roots, items })
    }

    fn find_node<'a>(nodes: &'a [BookmarkNode], id: &str) -> Option<&'a BookmarkNode> {
        for node in nodes {
            if node.id.as_deref() == Some(id) {
                return Some(node);
            }
            if let Some(found) = Self::find_node(&node.children, id) {
                return Some(found);
            }
        }
        None
    }
}

fn index_node(
    node: &mut BookmarkNode,
    items: &mut HashMap<ItemId, Item>,
) -> Result<(), BookmarkError> {
    if node.id.is_none() {
        node.id = Some(uuid::Uuid::new_v4().to_string());
    }
    if let Some(url) = &node.url {
        url::Url::parse(url).map_err(|e| BookmarkError::InvalidUrl {
            title: node.title.clone(),
            url: url.clone(),
            message: e.to_string(),
        })?;
        let id = ItemId::new(node.id.clone().unwrap_or_default());
        let item = Item {
            id: id.clone(),
            title: node.title.clone(),
            url: url.clone(),
        };
        if items.insert(id.clone(), item).is_some() {
            return Err(BookmarkError::DuplicateId(id));
        }
    }
    for child in &mut node.children {
        index_node(child, items)?;
    }
    Ok(())
}

fn collect_into(node: &BookmarkNode, out: &mut Vec<Item>, items: &HashMap<ItemId, Item>) {
    if let Some(id) = &node.id {
        let id = ItemId::new(id.clone());
        if node.url.is_some() {
            if let Some(item) = items.get(&id) {
                out.push(item.clone());
            }
        }
    }
    for child in &node.children {
        collect_into(child, out, items);
    }
}

fn collect_folders(nodes: &[BookmarkNode], out: &mut Vec<Folder>) {
    for node in nodes {
        if node.url.is_none() {
            out.push(Folder {
                id: node.id.clone().unwrap_or_default(),
                title: node.title.clone(),
            });
        }
        collect_folders(&node.children, out);
    }
}

impl BookmarkSource for FileTree {
    fn get(&self, id: &ItemId) -> Result<Item, BookmarkError> {
        self.items
            .get(id)
            .cloned()
            .ok_or_else(|| BookmarkError::UnknownItem(id.clone()))
    }

    fn collect_items(&self, folder_id: &str) -> Result<Vec<Item>, BookmarkError> {
        let folder = Self::find_node(&self.roots, folder_id)
            .ok_or_else(|| BookmarkError::UnknownFolder(folder_id.to_string()))?;
        let mut out = Vec::new();
        collect_into(folder, &mut out, &self.items);
        Ok(out)
    }

    fn folders(&self) -> Vec<Folder> {
        let mut out = Vec::new();
        collect_folders(&self.roots, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, title: &str, url: &str) -> BookmarkNode {
        BookmarkNode {
            id: Some(id.into()),
            title: title.into(),
            url: Some(url.into()),
            children: Vec::new(),
        }
    }

    fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> BookmarkNode {
        BookmarkNode {
            id: Some(id.into()),
            title: title.into(),
            url: None,
            children,
        }
    }

    fn sample_tree() -> FileTree {
        FileTree::from_roots(vec![folder(
            "root",
            "Games",
            vec![
                leaf("a", "Wordle", "https://example.com/wordle"),
                folder(
                    "sub",
                    "Geo",
                    vec![leaf("b", "Globe", "https://example.com/globe")],
                ),
                leaf("c", "Quiz", "https://example.com/quiz"),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn collect_preserves_document_order() {
        let tree = sample_tree();
        let items = tree.collect_items("root").unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn collect_from_subfolder() {
        let tree = sample_tree();
        let items = tree.collect_items("sub").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Globe");
    }

    #[test]
    fn unknown_folder_is_an_error() {
        let tree = sample_tree();
        assert!(matches!(
            tree.collect_items("nope"),
            Err(BookmarkError::UnknownFolder(_))
        ));
    }

    #[test]
    fn get_resolves_and_rejects() {
        let tree = sample_tree();
        assert_eq!(tree.get(&"a".into()).unwrap().title, "Wordle");
        assert!(matches!(
            tree.get(&"zzz".into()),
            Err(BookmarkError::UnknownItem(_))
        ));
    }

    #[test]
    fn folders_lists_every_urlless_node() {
        let tree = sample_tree();
        let folders = tree.folders();
        let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["root", "sub"]);
    }

    #[test]
    fn missing_ids_are_assigned() {
        let tree = FileTree::from_roots(vec![BookmarkNode {
            id: None,
            title: "Game".into(),
            url: Some("https://example.com".into()),
            children: Vec::new(),
        }])
        .unwrap();
        let items = tree.folders();
        assert!(items.is_empty());
        assert_eq!(tree.items.len(), 1);
        let id = tree.items.keys().next().unwrap();
        assert!(!id.as_str().is_empty());
    }

    #[test]
    fn invalid_url_rejected_at_load() {
        let result = FileTree::from_roots(vec![leaf("x", "Broken", "not a url")]);
        assert!(matches!(result, Err(BookmarkError::InvalidUrl { .. })));
    }

    #[test]
    fn duplicate_ids_rejected_at_load() {
        let result = FileTree::from_roots(vec![
            leaf("x", "One", "https://example.com/1"),
            leaf("x", "Two", "https://example.com/2"),
        ]);
        assert!(matches!(result, Err(BookmarkError::DuplicateId(_))));
    }

    #[test]
    fn load_accepts_single_root_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        std::fs::write(
            &path,
            r#"{"id":"root","title":"Games","children":[{"id":"a","title":"Wordle","url":"https://example.com/wordle"}]}"#,
        )
        .unwrap();
        let tree = FileTree::load(&path).unwrap();
        assert_eq!(tree.collect_items("root").unwrap().len(), 1);
    }
}
