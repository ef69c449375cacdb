//! Folder tree reconstruction for the QBank client.
//!
//! The service returns folders as a flat list where every folder carries its
//! place in the folder universe as a tree string (see [`TreePath`]). This
//! module turns such a batch back into a forest of nested [`FolderNode`]s.
//!
//! A batch does not have to start at the root of the folder universe. The
//! shallowest path found in the batch (the "shortest tree") is treated as the
//! local root level, so a subtree fetched from an arbitrary folder builds the
//! same way as the whole universe does.
//!
//! Building aborts on the first broken chain: a partially built forest is
//! never returned.

use crate::format::{CsvRecordProducer, FormattingError, OutputFormat, OutputFormatter};
use crate::model::{FolderId, FolderList, FolderRecord, FolderSummary, TreePath};
use ptree::TreeBuilder;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use tracing::trace;

/// Errors raised while parsing tree strings or assembling a folder forest
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FolderTreeError {
    /// The tree string holds no ids, or a segment is not a hexadecimal id
    #[error("malformed folder tree {tree:?}")]
    MalformedPath { tree: String },
    /// An ancestor expected on the folder's path is not part of the forest
    #[error("cannot place folder {folder_id} (parent {parent_id}) in the tree; last resolved ancestor: {}", display_ancestor(.last_resolved))]
    MissingAncestor {
        folder_id: FolderId,
        parent_id: FolderId,
        last_resolved: Option<FolderId>,
    },
    /// The folder was about to be attached to a node that is not its parent
    #[error("folder {folder_id} has parent {parent_id} and cannot be a child of folder {expected_parent_id}")]
    ParentMismatch {
        folder_id: FolderId,
        parent_id: FolderId,
        expected_parent_id: FolderId,
    },
    /// The same folder id occurs more than once in a batch
    #[error("folder {folder_id} occurs more than once")]
    DuplicateFolder { folder_id: FolderId },
}

fn display_ancestor(ancestor: &Option<FolderId>) -> String {
    match ancestor {
        Some(id) => id.to_string(),
        None => "none".to_string(),
    }
}

/// A folder together with the subfolders placed under it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderNode {
    #[serde(flatten)]
    folder: FolderRecord,
    #[serde(serialize_with = "serialize_children")]
    children: BTreeMap<FolderId, FolderNode>,
}

fn serialize_children<S>(
    children: &BTreeMap<FolderId, FolderNode>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(children.values())
}

impl FolderNode {
    /// Create a childless node from a folder record
    pub fn new(folder: FolderRecord) -> Self {
        Self {
            folder,
            children: BTreeMap::new(),
        }
    }

    pub fn folder(&self) -> &FolderRecord {
        &self.folder
    }

    pub fn into_folder(self) -> FolderRecord {
        self.folder
    }

    pub fn id(&self) -> FolderId {
        self.folder.id()
    }

    pub fn parent_id(&self) -> FolderId {
        self.folder.parent_id()
    }

    pub fn name(&self) -> &str {
        self.folder.name()
    }

    pub fn tree(&self) -> &TreePath {
        self.folder.tree()
    }

    /// Direct subfolders keyed by their id
    pub fn children(&self) -> &BTreeMap<FolderId, FolderNode> {
        &self.children
    }

    /// Get a direct subfolder by id
    pub fn child(&self, id: FolderId) -> Option<&FolderNode> {
        self.children.get(&id)
    }

    /// Number of folders below this node, at any depth
    pub fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Attach a subfolder to this node.
    ///
    /// The child's parent id (taken from its tree string) must equal this
    /// node's id. A mismatch is an error and the child is not attached.
    ///
    /// # Errors
    /// * `ParentMismatch` - if `child` does not belong under this node
    /// * `DuplicateFolder` - if a subfolder with the same id is already present
    pub fn add_child(&mut self, child: FolderNode) -> Result<(), FolderTreeError> {
        if child.parent_id() != self.id() {
            return Err(FolderTreeError::ParentMismatch {
                folder_id: child.id(),
                parent_id: child.parent_id(),
                expected_parent_id: self.id(),
            });
        }

        if self.children.contains_key(&child.id()) {
            return Err(FolderTreeError::DuplicateFolder {
                folder_id: child.id(),
            });
        }

        self.children.insert(child.id(), child);
        Ok(())
    }

    fn find(&self, id: FolderId) -> Option<&FolderNode> {
        if self.id() == id {
            return Some(self);
        }
        self.children.values().find_map(|child| child.find(id))
    }
}

/// A set of independent root folders and everything nested under them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FolderForest {
    roots: BTreeMap<FolderId, FolderNode>,
    root_depth: usize,
}

impl FolderForest {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Root folders keyed by their id
    pub fn roots(&self) -> &BTreeMap<FolderId, FolderNode> {
        &self.roots
    }

    pub fn into_roots(self) -> BTreeMap<FolderId, FolderNode> {
        self.roots
    }

    /// Path length of the root folders, 0 for an empty forest
    pub fn root_depth(&self) -> usize {
        self.root_depth
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of folders in the forest
    pub fn len(&self) -> usize {
        self.roots
            .values()
            .map(|root| 1 + root.descendant_count())
            .sum()
    }

    /// Find a folder anywhere in the forest by its id
    pub fn get(&self, id: FolderId) -> Option<&FolderNode> {
        self.roots.values().find_map(|root| root.find(id))
    }

    /// Find a folder by its name path
    ///
    /// # Arguments
    /// * `path` - Folder names separated by `/`, starting at a root (e.g., "Root/Child/Grandchild")
    ///
    /// # Returns
    /// * `Some(&FolderNode)` - If a folder with the specified path exists
    /// * `None` - If no folder with the specified path exists
    pub fn find_by_name_path(&self, path: &str) -> Option<&FolderNode> {
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        let (first, rest) = parts.split_first()?;

        let mut current = self.roots.values().find(|node| node.name() == *first)?;
        for part in rest {
            current = current.children.values().find(|node| node.name() == *part)?;
        }
        Some(current)
    }

    /// Iterate over all folders depth-first, parents before their children
    pub fn iter(&self) -> Descendants<'_> {
        Descendants {
            stack: self.roots.values().rev().collect(),
        }
    }

    /// Flatten the forest into a list of folders with their name paths
    pub fn to_folder_list(&self) -> FolderList {
        let mut list = FolderList::empty();
        for root in self.roots.values() {
            collect_summaries(root, "", &mut list);
        }
        list
    }

    /// Render the forest as an indented text tree, siblings sorted by name
    pub fn write_tree<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for root in sorted_by_name(&self.roots) {
            let mut tree = TreeBuilder::new(root.name().to_string());
            for child in sorted_by_name(&root.children) {
                build_tree_node(&mut tree, child);
            }
            ptree::write_tree(&tree.build(), &mut *writer)?;
        }
        Ok(())
    }
}

impl From<FolderNode> for FolderForest {
    fn from(root: FolderNode) -> Self {
        let root_depth = root.tree().len();
        let mut roots = BTreeMap::new();
        roots.insert(root.id(), root);
        FolderForest { roots, root_depth }
    }
}

impl<'a> IntoIterator for &'a FolderForest {
    type Item = &'a FolderNode;
    type IntoIter = Descendants<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first iterator over the folders of a [`FolderForest`]
pub struct Descendants<'a> {
    stack: Vec<&'a FolderNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a FolderNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.values().rev());
        Some(node)
    }
}

fn collect_summaries(node: &FolderNode, parent_path: &str, list: &mut FolderList) {
    let path = if parent_path.is_empty() {
        node.name().to_string()
    } else {
        format!("{}/{}", parent_path, node.name())
    };
    list.insert(FolderSummary::new(node.folder(), path.clone()));
    for child in node.children.values() {
        collect_summaries(child, &path, list);
    }
}

fn sorted_by_name(nodes: &BTreeMap<FolderId, FolderNode>) -> Vec<&FolderNode> {
    let mut sorted: Vec<&FolderNode> = nodes.values().collect();
    sorted.sort_by(|a, b| a.name().cmp(b.name()));
    sorted
}

fn build_tree_node(tree: &mut TreeBuilder, node: &FolderNode) {
    tree.begin_child(node.name().to_string());
    for child in sorted_by_name(&node.children) {
        build_tree_node(tree, child);
    }
    tree.end_child();
}

impl Serialize for FolderForest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.roots.values())
    }
}

impl OutputFormatter for FolderForest {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        match format {
            OutputFormat::Json(options) => {
                if options.pretty {
                    Ok(serde_json::to_string_pretty(self)?)
                } else {
                    Ok(serde_json::to_string(self)?)
                }
            }
            OutputFormat::Csv(options) => self.to_folder_list().to_csv(options.with_headers),
            OutputFormat::Tree(_) => {
                let mut buffer = Vec::new();
                self.write_tree(&mut buffer)
                    .map_err(|e| FormattingError::FormatFailure { cause: Box::new(e) })?;
                Ok(String::from_utf8(buffer)?)
            }
        }
    }
}

/// Build a folder forest from a flat batch of folder records.
///
/// The batch may be in any order and may start below the root of the folder
/// universe. Folders whose path is as short as the shortest path in the batch
/// become roots; every other folder is placed under its parent.
///
/// # Errors
/// Building stops at the first folder that cannot be placed:
/// * `MissingAncestor` - an ancestor on the folder's path is not in the batch
/// * `ParentMismatch` - the folder would end up under a node that is not its parent
/// * `DuplicateFolder` - the same id occurs twice in the batch
pub fn build_tree<I>(records: I) -> Result<FolderForest, FolderTreeError>
where
    I: IntoIterator<Item = FolderRecord>,
{
    let mut records: Vec<FolderRecord> = records.into_iter().collect();

    // Ancestors sort before their descendants, so parents are always placed first
    records.sort_by(|a, b| a.tree().cmp(b.tree()));

    let root_depth = match shortest_tree(&records) {
        Some(depth) => depth,
        None => {
            trace!("No folders to build a tree from");
            return Ok(FolderForest::empty());
        }
    };
    trace!(
        "Building folder tree from {} folders with root depth {}",
        records.len(),
        root_depth
    );

    let mut seen = HashSet::with_capacity(records.len());
    let mut roots = BTreeMap::new();
    for record in records {
        if !seen.insert(record.id()) {
            return Err(FolderTreeError::DuplicateFolder {
                folder_id: record.id(),
            });
        }
        add_to_tree(&mut roots, record, root_depth)?;
    }

    trace!("Built folder tree with {} root folders", roots.len());
    Ok(FolderForest { roots, root_depth })
}

fn shortest_tree(records: &[FolderRecord]) -> Option<usize> {
    records.iter().map(|record| record.tree().len()).min()
}

fn add_to_tree(
    roots: &mut BTreeMap<FolderId, FolderNode>,
    record: FolderRecord,
    root_depth: usize,
) -> Result<(), FolderTreeError> {
    let segments = record.tree().segments();
    if segments.len() == root_depth {
        roots.insert(record.id(), FolderNode::new(record));
        return Ok(());
    }

    // Ids from the local root down to the direct parent
    let ancestors: Vec<FolderId> = segments[root_depth - 1..segments.len() - 1].to_vec();
    let folder_id = record.id();
    let parent_id = record.parent_id();

    let (root_id, rest) = match ancestors.split_first() {
        Some(split) => split,
        None => {
            return Err(FolderTreeError::MissingAncestor {
                folder_id,
                parent_id,
                last_resolved: None,
            })
        }
    };

    let mut current = roots
        .get_mut(root_id)
        .ok_or(FolderTreeError::MissingAncestor {
            folder_id,
            parent_id,
            last_resolved: None,
        })?;

    for ancestor_id in rest {
        let resolved = current.id();
        current = current
            .children
            .get_mut(ancestor_id)
            .ok_or(FolderTreeError::MissingAncestor {
                folder_id,
                parent_id,
                last_resolved: Some(resolved),
            })?;
    }

    trace!("Adding folder {} under folder {}", folder_id, current.id());
    current.add_child(FolderNode::new(record))
}
