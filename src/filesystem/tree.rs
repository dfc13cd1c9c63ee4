use snafu::ensure;
use tracing::debug;

use crate::filesystem::error::{
    AlreadyExistsSnafu, EmptyContentSnafu, FsError, InvalidNameSnafu, NotADirectorySnafu,
    NotFoundSnafu,
};
use crate::filesystem::{Node, NodeId, NodeKind};

/// Name of the root directory, which is also how it renders as a path.
pub const ROOT_NAME: &str = "/";

const ROOT_INDEX: usize = 0;

/// Contents of a directory split into the two groups `ls` shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Empty,
    Entries {
        directories: Vec<String>,
        files: Vec<String>,
    },
}

/// Arena of nodes addressed by [`NodeId`].
///
/// Slot 0 always holds the root directory. Removed nodes leave an empty
/// slot behind, slots are never reused, so a stale handle can be detected
/// with [`Tree::is_live`] instead of silently pointing at a newer node.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Option<Node>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::directory(ROOT_NAME, None))],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::from(ROOT_INDEX)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of nodes reachable from the root, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)
            .and_then(|node| node.children().get(name))
            .copied()
    }

    /// Immediate children in insertion order.
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = (NodeId, &Node)> {
        self.node(parent)
            .into_iter()
            .flat_map(|node| node.children().values())
            .filter_map(|&id| self.node(id).map(|node| (id, node)))
    }

    pub fn child_count(&self, parent: NodeId) -> usize {
        self.node(parent).map_or(0, |node| node.children().len())
    }

    /// Fails with `AlreadyExists` when any child of `parent` already uses `name`.
    pub fn ensure_available(&self, parent: NodeId, name: &str) -> Result<(), FsError> {
        validate_name(name)?;
        self.directory(parent)?;
        ensure!(
            self.child(parent, name).is_none(),
            AlreadyExistsSnafu { name }
        );
        Ok(())
    }

    pub fn mkdir(&mut self, parent: NodeId, name: &str) -> Result<NodeId, FsError> {
        self.ensure_available(parent, name)?;
        let id = self.link(parent, Node::directory(name, Some(parent)));
        debug!("Created directory '{}' as {}", self.full_path(id), id);
        Ok(id)
    }

    /// Links a new file under `parent`. Nothing is linked when `content` is empty.
    pub fn insert_file(
        &mut self,
        parent: NodeId,
        name: &str,
        content: String,
    ) -> Result<NodeId, FsError> {
        self.ensure_available(parent, name)?;
        ensure!(!content.is_empty(), EmptyContentSnafu { name });
        let id = self.link(parent, Node::file(name, parent, content));
        debug!("Created file '{}' as {}", self.full_path(id), id);
        Ok(id)
    }

    /// Detaches the file `name` from `parent`. A directory with that name is not touched.
    pub fn remove_file(&mut self, parent: NodeId, name: &str) -> Result<(), FsError> {
        let id = self.child_of_kind(parent, name, NodeKind::File)?;
        self.detach(parent, name);
        self.nodes[id.index()] = None;
        debug!("Removed file '{}' ({})", name, id);
        Ok(())
    }

    /// Detaches the directory `name` from `parent` and deletes its whole
    /// subtree. Returns the number of nodes deleted, the directory included.
    pub fn remove_dir(&mut self, parent: NodeId, name: &str) -> Result<usize, FsError> {
        let id = self.child_of_kind(parent, name, NodeKind::Directory)?;
        self.detach(parent, name);

        let mut removed = 0;
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes[next.index()].take() {
                pending.extend(node.children().values().copied());
                removed += 1;
            }
        }

        debug!(
            "Removed directory '{}' ({}) with {} nodes, {} nodes left",
            name,
            id,
            removed,
            self.node_count()
        );
        Ok(removed)
    }

    /// Sum of the content sizes of every file below `dir`, at any depth.
    pub fn total_size(&self, dir: NodeId) -> u64 {
        self.children(dir)
            .map(|(id, node)| match node.kind() {
                NodeKind::Directory => self.total_size(id),
                NodeKind::File => node.size(),
            })
            .sum()
    }

    /// Full paths of every descendant of `start` named `name`, depth first,
    /// parents before their children.
    pub fn find(&self, start: NodeId, name: &str) -> Vec<String> {
        let mut found = Vec::new();
        self.find_into(start, name, &mut found);
        found
    }

    fn find_into(&self, dir: NodeId, name: &str, found: &mut Vec<String>) {
        for (id, node) in self.children(dir) {
            if node.name() == name {
                found.push(self.full_path(id));
            }
            if node.is_directory() {
                self.find_into(id, name, found);
            }
        }
    }

    pub fn list(&self, dir: NodeId) -> Listing {
        if self.child_count(dir) == 0 {
            return Listing::Empty;
        }

        let (mut directories, mut files): (Vec<_>, Vec<_>) = self
            .children(dir)
            .map(|(_, node)| node)
            .partition(|node| node.is_directory());

        directories.sort_by(|a, b| a.name().cmp(b.name()));
        files.sort_by(|a, b| a.name().cmp(b.name()));

        Listing::Entries {
            directories: directories.iter().map(|n| n.name().to_string()).collect(),
            files: files.iter().map(|n| n.name().to_string()).collect(),
        }
    }

    /// Absolute path of `id`, `/` for the root.
    pub fn full_path(&self, id: NodeId) -> String {
        let Some(node) = self.node(id) else {
            return String::new();
        };
        match node.parent() {
            None => ROOT_NAME.to_string(),
            Some(parent) => {
                let parent_path = self.full_path(parent);
                if parent_path == ROOT_NAME {
                    format!("{}{}", parent_path, node.name())
                } else {
                    format!("{}/{}", parent_path, node.name())
                }
            }
        }
    }

    pub(super) fn directory(&self, id: NodeId) -> Result<&Node, FsError> {
        match self.node(id) {
            Some(node) if node.is_directory() => Ok(node),
            _ => NotADirectorySnafu {
                path: self.full_path(id),
            }
            .fail(),
        }
    }

    fn child_of_kind(&self, parent: NodeId, name: &str, kind: NodeKind) -> Result<NodeId, FsError> {
        self.child(parent, name)
            .filter(|&id| self.node(id).is_some_and(|node| node.kind() == kind))
            .ok_or_else(|| NotFoundSnafu { name, kind }.build())
    }

    fn link(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId::from(self.nodes.len());
        let name = node.name().to_string();
        self.nodes.push(Some(node));
        if let Some(Some(parent_node)) = self.nodes.get_mut(parent.index()) {
            parent_node.children_mut().insert(name, id);
        }
        id
    }

    fn detach(&mut self, parent: NodeId, name: &str) {
        if let Some(Some(parent_node)) = self.nodes.get_mut(parent.index()) {
            parent_node.children_mut().remove(name);
        }
    }
}

/// Names are single path segments: non-empty, no `/`, and not `.` or `..`.
fn validate_name(name: &str) -> Result<(), FsError> {
    ensure!(
        !name.is_empty() && !name.contains('/') && name != "." && name != "..",
        InvalidNameSnafu { name }
    );
    Ok(())
}
