use derive_more::{Display, From};
use hashlink::LinkedHashMap;

/// Stable handle of a node inside the [`Tree`](super::Tree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display("#{_0}")]
pub struct NodeId(usize);

impl NodeId {
    pub(super) fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NodeKind {
    #[display("directory")]
    Directory,
    #[display("file")]
    File,
}

/// A single directory or file of the tree.
///
/// Children are keyed by name, so two siblings can never share a name
/// regardless of their kind. Files never have children and directories
/// never carry content.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: LinkedHashMap<String, NodeId>,
    content: String,
}

impl Node {
    pub(super) fn directory(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory,
            parent,
            children: LinkedHashMap::new(),
            content: String::new(),
        }
    }

    pub(super) fn file(name: impl Into<String>, parent: NodeId, content: String) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            parent: Some(parent),
            children: LinkedHashMap::new(),
            content,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Size in bytes of the file content; zero for directories.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub(super) fn children(&self) -> &LinkedHashMap<String, NodeId> {
        &self.children
    }

    pub(super) fn children_mut(&mut self) -> &mut LinkedHashMap<String, NodeId> {
        &mut self.children
    }
}
