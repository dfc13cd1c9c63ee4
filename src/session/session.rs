use tracing::{debug, warn};

use crate::filesystem::{FsError, Listing, NodeId, NodeKind, Tree};

/// Where a successful `cd` landed, used to pick the confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdOutcome {
    Root,
    Parent(String),
    Other(String),
}

/// The tree together with the directory relative commands operate on.
#[derive(Debug, Clone)]
pub struct Session {
    tree: Tree,
    cwd: NodeId,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let tree = Tree::new();
        let cwd = tree.root();
        Self { tree, cwd }
    }

    #[cfg(test)]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn cwd(&self) -> NodeId {
        self.cwd
    }

    /// Checks that `name` is free in the current directory before any content is collected.
    pub fn ensure_available(&self, name: &str) -> Result<(), FsError> {
        self.tree.ensure_available(self.cwd, name)
    }

    pub fn create_file(&mut self, name: &str, content: String) -> Result<NodeId, FsError> {
        self.tree.insert_file(self.cwd, name, content)
    }

    /// Content of the file `name` in the current directory. Subdirectories are not searched.
    pub fn cat(&self, name: &str) -> Result<&str, FsError> {
        self.tree
            .child(self.cwd, name)
            .and_then(|id| self.tree.node(id))
            .filter(|node| node.is_file())
            .map(|node| node.content())
            .ok_or_else(|| FsError::NotFound {
                name: name.to_string(),
                kind: NodeKind::File,
            })
    }

    pub fn rm(&mut self, name: &str) -> Result<(), FsError> {
        self.tree.remove_file(self.cwd, name)?;
        self.ensure_cwd_live();
        Ok(())
    }

    pub fn mkdir(&mut self, name: &str) -> Result<NodeId, FsError> {
        self.tree.mkdir(self.cwd, name)
    }

    /// Removes the directory `name` and everything below it.
    pub fn rmdir(&mut self, name: &str) -> Result<usize, FsError> {
        let removed = self.tree.remove_dir(self.cwd, name)?;
        self.ensure_cwd_live();
        Ok(removed)
    }

    /// Moves the current directory. On failure the current directory is unchanged.
    pub fn cd(&mut self, path: &str) -> Result<CdOutcome, FsError> {
        let target = self.tree.resolve(self.cwd, path)?;
        let at_root = self.tree.node(target).is_some_and(|node| node.is_root());
        let outcome = if at_root {
            CdOutcome::Root
        } else if path == ".." {
            CdOutcome::Parent(self.name_of(target))
        } else {
            CdOutcome::Other(self.name_of(target))
        };

        debug!("Changed directory from {} to {}", self.cwd, target);
        self.cwd = target;
        Ok(outcome)
    }

    pub fn ls(&self) -> Listing {
        self.tree.list(self.cwd)
    }

    pub fn du(&self) -> u64 {
        self.tree.total_size(self.cwd)
    }

    pub fn pwd(&self) -> String {
        self.tree.full_path(self.cwd)
    }

    pub fn find(&self, name: &str) -> Vec<String> {
        self.tree.find(self.cwd, name)
    }

    fn name_of(&self, id: NodeId) -> String {
        self.tree
            .node(id)
            .map(|node| node.name().to_string())
            .unwrap_or_default()
    }

    fn ensure_cwd_live(&mut self) {
        if !self.tree.is_live(self.cwd) {
            warn!(
                "Current directory {} is no longer part of the tree, returning to root",
                self.cwd
            );
            self.cwd = self.tree.root();
        }
    }
}
