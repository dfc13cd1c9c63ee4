use snafu::{OptionExt, ensure};
use tracing::debug;

use crate::filesystem::error::{AtRootSnafu, FsError, InvalidPathSnafu, NotFoundSnafu};
use crate::filesystem::tree::ROOT_NAME;
use crate::filesystem::{NodeId, NodeKind, Tree};

const SEPARATOR: char = '/';
const CURRENT_DIR: &str = ".";
const PARENT_DIR: &str = "..";

/// Joins `path` onto `base` and collapses `.` and `..` segments.
///
/// Absolute paths ignore `base`. The result lists the segments below the
/// root, so an empty result is the root itself. Climbing above the root is
/// an `InvalidPath` error rather than being clamped.
pub fn normalize(base: &[String], path: &str) -> Result<Vec<String>, FsError> {
    let mut segments = if path.starts_with(SEPARATOR) {
        Vec::new()
    } else {
        base.to_vec()
    };

    for segment in path.split(SEPARATOR) {
        match segment {
            "" | CURRENT_DIR => {}
            PARENT_DIR => {
                segments.pop().context(InvalidPathSnafu { path })?;
            }
            name => segments.push(name.to_string()),
        }
    }

    Ok(segments)
}

impl Tree {
    /// Segments from the root down to `id`, the root itself excluded.
    pub fn segments(&self, id: NodeId) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = self.node(id);
        while let Some(node) = current {
            let Some(parent) = node.parent() else {
                break;
            };
            segments.push(node.name().to_string());
            current = self.node(parent);
        }
        segments.reverse();
        segments
    }

    /// Resolves `path` relative to the directory `from` into a directory.
    ///
    /// `/` is always the root and `..` alone is the parent of `from`, failing
    /// at the root. Anything else is normalized against the absolute path of
    /// `from` and walked one directory per segment starting at the root.
    pub fn resolve(&self, from: NodeId, path: &str) -> Result<NodeId, FsError> {
        let from_node = self.directory(from)?;

        if path == ROOT_NAME {
            return Ok(self.root());
        }
        if path == PARENT_DIR {
            return from_node.parent().context(AtRootSnafu);
        }

        ensure!(!path.is_empty(), InvalidPathSnafu { path });
        let segments = normalize(&self.segments(from), path)?;
        debug!("Normalized '{}' to {:?}", path, segments);

        segments.iter().try_fold(self.root(), |dir, segment| {
            self.child(dir, segment)
                .filter(|&id| self.node(id).is_some_and(|node| node.is_directory()))
                .context(NotFoundSnafu {
                    name: segment.as_str(),
                    kind: NodeKind::Directory,
                })
        })
    }
}
