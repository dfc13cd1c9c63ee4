//! In-memory directory tree.
//!
//! Nodes live in an arena owned by [`Tree`] and refer to each other by
//! [`NodeId`]. Paths are resolved segment by segment starting at the root.

mod error;
mod node;
mod path_resolver;
mod tree;

pub use error::FsError;
pub use node::{Node, NodeId, NodeKind};
pub use tree::{Listing, Tree};
