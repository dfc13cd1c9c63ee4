use snafu::Snafu;

use crate::filesystem::NodeKind;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FsError {
    #[snafu(display("No {} named '{}' found", kind, name))]
    NotFound { name: String, kind: NodeKind },
    #[snafu(display("Directory or file with the name '{}' already exists", name))]
    AlreadyExists { name: String },
    #[snafu(display("Invalid path specified: {}", path))]
    InvalidPath { path: String },
    #[snafu(display("'{}' is not a directory", path))]
    NotADirectory { path: String },
    #[snafu(display("Already at the root directory"))]
    AtRoot,
    #[snafu(display("File '{}' not created. No content provided", name))]
    EmptyContent { name: String },
    #[snafu(display("'{}' is not a valid name", name))]
    InvalidName { name: String },
}
