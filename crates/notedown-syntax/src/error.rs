use thiserror::Error;

/// Structural failure inside the tree builder.
///
/// Well-formed resolver output never triggers this; it guards hand-built or
/// corrupted streams.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("close marker at stream index {index} has no open node to close")]
    UnbalancedClose { index: usize },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("failed to build document tree: {0}")]
    Tree(#[from] TreeError),
}
