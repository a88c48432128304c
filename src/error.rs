use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for item construction, project files, and the demo terminal.
///
/// The tree index itself never returns these: out-of-range rows and broken
/// pre-order invariants are programmer errors and panic, while I/O failures
/// during `children()` are logged and resolved to an empty listing.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Malformed project definition file.
    #[error("Project file error: {0}")]
    Project(#[from] toml::de::Error),

    /// Terminal initialization or event loop errors.
    #[error("Terminal error: {0}")]
    Terminal(String),
}
