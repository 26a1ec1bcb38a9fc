use thiserror::Error;

/// Failure that prevents any structure from being extracted from a file.
///
/// Syntax errors and unsupported constructs are not errors at this level;
/// they are recorded as diagnostics on the extracted types.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("failed to load Java grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}

impl ExtractError {
    pub fn parse(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ExtractError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
