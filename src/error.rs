//! Error types for document access and configuration.

/// Error returned by [`crate::doc::DocStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// The tab's raw text is not valid JSON, or does not match the expected shape.
    #[error("invalid JSON in tab '{tab}': {source}")]
    Parse {
        tab: String,
        #[source]
        source: serde_json::Error,
    },
    /// No tab with this id is open.
    #[error("no such tab: {0}")]
    MissingTab(String),
    /// The tab parsed, but its top-level value is not a JSON object.
    #[error("tab '{0}' does not contain a JSON object")]
    NotAnObject(String),
    /// The entity template text is not valid JSON.
    #[error("invalid entity template: {0}")]
    InvalidTemplate(#[source] serde_json::Error),
    /// The tab cannot be closed.
    #[error("tab '{0}' cannot be closed")]
    ProtectedTab(String),
}

impl DocError {
    /// Build a parse error for `tab`.
    #[must_use]
    pub fn parse(tab: &str, source: serde_json::Error) -> Self {
        Self::Parse { tab: tab.to_owned(), source }
    }
}

/// Error returned by [`crate::config::EditorConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config text is not valid JSON or carries unknown keys.
    #[error("failed to parse editor config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its allowed range.
    #[error("invalid editor config: {0}")]
    Invalid(String),
}
