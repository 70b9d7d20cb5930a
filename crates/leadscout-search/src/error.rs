use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("City and state are required")]
    MissingGeography,

    #[error("unknown category: '{0}'")]
    UnknownCategory(String),

    #[error("no categories selected")]
    NoCategories,

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Failure reported by a [`crate::LeadSink`] while accepting a page of leads.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error writing leads: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode lead: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("lead sink rejected batch: {0}")]
    Rejected(String),
}
