use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Listing page {page} of mode '{mode}' failed: {source}")]
    ListingPage {
        mode: String,
        page: u32,
        #[source]
        source: Box<SyncError>,
    },

    #[error("No detail available for '{0}'")]
    NotFound(String),

    #[error("Malformed flight time '{0}'")]
    MalformedDuration(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Worker pool failure: {0}")]
    Pool(String),

    #[error("Unknown game mode '{0}'")]
    UnknownMode(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Encode error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Task-local errors are recorded against one identity and never abort
    /// a category sync; everything else unwinds the current run.
    pub fn is_task_local(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::MalformedDuration(_) | Self::Transport(_)
        )
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
