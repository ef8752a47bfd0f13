#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to persist settings: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid target language: {0:?}")]
    InvalidLanguage(String),
}
