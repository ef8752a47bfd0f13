use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> PathBuf {
    PathBuf::from(".parley")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted settings and cache files
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new() -> Self {
        let data_dir = env::var("PARLEY_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Self { data_dir }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}
