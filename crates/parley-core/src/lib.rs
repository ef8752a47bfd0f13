pub mod cache;
pub mod error;
pub mod guard;
pub mod language;
pub mod phrasebook;
pub mod preprocess;
pub mod settings;
pub mod storage;

pub use cache::{CacheStats, TranslationCache};
pub use error::{SettingsError, StorageError};
pub use guard::{ConcurrencyGuard, InFlight};
pub use language::LanguageDetector;
pub use phrasebook::PhraseBook;
pub use settings::{SettingsChange, SettingsStore};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
