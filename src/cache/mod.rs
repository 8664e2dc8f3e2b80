mod memo;
mod sqlite;

pub use memo::{DEFAULT_CAPACITY, TranslationCache};
pub use sqlite::CacheStore;
