// Chart of Accounts Ledger - Core Library
// Charts, account trees, tag rules and their persistence over a key-value store

pub mod codec;
pub mod config;
pub mod entities;
pub mod error;
pub mod ids;
pub mod repository;
pub mod store;
pub mod taxonomy;
pub mod validator;

// Re-export commonly used types
pub use config::StoreConfig;
pub use entities::{Account, Chart, Tags};
pub use error::{LedgerError, LedgerResult};
pub use ids::{IdGenerator, UuidGenerator};
pub use repository::{accounts_key, ChartRepository, CHARTS_KEY};
pub use store::{KeyValueStore, MemoryStore};
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
pub use taxonomy::{TagCategory, TagDefinition, TagTaxonomy};
pub use validator::{ValidationError, ValidationResult, Validator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
