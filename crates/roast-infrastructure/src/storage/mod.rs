//! Storage layer for atomic file operations.

mod atomic_file;
mod config_storage;
mod secret_storage;

pub use atomic_file::AtomicFile;
pub use config_storage::ConfigStorage;
pub use secret_storage::SecretStorage;
