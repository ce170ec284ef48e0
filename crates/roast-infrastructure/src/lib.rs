pub mod dto;
pub mod kv_session_repository;
pub mod kv_store;
pub mod paths;
pub mod settings;
pub mod storage;

pub use crate::kv_session_repository::KvSessionRepository;
pub use crate::kv_store::{FileKeyValueStore, InMemoryKeyValueStore};
pub use crate::paths::RoastPaths;
pub use crate::settings::{EnvOverrides, Settings};
