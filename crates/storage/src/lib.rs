#![forbid(unsafe_code)]

pub mod fixtures;
pub mod repository;

pub use fixtures::{FixtureError, MockDataset};
pub use repository::{InMemoryRepository, Storage, StorageError};
