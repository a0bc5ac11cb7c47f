mod file_storage;
mod models;

pub use file_storage::{ConfigStorage, ConfigStorageError};
pub use models::*;
