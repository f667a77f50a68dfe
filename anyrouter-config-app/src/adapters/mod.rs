//! Platform storage adapters for non-browser frontends (CLI, tests).

mod json_file_store;

pub use json_file_store::JsonFileStore;
