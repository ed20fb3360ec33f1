//! File-backed instance directory.
//!
//! Every instance lives in its own JSON document under a root folder, so processes
//! naming different instances never rewrite each other's state.
mod error;
pub use error::StoreError;

mod file;
pub use file::FileDirectory;
