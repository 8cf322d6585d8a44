//! Key-value storage adapters.
//!
//! - [`SharedMemoryStorage`] models one origin's `localStorage` shared by
//!   several open pages, each attached through its own context handle.
//! - [`FileStorage`] persists a single context's entries as a JSON object on
//!   disk for the command-line driver.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::{MemoryStorage, SharedMemoryStorage};
