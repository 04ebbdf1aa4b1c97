//! Paramstage Storage Layer
//!
//! This crate defines the storage medium contract used by the paramstage
//! configuration core, together with two backends.
//!
//! # Features
//!
//! - **Storage Medium Trait**: named files of typed key/value pairs, with
//!   existence, completeness and delete probes
//! - **Typed Values**: a closed set of primitive kinds (integers of several
//!   widths, floats, booleans, strings) with typed reads and writes
//! - **Scoped File Handles**: one open file per medium, closed on every exit path
//! - **Multiple Backends**: redb (persistent) and in-memory adapters
//!
//! # Example
//!
//! ```rust
//! use paramstage_storage::{FileMode, InMemoryMedium, StorageMedium};
//!
//! let mut medium = InMemoryMedium::new();
//!
//! let mut file = medium.open("display", FileMode::Write).unwrap();
//! file.write("brightness", 7u8).unwrap();
//! file.dispose().unwrap();
//!
//! let file = medium.open("display", FileMode::Read).unwrap();
//! assert_eq!(file.read("brightness", 0u8).unwrap(), 7);
//! ```
//!
//! # Storage Backends
//!
//! ## RedbMedium
//!
//! Uses [redb](https://crates.io/crates/redb), a pure-Rust embedded database
//! with ACID transactions. Each file is committed atomically on close.
//!
//! ## InMemoryMedium
//!
//! A simple in-memory implementation for testing and development.
//! Data is not persisted across restarts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod handle;
mod medium;
mod memory;
mod redb;
mod types;

// Re-export core types
pub use error::{StorageError, StorageResult};
pub use handle::FileHandle;
pub use medium::StorageMedium;
pub use memory::InMemoryMedium;
pub use crate::redb::RedbMedium;
pub use types::{FileMode, StorageValue, StoredValue, ValueKind};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{StorageError, StorageResult};
    pub use crate::handle::FileHandle;
    pub use crate::medium::StorageMedium;
    pub use crate::memory::InMemoryMedium;
    pub use crate::redb::RedbMedium;
    pub use crate::types::{FileMode, StoredValue};
}
