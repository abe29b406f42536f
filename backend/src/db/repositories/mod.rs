//! Cache repository implementations.
//!
//! - `local`: in-memory implementation for tests and ephemeral servers
//! - `filesystem`: one JSON record per key under a cache directory
pub mod filesystem;
pub mod local;

pub use filesystem::FilesystemRepository;
pub use local::LocalRepository;
