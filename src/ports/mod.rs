//! Port traits defining external boundaries.
//!
//! Each trait is a boundary between the menu editor and something it does
//! not own: the persistence backend, the filesystem, and id allocation.
//! Implementations live in `src/adapters/`.

pub mod backend;
pub mod filesystem;
pub mod id_gen;

pub use backend::{BackendFuture, MenuBackend};
pub use filesystem::FileSystem;
pub use id_gen::IdGenerator;
