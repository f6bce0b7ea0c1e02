//! Live adapters for real external interactions.

pub mod file_store;
pub mod filesystem;
pub mod http;
pub mod id_gen;

pub use file_store::FileMenuBackend;
pub use filesystem::LiveFileSystem;
pub use http::HttpMenuBackend;
pub use id_gen::LiveIdGenerator;
