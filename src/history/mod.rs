// src/history/mod.rs

pub mod checksum;
pub mod state;
pub mod store;

pub use checksum::{digest_files, sha1_file, ChecksumGate, Gate};
pub use state::{artifact_key, StateKey, ARTIFACT_PREFIX};
pub use store::StateStore;
