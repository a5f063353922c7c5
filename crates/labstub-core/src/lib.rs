//! labstub core library.
//!
//! Extracts action and assistant signatures from Python sources with
//! tree-sitter, reconciles assistant stubs against the remote schema, and
//! regenerates the adapter action and assistant stub files.

pub mod config;
pub mod errors;
pub mod filesystem;
pub mod generate;
pub mod models;
pub mod naming;
pub mod parser;
pub mod pipeline;
pub mod reconcile;
pub mod remote;

pub use config::Config;
pub use errors::{LabstubError, LabstubResult};
pub use pipeline::Context;
