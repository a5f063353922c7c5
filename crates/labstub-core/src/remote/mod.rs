//! Remote schema access: the GraphQL client and its retry policy.

pub mod client;
pub mod queries;
pub mod retry;

pub use client::{GraphQlClient, SchemaSource};
pub use retry::RetryConfig;
