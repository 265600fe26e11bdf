//! studyhub-api: Shared API types and schemas
//!
//! Contains the response envelope, resource representations, request bodies
//! and OpenAPI schema helpers used across the daemon, client, and CLI.

pub mod envelope;
pub mod requests;
pub mod resources;
pub mod responses;
pub mod schema;

pub use envelope::{Envelope, Error, Paging, PagingLinks, Payload};
