//! GraphQL transport for the studio backend
//!
//! This module provides the request/response plumbing used by every screen:
//! the `GraphQLApi` seam, its reqwest-backed implementation, the Relay
//! connection types and the operation documents the client sends.

pub mod client;
pub mod connection;
pub mod errors;
pub mod queries;

pub use client::{GraphQLApi, GraphQLRequest, HttpGraphQLClient};
pub use connection::{Connection, Edge, PageInfo};
pub use errors::{ApiError, GraphQLErrorMessage};
