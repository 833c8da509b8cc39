//! Studio administration client
//!
//! Paginated list screens and record edit forms over the studio backend's
//! GraphQL API, usable from the command line or the terminal UI.

pub mod admin_tui;
pub mod config;
pub mod forms;
pub mod graphql;
pub mod listing;
pub mod models;
pub mod paging;
pub mod route;

#[cfg(test)]
pub(crate) mod testing;
