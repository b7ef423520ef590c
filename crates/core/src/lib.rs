//! Domain types and pure logic for the tsumi backlog tracker.
//!
//! Nothing in this crate performs I/O. The repository layer (`tsumi-db`),
//! the catalog adapters (`tsumi-catalog`) and the HTTP server (`tsumi-api`)
//! all build on the types defined here.

pub mod calendar;
pub mod catalog;
pub mod dedup;
pub mod error;
pub mod item;
pub mod stats;
pub mod transition;
pub mod types;
