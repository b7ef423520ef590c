//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument. Every query on
//! `backlog_items` is scoped by `user_id`.

pub mod backlog_item_repo;

pub use backlog_item_repo::BacklogItemRepo;
