//! Row structs and request/query DTOs.

pub mod backlog_item;
