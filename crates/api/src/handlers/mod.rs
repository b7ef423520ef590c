pub mod backlog;
pub mod search;
pub mod stats;
