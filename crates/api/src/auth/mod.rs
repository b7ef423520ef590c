//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token validation and issuance.

pub mod jwt;
