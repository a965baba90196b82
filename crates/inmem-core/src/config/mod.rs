//! Backend configuration and config/seed file parsing.

pub mod backend;
pub mod error;
pub mod parser;
