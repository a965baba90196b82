//! Core data types: records, the database, requests and responses.

pub mod database;
pub mod record;
pub mod request;
pub mod response;
