//! # Repository Modules
//!
//! One repository per aggregate. Each wraps the shared `SqlitePool` and
//! exposes the queries its screens need, nothing more.

pub mod invoice;
pub mod partner;
pub mod product;
pub mod user;
