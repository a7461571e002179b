//! Core types and trait definitions for the Roster student-records service.
//!
//! It has no HTTP or database dependencies. The store, API, server and
//! terminal client all depend on it.

pub mod envelope;
pub mod error;
pub mod mark;
pub mod pagination;
pub mod store;
pub mod student;

pub use error::{Error, Result};
