//! Domain layer for the todo service.
//!
//! Pure types and rules shared by the store and the HTTP layer: identifiers,
//! timestamps, input validation and pagination. Nothing in here performs I/O.

pub mod clock;
pub mod error;
pub mod pagination;
pub mod todo;
pub mod types;
