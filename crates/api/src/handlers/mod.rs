//! Request handlers.
//!
//! Handlers validate input through `todos_core`, delegate persistence to the
//! `TodoRepo` in [`AppState`](crate::state::AppState), and map errors via
//! [`AppError`](crate::error::AppError).

pub mod todos;
