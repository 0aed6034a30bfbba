//! Application services for the Campaign Lifecycle context.

pub mod command_handlers;
pub mod query_handlers;
