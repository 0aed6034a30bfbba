//! Domain model for the Campaign Lifecycle context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod value_objects;
