//! Domain model for the Question Authoring context.

pub mod aggregates;
pub mod commands;
pub mod ports;
pub mod value_objects;
pub mod variants;
