//! Domain model for the Response Collection context.

pub mod aggregates;
pub mod answers;
pub mod commands;
pub mod events;
pub mod policy;
pub mod ports;
pub mod validation;
pub mod value_objects;
