//! Domain model for the Form Authoring context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod ports;
pub mod public_link;
pub mod sections;
pub mod value_objects;
