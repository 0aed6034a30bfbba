//! Encuestas Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that all bounded
//! contexts depend on: time and randomness sources, the error taxonomy,
//! persistence ports, the lifecycle state machine and the sibling position
//! sequencer. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod position;
pub mod repository;
pub mod rng;
pub mod status;
pub mod text;
