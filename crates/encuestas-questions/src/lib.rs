//! Encuestas — Question Authoring bounded context.
//!
//! Responsible for the questions inside each section: their kind-specific
//! settings, ordering, and moves between sections of the same form.

pub mod application;
pub mod domain;
