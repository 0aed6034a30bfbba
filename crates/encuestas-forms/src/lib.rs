//! Encuestas — Form Authoring bounded context.
//!
//! Responsible for form configuration and lifecycle, public links, and the
//! ordered sections inside each form.

pub mod application;
pub mod domain;
