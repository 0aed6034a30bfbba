//! Encuestas — Campaign Lifecycle bounded context.
//!
//! Responsible for campaign identity, scheduling and the
//! draft → active → closed → archived lifecycle.

pub mod application;
pub mod domain;
