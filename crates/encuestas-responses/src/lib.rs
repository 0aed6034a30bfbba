//! Encuestas — Response Collection bounded context.
//!
//! Responsible for respondents filling in published forms: starting a
//! submission under the form's response rules, saving answers per question
//! kind, and validating everything on submit.

pub mod application;
pub mod domain;
