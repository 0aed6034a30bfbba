//! Application services for the Form Authoring context.

pub mod command_handlers;
pub mod query_handlers;
pub mod section_handlers;

#[cfg(test)]
pub(crate) mod test_doubles;
