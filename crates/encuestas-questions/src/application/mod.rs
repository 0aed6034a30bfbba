//! Application services for the Question Authoring context.

pub mod command_handlers;
pub mod query_handlers;

#[cfg(test)]
pub(crate) mod test_doubles;
