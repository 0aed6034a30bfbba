//! Command abstractions.

use uuid::Uuid;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;
}

/// Implements [`Command`] for a struct carrying a `correlation_id: Uuid`
/// field.
///
/// ```ignore
/// encuestas_core::impl_command!(RenameForm, "forms.rename_form");
/// ```
#[macro_export]
macro_rules! impl_command {
    ($ty:ty, $name:literal) => {
        impl $crate::command::Command for $ty {
            fn command_type(&self) -> &'static str {
                $name
            }

            fn correlation_id(&self) -> ::uuid::Uuid {
                self.correlation_id
            }
        }
    };
}
