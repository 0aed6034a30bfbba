//! Lifecycle status state machine.
//!
//! Statuses declare their legal successors through [`Lifecycle`]; the
//! functions here decide whether a requested change is a no-op, a legal
//! transition, or an error. Nothing in this module performs I/O.

use std::fmt;

use crate::error::DomainError;

/// A closed set of lifecycle statuses with a fixed transition table.
pub trait Lifecycle: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Statuses reachable from `self` in one step. Empty for terminal
    /// statuses.
    fn allowed_targets(self) -> &'static [Self];

    /// Stable lowercase name, as stored and shown in errors.
    fn as_str(self) -> &'static str;

    /// Whether no further transition is possible.
    fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }
}

/// Outcome of a legal status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S> {
    /// The target equals the current status; the snapshot stays as is.
    Unchanged(S),
    /// The status moves from `from` to `to`.
    Changed {
        /// Status before the change.
        from: S,
        /// Status after the change.
        to: S,
    },
}

impl<S: Copy> Transition<S> {
    /// The status after applying this outcome.
    pub fn target(self) -> S {
        match self {
            Self::Unchanged(status) => status,
            Self::Changed { to, .. } => to,
        }
    }

    /// Whether the status actually changes.
    pub fn is_change(self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Returns `true` if `from -> to` is a listed one-step transition.
///
/// Self-transitions are not listed; [`transition`] handles them separately.
pub fn is_allowed<S: Lifecycle>(from: S, to: S) -> bool {
    from.allowed_targets().contains(&to)
}

/// Decides the outcome of moving `current` to `target`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if `target` differs from
/// `current` and is not an allowed successor.
pub fn transition<S: Lifecycle>(current: S, target: S) -> Result<Transition<S>, DomainError> {
    if current == target {
        return Ok(Transition::Unchanged(current));
    }
    if !is_allowed(current, target) {
        return Err(DomainError::InvalidTransition {
            from: current.as_str().to_owned(),
            to: target.as_str().to_owned(),
        });
    }
    Ok(Transition::Changed {
        from: current,
        to: target,
    })
}

/// Like [`transition`], treating an absent target as illegal.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` with `to = "none"` when `target`
/// is `None`, otherwise as [`transition`].
pub fn transition_to<S: Lifecycle>(
    current: S,
    target: Option<S>,
) -> Result<Transition<S>, DomainError> {
    match target {
        Some(target) => transition(current, target),
        None => Err(DomainError::InvalidTransition {
            from: current.as_str().to_owned(),
            to: "none".to_owned(),
        }),
    }
}
