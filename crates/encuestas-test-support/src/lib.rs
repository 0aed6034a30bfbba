//! Shared test mocks and utilities for the Encuestas forms backend.

mod clock;
mod logging;
mod repository;
mod rng;

pub use clock::{FixedClock, SteppingClock, fixed_now};
pub use logging::init_tracing;
pub use repository::{FailingRepository, InMemoryRepository};
pub use rng::{MockRng, SequenceRng};
