#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod progression;
pub mod snapshot;
pub mod time;

pub use error::Error;
pub use progression::{Direction, Progression, ProgressionError, ProgressionPhase, ProgressionState};
pub use snapshot::{ProgressSnapshot, SnapshotError, SNAPSHOT_VERSION};
pub use time::Clock;
