//! Progress state and termination

pub mod progress;

pub use progress::{ProgressState, ProgressTracker};
