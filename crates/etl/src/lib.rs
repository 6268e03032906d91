pub mod discover;
pub mod loader;
pub mod log;
pub mod pipeline;
pub mod song;

pub use loader::{FileLoader, LoadStats};
pub use pipeline::{PassSummary, Progress, RunSummary, StdoutProgress};
