mod artifact;
mod report;

pub use artifact::{write_artifact, Artifact, WriteError};
pub use report::Statistics;
