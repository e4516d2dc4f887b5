mod github;
mod publish_error;

pub use github::{GithubPublisher, HostingTarget, PublishMode, Published};
pub use publish_error::PublishError;
