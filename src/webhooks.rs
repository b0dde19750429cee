pub mod github;

pub use github::GitHubEvent;
