use serde::Deserialize;
use url::Url;

mod issue_comment;
mod issues;
mod pull_request;
mod pull_request_review;

pub use issue_comment::*;
pub use issues::*;
pub use pull_request::*;
pub use pull_request_review::*;

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub html_url: Option<Url>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub html_url: Url,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: Url,
    pub user: GitHubUser,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub merged: bool,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub html_url: Url,
    pub user: GitHubUser,
    // an issue can be a PR, in which case the object contains a
    // `pull_request` key with urls to the PR
    pub pull_request: Option<PullRequestLinks>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestLinks {
    pub html_url: Url,
}

#[derive(Debug, Deserialize)]
pub struct Review {
    pub id: u64,
    pub state: String,
    pub html_url: Url,
}

#[derive(Debug, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub html_url: Url,
}
