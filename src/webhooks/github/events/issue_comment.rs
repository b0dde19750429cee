use serde::Deserialize;

use crate::webhooks::github::events::{Comment, GitHubUser, Issue, Repository};

#[derive(Debug, Deserialize)]
pub struct IssueCommentEvent {
    pub repository: Repository,
    pub sender: GitHubUser,
    pub issue: Issue,
    pub comment: Comment,
    pub action: String,
}
