use crate::config::OctoslackConfig;
use crate::error::NotifyError;
use crate::webhooks::github::parse_event;
use crate::webhooks::GitHubEvent;

mod github;
mod github_api;
mod message;
mod mrkdwn;
mod slack;

use github_api::GitHubClient;
use slack::SlackClient;

pub struct Notifier {
    config: OctoslackConfig,
    github: GitHubClient,
    slack: SlackClient,
}

impl Notifier {
    /// Builds the GitHub and Slack clients from the provided configuration.
    pub fn new(config: OctoslackConfig) -> anyhow::Result<Self> {
        let github = GitHubClient::new(&config.github)?;
        let slack = SlackClient::new(config.slack.clone())?;

        Ok(Notifier {
            config,
            github,
            slack,
        })
    }

    /// Parses the configured event and posts whatever messages it maps to.
    ///
    /// Exactly one handler runs per event, except for submitted reviews,
    /// where the review handler runs first and its message timestamp is
    /// passed on as the thread anchor for the review's line comments.
    pub async fn run(&self) -> Result<(), NotifyError> {
        let event = match parse_event(&self.config.event_name, &self.config.event)? {
            Some(event) => event,
            None => return Ok(()),
        };

        match event {
            GitHubEvent::PullRequest(event) => self.handle_pull_request(event).await,
            GitHubEvent::Issues(event) => self.handle_issues(event).await,
            GitHubEvent::PullRequestReview(event) => {
                let review_ts = self.handle_pull_request_review(&event).await?;
                self.handle_review_comments(&event, review_ts).await
            }
            GitHubEvent::IssueComment(event) => self.handle_issue_comment(event).await,
        }
    }
}
