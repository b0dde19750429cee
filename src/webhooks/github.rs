use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::NotifyError;

pub mod events;
pub use events::*;

#[derive(Debug)]
pub enum GitHubEvent {
    PullRequest(PullRequestEvent),
    Issues(IssuesEvent),
    PullRequestReview(PullRequestReviewEvent),
    IssueComment(IssueCommentEvent),
}

/// Parses the raw `event` input into a typed event.
///
/// Unknown event names yield `Ok(None)`: webhooks the integration doesn't
/// understand must not fail the run. Malformed JSON and payloads without a
/// `repository` object are configuration errors.
pub fn parse_event(event_name: &str, payload: &str) -> Result<Option<GitHubEvent>, NotifyError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|_| NotifyError::Config("JSON parse error. \"event\" input is invalid.".into()))?;

    if value.get("repository").map_or(true, |r| r.is_null()) {
        return Err(NotifyError::Config("\"event\" input is invalid.".into()));
    }

    let event = match event_name {
        "pull_request" => GitHubEvent::PullRequest(payload_event(value)?),
        "issues" => GitHubEvent::Issues(payload_event(value)?),
        "pull_request_review" => GitHubEvent::PullRequestReview(payload_event(value)?),
        "issue_comment" => GitHubEvent::IssueComment(payload_event(value)?),
        _ => {
            debug!("ignoring unhandled event {}", event_name);
            return Ok(None);
        }
    };

    Ok(Some(event))
}

fn payload_event<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, NotifyError> {
    serde_json::from_value(value)
        .map_err(|e| NotifyError::Config(format!("\"event\" input is invalid: {}.", e)))
}
