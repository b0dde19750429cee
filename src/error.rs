use thiserror::Error;

/// Everything that can terminate a run early. Unknown events, unknown
/// actions and unsubscribed features are *not* errors, they simply produce
/// no message.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The `event` input could not be parsed, or is missing required fields.
    #[error("{0}")]
    Config(String),

    /// A GitHub read call failed (transport error or non-2xx status).
    #[error("GitHub API error (message: {0}).")]
    GitHubFetch(String),

    /// Slack rejected the `chat.postMessage` call.
    #[error("Slack API error (message: {0}).")]
    SlackPublish(String),
}
