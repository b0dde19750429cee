use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct OctoslackConfig {
    /// Name of the GitHub event being delivered, e.g. `pull_request`.
    pub event_name: String,
    /// Raw JSON payload of the webhook event, exactly as GitHub delivered it.
    pub event: String,
    pub github: GitHubConfig,
    pub slack: SlackConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

#[derive(Debug, Deserialize)]
pub struct GitHubConfig {
    /// Token used to read pull requests, issues, reviews and comments.
    pub token: String,
    /// Base URL of the GitHub REST API.
    #[serde(default = "GitHubConfig::default_api_url")]
    pub api_url: Url,
}

impl GitHubConfig {
    fn default_api_url() -> Url {
        Url::parse("https://api.github.com").expect("static URL")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    /// Bot token used for `chat.postMessage`.
    pub token: String,
    /// Channel the messages are posted to.
    pub channel: String,
    /// Username the messages are posted under.
    #[serde(default = "SlackConfig::default_app_name")]
    pub app_name: String,
    /// Icon image for the posting user. Ignored when `app_emoji` is set.
    #[serde(default)]
    pub app_icon: Option<String>,
    /// Emoji icon for the posting user, e.g. `:octocat:`.
    #[serde(default)]
    pub app_emoji: Option<String>,
    /// Footer text shown under every attachment. May contain Slack markup.
    #[serde(default)]
    pub footer: Option<String>,
    /// Icon shown next to the footer.
    #[serde(default)]
    pub footer_icon: Option<String>,
    /// Base URL of the Slack Web API.
    #[serde(default = "SlackConfig::default_api_url")]
    pub api_url: Url,
}

impl SlackConfig {
    fn default_app_name() -> String {
        "GitHub".to_string()
    }

    fn default_api_url() -> Url {
        Url::parse("https://slack.com/api").expect("static URL")
    }
}

/// Per-kind toggles. Everything defaults to enabled so a minimal
/// configuration only needs credentials, a channel and the event.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub pulls: PullsFeature,
    pub issues: IssuesFeature,
    pub reviews: ReviewsFeature,
    pub pull_comments: PullCommentsFeature,
    pub issue_comments: IssueCommentsFeature,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PullsFeature {
    pub subscribe: bool,
    /// Show the acting user as the attachment author.
    pub show_actor: bool,
    /// Attach commit/file statistics, labels and milestone fields.
    pub show_details: bool,
}

impl Default for PullsFeature {
    fn default() -> Self {
        PullsFeature {
            subscribe: true,
            show_actor: true,
            show_details: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IssuesFeature {
    pub subscribe: bool,
    pub show_actor: bool,
    /// Attach labels and milestone fields.
    pub show_details: bool,
}

impl Default for IssuesFeature {
    fn default() -> Self {
        IssuesFeature {
            subscribe: true,
            show_actor: true,
            show_details: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReviewsFeature {
    pub subscribe: bool,
    pub show_actor: bool,
}

impl Default for ReviewsFeature {
    fn default() -> Self {
        ReviewsFeature {
            subscribe: true,
            show_actor: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PullCommentsFeature {
    pub subscribe: bool,
    pub show_actor: bool,
    /// Thread review line comments under the review message (or under the
    /// first comment of the batch when the review itself posted nothing).
    pub threading: bool,
}

impl Default for PullCommentsFeature {
    fn default() -> Self {
        PullCommentsFeature {
            subscribe: true,
            show_actor: true,
            threading: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IssueCommentsFeature {
    pub subscribe: bool,
    pub show_actor: bool,
}

impl Default for IssueCommentsFeature {
    fn default() -> Self {
        IssueCommentsFeature {
            subscribe: true,
            show_actor: true,
        }
    }
}

/// One template per notified transition. Templates may embed `<actor>` and
/// `<author>` tokens, replaced at publish time, and emoji tokens like
/// `:tada:`, which are passed through verbatim for Slack to render.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub pull_open: String,
    pub pull_reopen: String,
    pub pull_draft_open: String,
    pub pull_draft_reopen: String,
    pub pull_ready: String,
    pub pull_close: String,
    pub pull_merge: String,
    pub pull_comment: String,
    pub issue_open: String,
    pub issue_reopen: String,
    pub issue_close: String,
    pub issue_comment: String,
    pub review_approve: String,
    pub review_request_changes: String,
    pub review_comment: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        MessagesConfig {
            pull_open: "Pull request opened by <actor>".to_string(),
            pull_reopen: "Pull request reopened by <actor>".to_string(),
            pull_draft_open: "Draft pull request opened by <actor>".to_string(),
            pull_draft_reopen: "Draft pull request reopened by <actor>".to_string(),
            pull_ready: "Pull request ready for review by <actor>".to_string(),
            pull_close: "Pull request closed by <actor>".to_string(),
            pull_merge: "Pull request merged by <actor>".to_string(),
            pull_comment: "<actor> commented on <author>'s pull request".to_string(),
            issue_open: "Issue opened by <actor>".to_string(),
            issue_reopen: "Issue reopened by <actor>".to_string(),
            issue_close: "Issue closed by <actor>".to_string(),
            issue_comment: "<actor> commented on <author>'s issue".to_string(),
            review_approve: "<actor> approved <author>'s pull request".to_string(),
            review_request_changes: "<actor> requested changes on <author>'s pull request"
                .to_string(),
            review_comment: "<actor> commented on <author>'s pull request".to_string(),
        }
    }
}
