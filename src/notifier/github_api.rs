use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::trace;
use url::Url;

use crate::config::GitHubConfig;
use crate::error::NotifyError;
use crate::notifier::mrkdwn;

// Asks GitHub to render markdown bodies to HTML alongside the raw fields.
const HTML_MEDIA_TYPE: &str = "application/vnd.github.v3.html+json";

const USER_AGENT: &str = concat!("octoslack/", env!("CARGO_PKG_VERSION"));

/// Display content extracted from a fetched resource: the mrkdwn body plus
/// an optional leading image.
#[derive(Debug, Default)]
pub struct Content {
    pub body: String,
    pub image: Option<String>,
}

impl Content {
    fn new(body_html: Option<String>, body: Option<String>) -> Self {
        let converted = mrkdwn::from_html(body_html.as_deref().unwrap_or(""));
        let body = if converted.text.is_empty() {
            // conversion came up empty, show the raw body instead
            mrkdwn::collapse_plain(body.as_deref().unwrap_or(""))
        } else {
            converted.text
        };

        Content {
            body,
            image: converted.image,
        }
    }
}

#[derive(Debug)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
}

/// Statistics and metadata shown as detail fields under a pull request
/// message.
#[derive(Debug)]
pub struct PullRequestDetails {
    pub commits: u64,
    pub changed_files: u64,
    pub additions: u64,
    pub deletions: u64,
    pub labels: Vec<String>,
    pub milestone: Option<Milestone>,
}

/// Metadata shown as detail fields under an issue message.
#[derive(Debug)]
pub struct IssueDetails {
    pub labels: Vec<String>,
    pub milestone: Option<Milestone>,
}

/// One review line comment, ready for posting.
#[derive(Debug)]
pub struct ReviewComment {
    pub html_url: Url,
    pub content: Content,
}

#[derive(Debug, Deserialize)]
struct PullRequestResource {
    body_html: Option<String>,
    body: Option<String>,
    commits: u64,
    changed_files: u64,
    additions: u64,
    deletions: u64,
    #[serde(default)]
    labels: Vec<LabelResource>,
    milestone: Option<MilestoneResource>,
}

#[derive(Debug, Deserialize)]
struct IssueResource {
    body_html: Option<String>,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<LabelResource>,
    milestone: Option<MilestoneResource>,
}

#[derive(Debug, Deserialize)]
struct BodyResource {
    body_html: Option<String>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewCommentResource {
    html_url: Url,
    body_html: Option<String>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct MilestoneResource {
    number: u64,
    title: String,
}

impl MilestoneResource {
    fn into_milestone(self) -> Milestone {
        Milestone {
            number: self.number,
            title: self.title,
        }
    }
}

/// Read-only client for the handful of GitHub resources whose bodies are
/// worth showing in full.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: Url,
    token: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(GitHubClient {
            http,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
        })
    }

    pub async fn pull_request(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<(Content, PullRequestDetails), NotifyError> {
        let resource: PullRequestResource =
            self.get(&format!("/repos/{}/pulls/{}", repo, number)).await?;

        let details = PullRequestDetails {
            commits: resource.commits,
            changed_files: resource.changed_files,
            additions: resource.additions,
            deletions: resource.deletions,
            labels: resource.labels.into_iter().map(|l| l.name).collect(),
            milestone: resource.milestone.map(MilestoneResource::into_milestone),
        };

        Ok((Content::new(resource.body_html, resource.body), details))
    }

    pub async fn issue(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<(Content, IssueDetails), NotifyError> {
        let resource: IssueResource =
            self.get(&format!("/repos/{}/issues/{}", repo, number)).await?;

        let details = IssueDetails {
            labels: resource.labels.into_iter().map(|l| l.name).collect(),
            milestone: resource.milestone.map(MilestoneResource::into_milestone),
        };

        Ok((Content::new(resource.body_html, resource.body), details))
    }

    pub async fn review(
        &self,
        repo: &str,
        number: u64,
        review_id: u64,
    ) -> Result<Content, NotifyError> {
        let resource: BodyResource = self
            .get(&format!("/repos/{}/pulls/{}/reviews/{}", repo, number, review_id))
            .await?;

        Ok(Content::new(resource.body_html, resource.body))
    }

    pub async fn issue_comment(
        &self,
        repo: &str,
        comment_id: u64,
    ) -> Result<Content, NotifyError> {
        let resource: BodyResource = self
            .get(&format!("/repos/{}/issues/comments/{}", repo, comment_id))
            .await?;

        Ok(Content::new(resource.body_html, resource.body))
    }

    /// All line comments attached to one review, in one list call.
    pub async fn review_comments(
        &self,
        repo: &str,
        number: u64,
        review_id: u64,
    ) -> Result<Vec<ReviewComment>, NotifyError> {
        let resources: Vec<ReviewCommentResource> = self
            .get(&format!(
                "/repos/{}/pulls/{}/reviews/{}/comments",
                repo, number, review_id
            ))
            .await?;

        Ok(resources
            .into_iter()
            .map(|resource| ReviewComment {
                html_url: resource.html_url,
                content: Content::new(resource.body_html, resource.body),
            })
            .collect())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, NotifyError> {
        let url = format!("{}{}", self.api_url.as_str().trim_end_matches('/'), path);
        trace!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, HTML_MEDIA_TYPE)
            .header(reqwest::header::AUTHORIZATION, format!("token {}", self.token))
            .send()
            .await
            .map_err(|e| NotifyError::GitHubFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::GitHubFetch(format!(
                "status {} on {}",
                status, path
            )));
        }

        response
            .json()
            .await
            .map_err(|e| NotifyError::GitHubFetch(e.to_string()))
    }
}
