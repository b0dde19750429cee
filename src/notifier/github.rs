use tracing::debug;
use url::Url;

use crate::config::MessagesConfig;
use crate::error::NotifyError;
use crate::notifier::github_api::{IssueDetails, Milestone, PullRequestDetails};
use crate::notifier::message::{Color, Field, Message};
use crate::notifier::slack::PostContext;
use crate::notifier::Notifier;
use crate::webhooks::github::{
    IssueCommentEvent, IssuesEvent, PullRequestEvent, PullRequestReviewEvent,
};

/// A decided transition: which template, which color, and whether the
/// canonical resource must be fetched for its body. Pure data, no I/O, so
/// the whole decision table is testable without a network.
#[derive(Debug)]
struct Plan<'a> {
    template: &'a str,
    color: Color,
    fetch: bool,
}

fn pull_request_plan<'a>(
    action: &str,
    draft: bool,
    merged: bool,
    messages: &'a MessagesConfig,
) -> Option<Plan<'a>> {
    let plan = match (action, draft, merged) {
        ("opened", true, _) => Plan {
            template: &messages.pull_draft_open,
            color: Color::Draft,
            fetch: false,
        },
        ("opened", false, _) => Plan {
            template: &messages.pull_open,
            color: Color::Open,
            fetch: true,
        },
        ("reopened", true, _) => Plan {
            template: &messages.pull_draft_reopen,
            color: Color::Draft,
            fetch: false,
        },
        ("reopened", false, _) => Plan {
            template: &messages.pull_reopen,
            color: Color::Open,
            fetch: true,
        },
        ("ready_for_review", ..) => Plan {
            template: &messages.pull_ready,
            color: Color::Open,
            fetch: true,
        },
        ("closed", _, true) => Plan {
            template: &messages.pull_merge,
            color: Color::Merged,
            fetch: false,
        },
        ("closed", _, false) => Plan {
            template: &messages.pull_close,
            color: Color::Closed,
            fetch: false,
        },
        _ => return None,
    };

    Some(plan)
}

fn issues_plan<'a>(action: &str, messages: &'a MessagesConfig) -> Option<Plan<'a>> {
    let plan = match action {
        "opened" => Plan {
            template: &messages.issue_open,
            color: Color::Open,
            fetch: true,
        },
        "reopened" => Plan {
            template: &messages.issue_reopen,
            color: Color::Open,
            fetch: true,
        },
        "closed" => Plan {
            template: &messages.issue_close,
            color: Color::Closed,
            fetch: false,
        },
        _ => return None,
    };

    Some(plan)
}

fn review_plan<'a>(state: &str, messages: &'a MessagesConfig) -> Option<Plan<'a>> {
    let plan = match state {
        "approved" => Plan {
            template: &messages.review_approve,
            color: Color::Open,
            fetch: true,
        },
        "changes_requested" => Plan {
            template: &messages.review_request_changes,
            color: Color::Closed,
            fetch: true,
        },
        "commented" => Plan {
            template: &messages.review_comment,
            color: Color::Base,
            fetch: true,
        },
        _ => return None,
    };

    Some(plan)
}

fn pull_request_fields(details: &PullRequestDetails, pr_url: &Url, repo_url: &Url) -> Vec<Field> {
    let mut fields = vec![
        Field {
            title: "Commits".to_string(),
            value: format!("<{}/commits|{} commits>", pr_url, details.commits),
            short: true,
        },
        Field {
            title: "Changed files".to_string(),
            value: format!(
                "<{}/files|{} files> (+{} -{})",
                pr_url, details.changed_files, details.additions, details.deletions
            ),
            short: true,
        },
    ];

    metadata_fields(&mut fields, &details.labels, details.milestone.as_ref(), repo_url);
    fields
}

fn issue_fields(details: &IssueDetails, repo_url: &Url) -> Vec<Field> {
    let mut fields = Vec::new();
    metadata_fields(&mut fields, &details.labels, details.milestone.as_ref(), repo_url);
    fields
}

fn metadata_fields(
    fields: &mut Vec<Field>,
    labels: &[String],
    milestone: Option<&Milestone>,
    repo_url: &Url,
) {
    if !labels.is_empty() {
        fields.push(Field {
            title: "Labels".to_string(),
            value: labels.join(", "),
            short: true,
        });
    }

    if let Some(milestone) = milestone {
        fields.push(Field {
            title: "Milestone".to_string(),
            value: format!(
                "<{}/milestone/{}|{}>",
                repo_url, milestone.number, milestone.title
            ),
            short: true,
        });
    }
}

impl Notifier {
    pub(crate) async fn handle_pull_request(
        &self,
        event: PullRequestEvent,
    ) -> Result<(), NotifyError> {
        let features = &self.config.features.pulls;
        if !features.subscribe {
            return Ok(());
        }

        let pr = &event.pull_request;
        let plan = match pull_request_plan(&event.action, pr.draft, pr.merged, &self.config.messages)
        {
            Some(plan) => plan,
            None => {
                debug!("ignoring pull_request action {}", event.action);
                return Ok(());
            }
        };

        let mut message = Message::new(
            plan.template,
            plan.color,
            format!("#{} {}", pr.number, pr.title),
            pr.html_url.clone(),
        );
        message.show_actor = features.show_actor;

        if plan.fetch {
            let (content, details) = self
                .github
                .pull_request(&event.repository.full_name, pr.number)
                .await?;
            message.body = content.body;
            message.image = content.image;
            if features.show_details {
                message.fields =
                    pull_request_fields(&details, &pr.html_url, &event.repository.html_url);
            }
        }

        let ctx = PostContext::new(&event.sender, &pr.user.login);
        self.slack.post(&message, &ctx).await?;
        Ok(())
    }

    pub(crate) async fn handle_issues(&self, event: IssuesEvent) -> Result<(), NotifyError> {
        let features = &self.config.features.issues;
        if !features.subscribe {
            return Ok(());
        }

        let issue = &event.issue;
        let plan = match issues_plan(&event.action, &self.config.messages) {
            Some(plan) => plan,
            None => {
                debug!("ignoring issues action {}", event.action);
                return Ok(());
            }
        };

        let mut message = Message::new(
            plan.template,
            plan.color,
            format!("#{} {}", issue.number, issue.title),
            issue.html_url.clone(),
        );
        message.show_actor = features.show_actor;

        if plan.fetch {
            let (content, details) = self
                .github
                .issue(&event.repository.full_name, issue.number)
                .await?;
            message.body = content.body;
            message.image = content.image;
            if features.show_details {
                message.fields = issue_fields(&details, &event.repository.html_url);
            }
        }

        let ctx = PostContext::new(&event.sender, &issue.user.login);
        self.slack.post(&message, &ctx).await?;
        Ok(())
    }

    /// Posts the review itself and hands back the message timestamp so the
    /// review's line comments can thread beneath it.
    pub(crate) async fn handle_pull_request_review(
        &self,
        event: &PullRequestReviewEvent,
    ) -> Result<Option<String>, NotifyError> {
        let features = &self.config.features.reviews;
        if !features.subscribe {
            return Ok(None);
        }
        if event.action != "submitted" {
            debug!("ignoring pull_request_review action {}", event.action);
            return Ok(None);
        }

        let plan = match review_plan(&event.review.state, &self.config.messages) {
            Some(plan) => plan,
            None => {
                debug!("ignoring review state {}", event.review.state);
                return Ok(None);
            }
        };

        let pr = &event.pull_request;
        let content = self
            .github
            .review(&event.repository.full_name, pr.number, event.review.id)
            .await?;

        // a review submitted without a summary has an empty body; posting
        // it would just be noise, the line comments follow anyway
        if event.review.state == "commented" && content.body.is_empty() {
            return Ok(None);
        }

        let mut message = Message::new(
            plan.template,
            plan.color,
            format!("Review on #{} {}", pr.number, pr.title),
            event.review.html_url.clone(),
        );
        message.show_actor = features.show_actor;
        message.body = content.body;
        message.image = content.image;

        let ctx = PostContext::new(&event.sender, &pr.user.login);
        let ts = self.slack.post(&message, &ctx).await?;
        Ok(Some(ts))
    }

    /// Posts every line comment attached to a submitted review.
    ///
    /// `pull_request_review_comment` deliveries are deliberately not
    /// consumed: each one would cost a separate runner invocation. One list
    /// call per review covers all of its comments instead.
    pub(crate) async fn handle_review_comments(
        &self,
        event: &PullRequestReviewEvent,
        review_ts: Option<String>,
    ) -> Result<(), NotifyError> {
        let features = &self.config.features.pull_comments;
        if !features.subscribe {
            return Ok(());
        }
        if event.action != "submitted" {
            return Ok(());
        }

        let pr = &event.pull_request;
        let comments = self
            .github
            .review_comments(&event.repository.full_name, pr.number, event.review.id)
            .await?;

        let ctx = PostContext::new(&event.sender, &pr.user.login);
        let mut anchor = review_ts;

        for comment in comments {
            let mut message = Message::new(
                &self.config.messages.pull_comment,
                Color::Base,
                format!("Comment on #{} {}", pr.number, pr.title),
                comment.html_url,
            );
            message.show_actor = features.show_actor;
            message.body = comment.content.body;
            message.image = comment.content.image;
            if features.threading {
                message.thread_ts = anchor.clone();
            }

            let ts = self.slack.post(&message, &ctx).await?;

            // the first posted message anchors the rest of the batch
            if anchor.is_none() {
                anchor = Some(ts);
            }
        }

        Ok(())
    }

    pub(crate) async fn handle_issue_comment(
        &self,
        event: IssueCommentEvent,
    ) -> Result<(), NotifyError> {
        if event.action != "created" {
            debug!("ignoring issue_comment action {}", event.action);
            return Ok(());
        }

        let issue = &event.issue;

        // comments on pull requests arrive as issue_comment events too; the
        // `pull_request` link on the issue tells the two kinds apart
        let (subscribe, show_actor, template) = if issue.pull_request.is_some() {
            let features = &self.config.features.pull_comments;
            (
                features.subscribe,
                features.show_actor,
                &self.config.messages.pull_comment,
            )
        } else {
            let features = &self.config.features.issue_comments;
            (
                features.subscribe,
                features.show_actor,
                &self.config.messages.issue_comment,
            )
        };

        if !subscribe {
            return Ok(());
        }

        let content = self
            .github
            .issue_comment(&event.repository.full_name, event.comment.id)
            .await?;

        let mut message = Message::new(
            template,
            Color::Base,
            format!("Comment on #{} {}", issue.number, issue.title),
            event.comment.html_url.clone(),
        );
        message.show_actor = show_actor;
        message.body = content.body;
        message.image = content.image;

        let ctx = PostContext::new(&event.sender, &issue.user.login);
        self.slack.post(&message, &ctx).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages() -> MessagesConfig {
        MessagesConfig::default()
    }

    #[test]
    fn draft_pull_requests_skip_the_fetch() {
        let messages = messages();

        let plan = pull_request_plan("opened", true, false, &messages).unwrap();
        assert_eq!(plan.color, Color::Draft);
        assert!(!plan.fetch);
        assert_eq!(plan.template, "Draft pull request opened by <actor>");

        let plan = pull_request_plan("reopened", true, false, &messages).unwrap();
        assert_eq!(plan.color, Color::Draft);
        assert!(!plan.fetch);
    }

    #[test]
    fn open_pull_requests_fetch_content() {
        let messages = messages();

        for action in ["opened", "reopened", "ready_for_review"] {
            let plan = pull_request_plan(action, false, false, &messages).unwrap();
            assert_eq!(plan.color, Color::Open, "action {}", action);
            assert!(plan.fetch, "action {}", action);
        }
    }

    #[test]
    fn closed_pull_requests_split_on_merged() {
        let messages = messages();

        let plan = pull_request_plan("closed", false, true, &messages).unwrap();
        assert_eq!(plan.color, Color::Merged);
        assert!(!plan.fetch);
        assert_eq!(plan.template, "Pull request merged by <actor>");

        let plan = pull_request_plan("closed", false, false, &messages).unwrap();
        assert_eq!(plan.color, Color::Closed);
        assert!(!plan.fetch);
        assert_eq!(plan.template, "Pull request closed by <actor>");
    }

    #[test]
    fn unknown_pull_request_actions_produce_nothing() {
        let messages = messages();

        for action in ["synchronize", "labeled", "edited", "assigned"] {
            assert!(pull_request_plan(action, false, false, &messages).is_none());
        }
    }

    #[test]
    fn issue_actions_map_to_open_and_closed() {
        let messages = messages();

        let plan = issues_plan("opened", &messages).unwrap();
        assert_eq!(plan.color, Color::Open);
        assert!(plan.fetch);

        let plan = issues_plan("reopened", &messages).unwrap();
        assert_eq!(plan.color, Color::Open);
        assert!(plan.fetch);

        let plan = issues_plan("closed", &messages).unwrap();
        assert_eq!(plan.color, Color::Closed);
        assert!(!plan.fetch);

        assert!(issues_plan("milestoned", &messages).is_none());
    }

    #[test]
    fn review_states_map_to_their_colors() {
        let messages = messages();

        let plan = review_plan("approved", &messages).unwrap();
        assert_eq!(plan.color, Color::Open);

        let plan = review_plan("changes_requested", &messages).unwrap();
        assert_eq!(plan.color, Color::Closed);

        let plan = review_plan("commented", &messages).unwrap();
        assert_eq!(plan.color, Color::Base);

        assert!(review_plan("dismissed", &messages).is_none());
    }

    #[test]
    fn pull_request_fields_render_stats() {
        let details = PullRequestDetails {
            commits: 4,
            changed_files: 3,
            additions: 23,
            deletions: 0,
            labels: vec![],
            milestone: None,
        };
        let pr_url = Url::parse("https://github.com/acme/widget/pull/42").unwrap();
        let repo_url = Url::parse("https://github.com/acme/widget").unwrap();

        let fields = pull_request_fields(&details, &pr_url, &repo_url);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].title, "Commits");
        assert_eq!(
            fields[0].value,
            "<https://github.com/acme/widget/pull/42/commits|4 commits>"
        );
        assert_eq!(fields[1].title, "Changed files");
        assert_eq!(
            fields[1].value,
            "<https://github.com/acme/widget/pull/42/files|3 files> (+23 -0)"
        );
    }

    #[test]
    fn labels_and_milestone_fields_only_appear_when_present() {
        let details = PullRequestDetails {
            commits: 1,
            changed_files: 1,
            additions: 1,
            deletions: 1,
            labels: vec!["bug".to_string(), "urgent".to_string()],
            milestone: Some(Milestone {
                number: 2,
                title: "v1.0".to_string(),
            }),
        };
        let pr_url = Url::parse("https://github.com/acme/widget/pull/42").unwrap();
        let repo_url = Url::parse("https://github.com/acme/widget").unwrap();

        let fields = pull_request_fields(&details, &pr_url, &repo_url);

        assert_eq!(fields.len(), 4);
        assert_eq!(fields[2].title, "Labels");
        assert_eq!(fields[2].value, "bug, urgent");
        assert_eq!(fields[3].title, "Milestone");
        assert_eq!(
            fields[3].value,
            "<https://github.com/acme/widget/milestone/2|v1.0>"
        );
    }

    #[test]
    fn issue_fields_carry_no_stats() {
        let details = IssueDetails {
            labels: vec!["question".to_string()],
            milestone: None,
        };
        let repo_url = Url::parse("https://github.com/acme/widget").unwrap();

        let fields = issue_fields(&details, &repo_url);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].title, "Labels");
    }
}
