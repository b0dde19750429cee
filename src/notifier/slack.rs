use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::config::SlackConfig;
use crate::error::NotifyError;
use crate::notifier::message::{actor_display, substitute, Message};
use crate::webhooks::github::GitHubUser;

/// Identity strings resolved from the event, applied at publish time:
/// template tokens are substituted here, not when the message is built.
#[derive(Debug)]
pub struct PostContext {
    pub actor: String,
    pub actor_link: Option<String>,
    pub actor_icon: Option<String>,
    pub author: String,
}

impl PostContext {
    pub fn new(sender: &GitHubUser, author: &str) -> Self {
        PostContext {
            actor: sender.login.clone(),
            actor_link: sender.html_url.as_ref().map(|url| url.to_string()),
            actor_icon: sender.avatar_url.clone(),
            author: author.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Write-only client for `chat.postMessage`.
pub struct SlackClient {
    http: reqwest::Client,
    config: SlackConfig,
}

impl SlackClient {
    pub fn new(config: SlackConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(SlackClient { http, config })
    }

    /// Posts one message and returns the server-assigned timestamp, usable
    /// as a thread anchor for later posts.
    pub async fn post(&self, message: &Message, ctx: &PostContext) -> Result<String, NotifyError> {
        let text = substitute(&message.description, &ctx.actor, &ctx.author);

        let mut attachment = json!({
            "mrkdwn_in": ["text"],
            "color": message.color.hex(),
            "title": message.title,
            "title_link": message.title_link.as_str(),
            "text": message.body,
            "ts": Utc::now().timestamp(),
        });

        if message.show_actor {
            attachment["author_name"] = json!(actor_display(&ctx.actor, &ctx.author));
            if let Some(link) = &ctx.actor_link {
                attachment["author_link"] = json!(link);
            }
            if let Some(icon) = &ctx.actor_icon {
                attachment["author_icon"] = json!(icon);
            }
        }

        if !message.fields.is_empty() {
            attachment["fields"] = json!(message.fields);
        }
        if let Some(image) = &message.image {
            attachment["image_url"] = json!(image);
        }
        if let Some(footer) = &self.config.footer {
            attachment["footer"] = json!(footer);
        }
        if let Some(footer_icon) = &self.config.footer_icon {
            attachment["footer_icon"] = json!(footer_icon);
        }

        let mut payload = json!({
            "channel": self.config.channel,
            "username": self.config.app_name,
            "text": text,
            "attachments": [attachment],
        });

        if let Some(emoji) = &self.config.app_emoji {
            payload["icon_emoji"] = json!(emoji);
        } else if let Some(icon) = &self.config.app_icon {
            payload["icon_url"] = json!(icon);
        }
        if let Some(thread_ts) = &message.thread_ts {
            payload["thread_ts"] = json!(thread_ts);
        }

        let url = format!(
            "{}/chat.postMessage",
            self.config.api_url.as_str().trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::SlackPublish(e.to_string()))?;

        let response: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::SlackPublish(e.to_string()))?;

        if !response.ok {
            return Err(NotifyError::SlackPublish(
                response.error.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        info!("posted {} to {}", message.title, self.config.channel);
        Ok(response.ts.unwrap_or_default())
    }
}
