use serde::Serialize;
use url::Url;

/// Fixed semantic palette. Every message carries exactly one color, shown
/// as the attachment side bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Neutral default, used for comments.
    Base,
    /// Something was created, reopened, readied or approved.
    Open,
    /// A pull request was closed by merging.
    Merged,
    /// Closed without merge, or changes requested.
    Closed,
    /// A draft pull request was opened or reopened.
    Draft,
}

impl Color {
    pub fn hex(self) -> &'static str {
        match self {
            Color::Base => "#24292f",
            Color::Open => "#36a64f",
            Color::Merged => "#6f42c1",
            Color::Closed => "#cb2431",
            Color::Draft => "#6a737d",
        }
    }
}

/// One structured key/value row attached to a message.
#[derive(Debug, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// A single outbound message, assembled by the event handlers and consumed
/// by the publisher. The `description` still carries its `<actor>` and
/// `<author>` tokens; substitution happens at publish time.
#[derive(Debug)]
pub struct Message {
    pub description: String,
    pub color: Color,
    pub title: String,
    pub title_link: Url,
    pub body: String,
    pub image: Option<String>,
    pub fields: Vec<Field>,
    pub show_actor: bool,
    pub thread_ts: Option<String>,
}

impl Message {
    pub fn new(description: &str, color: Color, title: String, title_link: Url) -> Self {
        Message {
            description: description.to_string(),
            color,
            title,
            title_link,
            body: String::new(),
            image: None,
            fields: Vec::new(),
            show_actor: false,
            thread_ts: None,
        }
    }
}

/// Replaces every `<actor>` and `<author>` token in a template. Everything
/// else, emoji tokens included, passes through untouched.
pub fn substitute(template: &str, actor: &str, author: &str) -> String {
    template.replace("<actor>", actor).replace("<author>", author)
}

/// Display name for the acting user. When the actor is also the author of
/// the resource the name is annotated so readers can tell self-activity
/// from activity on someone else's work.
pub fn actor_display(actor: &str, author: &str) -> String {
    if actor == author {
        format!("{} (author)", actor)
    } else {
        actor.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitution_is_total_and_global() {
        let substituted = substitute(
            "<actor> pinged <author>, and <actor> waits",
            "alice",
            "bob",
        );

        assert_eq!(substituted, "alice pinged bob, and alice waits");
        assert!(!substituted.contains('<'));
        assert!(!substituted.contains('>'));
    }

    #[test]
    fn substitution_leaves_emoji_tokens_alone() {
        assert_eq!(
            substitute(":tada: merged by <actor>", "alice", "bob"),
            ":tada: merged by alice"
        );
    }

    #[test]
    fn palette_is_fixed() {
        assert_eq!(Color::Base.hex(), "#24292f");
        assert_eq!(Color::Open.hex(), "#36a64f");
        assert_eq!(Color::Merged.hex(), "#6f42c1");
        assert_eq!(Color::Closed.hex(), "#cb2431");
        assert_eq!(Color::Draft.hex(), "#6a737d");
    }

    #[test]
    fn actor_display_annotates_the_author() {
        assert_eq!(actor_display("alice", "alice"), "alice (author)");
        assert_eq!(actor_display("alice", "bob"), "alice");
    }
}
