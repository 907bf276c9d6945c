//! Shipboard news feed.
//!
//! Crew write articles at a news desk; sharing publishes to the feed and
//! notifies everyone. The validation rules and share cooldown live in
//! the logic crate; this manager holds the state.

use serde::{Deserialize, Serialize};

use stardrift_logic::news::{self, ArticleError};

use crate::components::Color;

use super::AnnouncementLog;

/// Broadcast color for press notices.
pub const NEWS_ANNOUNCEMENT_COLOR: Color = Color::new(0xd4, 0xa5, 0x2a);

/// A published article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    /// Sim time of publication.
    pub shared_at: f64,
}

/// Why an article wasn't published.
#[derive(Debug, PartialEq, Eq)]
pub enum ShareError {
    Invalid(ArticleError),
    /// The desk shared too recently.
    CooldownActive,
}

impl From<ArticleError> for ShareError {
    fn from(e: ArticleError) -> Self {
        ShareError::Invalid(e)
    }
}

/// State of one news desk: the published feed and its share gate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsDesk {
    articles: Vec<NewsArticle>,
    last_share: Option<f64>,
}

impl NewsDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an article. Returns its feed index.
    pub fn share(
        &mut self,
        title: &str,
        content: &str,
        author: Option<String>,
        now: f64,
        announcements: &mut AnnouncementLog,
    ) -> Result<usize, ShareError> {
        news::validate_article(title, content)?;
        if !news::can_share(now, self.last_share) {
            return Err(ShareError::CooldownActive);
        }

        self.articles.push(NewsArticle {
            title: title.to_string(),
            content: content.to_string(),
            author,
            shared_at: now,
        });
        self.last_share = Some(now);

        announcements.dispatch(
            format!("The shipboard press has published: {}", title),
            NEWS_ANNOUNCEMENT_COLOR,
            now,
        );
        Ok(self.articles.len() - 1)
    }

    /// Remove an article from the feed. Returns false for a bad index.
    pub fn delete(&mut self, index: usize) -> bool {
        if index < self.articles.len() {
            self.articles.remove(index);
            true
        } else {
            false
        }
    }

    pub fn articles(&self) -> &[NewsArticle] {
        &self.articles
    }

    /// Whether the desk may share again at `now`.
    pub fn can_share(&self, now: f64) -> bool {
        news::can_share(now, self.last_share)
    }
}
