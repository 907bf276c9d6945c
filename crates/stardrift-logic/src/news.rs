//! Shipboard news feed rules.
//!
//! Validation for drafted articles and the share-rate gate. The feed
//! state itself lives with the simulation; these are the rules it
//! enforces.

use serde::{Deserialize, Serialize};

/// Maximum article title length in characters.
pub const MAX_TITLE_LEN: usize = 64;

/// Maximum article body length in characters.
pub const MAX_CONTENT_LEN: usize = 2048;

/// Seconds between shares from the same desk.
pub const SHARE_COOLDOWN: f64 = 30.0;

/// Why a drafted article was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleError {
    EmptyTitle,
    TitleTooLong { len: usize },
    ContentTooLong { len: usize },
}

/// Check a drafted article against the feed rules.
pub fn validate_article(title: &str, content: &str) -> Result<(), ArticleError> {
    if title.trim().is_empty() {
        return Err(ArticleError::EmptyTitle);
    }

    let title_len = title.chars().count();
    if title_len > MAX_TITLE_LEN {
        return Err(ArticleError::TitleTooLong { len: title_len });
    }

    let content_len = content.chars().count();
    if content_len > MAX_CONTENT_LEN {
        return Err(ArticleError::ContentTooLong { len: content_len });
    }

    Ok(())
}

/// Whether the desk may share again at `now`, given its last share time.
pub fn can_share(now: f64, last_share: Option<f64>) -> bool {
    match last_share {
        Some(at) => now - at >= SHARE_COOLDOWN,
        None => true,
    }
}
