//! Input validation for moderation flows
//!
//! Validators for the identifier formats accepted by the ban/unban
//! conversations: negative chat ids, positive user ids and @usernames.

use once_cell::sync::Lazy;
use regex::Regex;

static CHAT_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\d{5,32}$").unwrap());
static USER_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,32}$").unwrap());
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@[a-zA-Z][a-zA-Z0-9_]{3,30}[a-zA-Z0-9]$").unwrap());

/// Check whether the text looks like a group/channel chat id.
pub fn is_valid_chat_id(text: &str) -> bool {
    CHAT_ID_RE.is_match(text)
}

/// Check whether the text looks like a user id.
pub fn is_valid_user_id(text: &str) -> bool {
    USER_ID_RE.is_match(text)
}

/// Check whether the text looks like a @username mention.
pub fn is_valid_username(text: &str) -> bool {
    USERNAME_RE.is_match(text)
}
