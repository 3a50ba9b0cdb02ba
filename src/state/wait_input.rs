//! Pending-input tags for owner conversations
//!
//! When the owner taps a panel button that needs a follow-up value (a chat
//! id to ban, for example) the tag is stored on their user row. The next
//! private message is then routed to the matching flow instead of the
//! command handlers.

use std::fmt;

/// What the next private message from a user should be treated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitInput {
    /// Waiting for a chat or user id to ban
    BanId,
    /// Waiting for a chat or user id to unban
    UnbanId,
}

impl WaitInput {
    /// Storage form of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitInput::BanId => "banid",
            WaitInput::UnbanId => "unbanid",
        }
    }

    /// Parse the stored form back; unknown tags are treated as no tag
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "banid" => Some(WaitInput::BanId),
            "unbanid" => Some(WaitInput::UnbanId),
            _ => None,
        }
    }
}

impl fmt::Display for WaitInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
