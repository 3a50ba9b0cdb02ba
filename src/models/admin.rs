//! Admin permission model

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use teloxide::types::ChatMemberKind;

/// Capability name to granted flag, as reported by the platform.
pub type PrivilegeMap = HashMap<String, bool>;

/// One admin's snapshot row for a chat.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminPermission {
    pub id: i64,
    pub chat_id: i64,
    pub admin_id: i64,
    pub privileges: Json<PrivilegeMap>,
}

/// A roster entry as returned by the remote directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatAdmin {
    pub admin_id: i64,
    pub privileges: PrivilegeMap,
}

/// Capabilities a chat owner implicitly holds.
const OWNER_CAPABILITIES: &[&str] = &[
    "can_manage_chat",
    "can_change_info",
    "can_delete_messages",
    "can_invite_users",
    "can_restrict_members",
    "can_pin_messages",
    "can_manage_topics",
    "can_promote_members",
    "can_manage_video_chats",
    "can_post_messages",
    "can_edit_messages",
    "can_post_stories",
    "can_edit_stories",
    "can_delete_stories",
];

/// Extract the capability map for a chat member.
///
/// Owners get every capability; administrators contribute whichever boolean
/// flags the platform reports on their record; everyone else maps to empty.
pub fn privileges_of(kind: &ChatMemberKind) -> PrivilegeMap {
    match kind {
        ChatMemberKind::Owner(owner) => {
            let mut map: PrivilegeMap = OWNER_CAPABILITIES
                .iter()
                .map(|capability| (capability.to_string(), true))
                .collect();
            map.insert("is_anonymous".to_string(), owner.is_anonymous);
            map
        }
        ChatMemberKind::Administrator(admin) => match serde_json::to_value(admin) {
            Ok(serde_json::Value::Object(fields)) => fields
                .into_iter()
                .filter_map(|(key, value)| value.as_bool().map(|flag| (key, flag)))
                .collect(),
            _ => PrivilegeMap::new(),
        },
        _ => PrivilegeMap::new(),
    }
}

/// Whether the membership kind carries admin rights.
pub fn is_admin_kind(kind: &ChatMemberKind) -> bool {
    matches!(kind, ChatMemberKind::Owner(_) | ChatMemberKind::Administrator(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_owner_holds_every_capability() {
        let kind: ChatMemberKind = serde_json::from_value(json!({
            "status": "creator",
            "is_anonymous": false,
        }))
        .unwrap();

        let privileges = privileges_of(&kind);
        assert_eq!(privileges.get("can_restrict_members"), Some(&true));
        assert_eq!(privileges.get("can_promote_members"), Some(&true));
        assert_eq!(privileges.get("is_anonymous"), Some(&false));
        assert!(is_admin_kind(&kind));
    }

    #[test]
    fn test_administrator_flags_are_collected() {
        let kind: ChatMemberKind = serde_json::from_value(json!({
            "status": "administrator",
            "can_be_edited": false,
            "is_anonymous": false,
            "can_manage_chat": true,
            "can_delete_messages": true,
            "can_manage_video_chats": false,
            "can_restrict_members": true,
            "can_promote_members": false,
            "can_change_info": false,
            "can_invite_users": true,
            "can_post_stories": false,
            "can_edit_stories": false,
            "can_delete_stories": false,
        }))
        .unwrap();

        let privileges = privileges_of(&kind);
        assert_eq!(privileges.get("can_restrict_members"), Some(&true));
        assert_eq!(privileges.get("can_promote_members"), Some(&false));
        assert!(is_admin_kind(&kind));
    }

    #[test]
    fn test_plain_member_has_no_privileges() {
        let kind: ChatMemberKind = serde_json::from_value(json!({
            "status": "member",
        }))
        .unwrap();

        assert!(privileges_of(&kind).is_empty());
        assert!(!is_admin_kind(&kind));
    }
}
