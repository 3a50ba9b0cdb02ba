//! Builders for incoming Telegram update payloads.
//!
//! Updates are built from wire-format JSON rather than struct literals, the
//! same shape the Bot API delivers, which keeps the builders stable across
//! client type changes.

use serde_json::{json, Value};
use teloxide::types::{CallbackQuery, ChatMemberUpdated, Message};
use chatwarden::models::ChatAdmin;

pub fn user_json(user_id: i64, first_name: &str) -> Value {
    json!({"id": user_id, "is_bot": false, "first_name": first_name})
}

pub fn private_chat_json(user_id: i64) -> Value {
    json!({"id": user_id, "type": "private", "first_name": "Test"})
}

pub fn group_chat_json(chat_id: i64, title: &str) -> Value {
    json!({"id": chat_id, "type": "supergroup", "title": title})
}

pub fn channel_chat_json(chat_id: i64, title: &str) -> Value {
    json!({"id": chat_id, "type": "channel", "title": title})
}

/// A text message in the sender's private chat.
pub fn private_message(user_id: i64, text: &str) -> Message {
    serde_json::from_value(json!({
        "message_id": 100,
        "date": 1700000000,
        "chat": private_chat_json(user_id),
        "from": user_json(user_id, "Test"),
        "text": text
    }))
    .expect("private message payload")
}

/// A text message in a supergroup.
pub fn group_message(chat_id: i64, user_id: i64, text: &str) -> Message {
    serde_json::from_value(json!({
        "message_id": 101,
        "date": 1700000000,
        "chat": group_chat_json(chat_id, "Test Group"),
        "from": user_json(user_id, "Test"),
        "text": text
    }))
    .expect("group message payload")
}

/// The service message Telegram emits after a chat rename.
pub fn title_change_message(chat_id: i64, new_title: &str) -> Message {
    serde_json::from_value(json!({
        "message_id": 102,
        "date": 1700000000,
        "chat": group_chat_json(chat_id, new_title),
        "from": user_json(900, "Renamer"),
        "new_chat_title": new_title
    }))
    .expect("title change payload")
}

/// A callback press without a reachable origin message.
pub fn callback_query(user_id: i64, data: &str) -> CallbackQuery {
    serde_json::from_value(json!({
        "id": "77",
        "from": user_json(user_id, "Test"),
        "chat_instance": "instance",
        "data": data
    }))
    .expect("callback payload")
}

/// A callback press on a message the bot sent to the user's private chat.
pub fn callback_query_with_origin(user_id: i64, data: &str, message_id: i32) -> CallbackQuery {
    serde_json::from_value(json!({
        "id": "78",
        "from": user_json(user_id, "Test"),
        "chat_instance": "instance",
        "data": data,
        "message": {
            "message_id": message_id,
            "date": 1700000000,
            "chat": private_chat_json(user_id),
            "from": {"id": 12345, "is_bot": true, "first_name": "chatwarden"},
            "text": "panel"
        }
    }))
    .expect("callback payload with origin")
}

pub fn member_json(user_id: i64) -> Value {
    json!({"status": "member", "user": user_json(user_id, "Test")})
}

pub fn left_json(user_id: i64) -> Value {
    json!({"status": "left", "user": user_json(user_id, "Test")})
}

pub fn banned_json(user_id: i64) -> Value {
    json!({"status": "kicked", "user": user_json(user_id, "Test"), "until_date": 0})
}

pub fn administrator_json(user_id: i64, can_restrict_members: bool) -> Value {
    json!({
        "status": "administrator",
        "user": user_json(user_id, "Test"),
        "can_be_edited": false,
        "is_anonymous": false,
        "can_manage_chat": true,
        "can_delete_messages": true,
        "can_manage_video_chats": false,
        "can_restrict_members": can_restrict_members,
        "can_promote_members": false,
        "can_change_info": true,
        "can_invite_users": true,
        "can_pin_messages": true
    })
}

pub fn owner_json(user_id: i64) -> Value {
    json!({"status": "creator", "user": user_json(user_id, "Test"), "is_anonymous": false})
}

/// A `chat_member`/`my_chat_member` update transitioning between two states.
pub fn member_update(chat: Value, from_user_id: i64, old: Value, new: Value) -> ChatMemberUpdated {
    serde_json::from_value(json!({
        "chat": chat,
        "from": user_json(from_user_id, "Actor"),
        "date": 1700000000,
        "old_chat_member": old,
        "new_chat_member": new
    }))
    .expect("member update payload")
}

/// Admin roster entry with explicit capability flags.
pub fn chat_admin(admin_id: i64, capabilities: &[(&str, bool)]) -> ChatAdmin {
    ChatAdmin {
        admin_id,
        privileges: capabilities
            .iter()
            .map(|(name, flag)| (name.to_string(), *flag))
            .collect(),
    }
}
