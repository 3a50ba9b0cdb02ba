//! Chat membership reconciliation
//!
//! `my_chat_member` updates track the bot's own standing and enforce the
//! join policy; `chat_member` updates keep the admin snapshot aligned
//! between full refreshes. Neither path touches the snapshot timestamp, so
//! a full refresh still happens on the normal staleness schedule.

use teloxide::types::{ChatMemberKind, ChatMemberUpdated};
use tracing::{debug, info, warn};
use crate::models::chat::kind_of;
use crate::models::{is_admin_kind, privileges_of, CreateChatRequest, UpdateUserRequest};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

fn is_member_kind(kind: &ChatMemberKind) -> bool {
    !matches!(kind, ChatMemberKind::Left | ChatMemberKind::Banned(_))
}

/// The bot's own membership changed somewhere
pub async fn handle_own_membership(update: ChatMemberUpdated, services: ServiceFactory) -> Result<()> {
    let kind = &update.new_chat_member.kind;

    if update.chat.is_private() {
        // The user blocked or unblocked the bot.
        let from = &update.from;
        let user_id = from.id.0 as i64;
        let active = is_member_kind(kind);

        services
            .db
            .initialize_user(user_id, from.username.clone(), Some(from.full_name()))
            .await?;
        services
            .db
            .users
            .update(
                user_id,
                UpdateUserRequest {
                    is_active: Some(active),
                    ..Default::default()
                },
            )
            .await?;
        debug!(user_id = user_id, active = active, "Private availability changed");
        return Ok(());
    }

    let chat_id = update.chat.id.0;
    let chat_type = kind_of(&update.chat).to_string();
    let settings = services.settings.get().await?;
    let allowed = settings.may_join(&chat_type);
    let member = is_member_kind(kind);
    let admin = is_admin_kind(kind);

    // A disallowed chat kind is recorded as inactive and non-admin even
    // when the raw platform status says otherwise.
    let chat = services
        .db
        .chats
        .upsert_membership(
            chat_id,
            &chat_type,
            update.chat.title(),
            member && allowed,
            admin && allowed,
        )
        .await?;
    debug!(
        chat_id = chat_id,
        chat_type = %chat_type,
        member = member,
        admin = admin,
        allowed = allowed,
        "Own membership recorded"
    );

    if member && (!allowed || chat.is_banned) {
        info!(
            chat_id = chat_id,
            banned = chat.is_banned,
            "Leaving chat the bot may not stay in"
        );
        if let Err(e) = services.directory.leave_chat(chat_id).await {
            warn!(chat_id = chat_id, error = %e, "Failed to leave chat");
        }
    }

    Ok(())
}

/// Another member's standing changed in a chat the bot administrates
pub async fn handle_member_change(update: ChatMemberUpdated, services: ServiceFactory) -> Result<()> {
    let chat_id = update.chat.id.0;
    let member = &update.new_chat_member;
    let member_id = member.user.id.0 as i64;

    if is_admin_kind(&member.kind) {
        // Admin rows hang off the chat row, which may not exist yet.
        services
            .db
            .initialize_chat(CreateChatRequest {
                chat_id,
                chat_type: kind_of(&update.chat).to_string(),
                chat_title: update.chat.title().map(str::to_string),
                language: None,
                chat_permissions: None,
            })
            .await?;

        let privileges = privileges_of(&member.kind);
        services.db.admins.upsert_one(chat_id, member_id, &privileges).await?;
        debug!(chat_id = chat_id, admin_id = member_id, "Admin row upserted");
    } else {
        let removed = services.db.admins.delete_one(chat_id, member_id).await?;
        if removed {
            debug!(chat_id = chat_id, admin_id = member_id, "Admin row removed");
        }
    }

    Ok(())
}
