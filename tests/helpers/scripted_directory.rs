//! Scripted stand-in for the chat directory.
//!
//! Responses are declared up front per chat id; anything unscripted comes
//! back as `NotFound`. Call counters let suites assert how often the
//! permission layer actually went to the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use async_trait::async_trait;
use chatwarden::models::ChatAdmin;
use chatwarden::services::{ChatDirectory, ChatInfo};
use chatwarden::utils::errors::DirectoryError;

#[derive(Default)]
pub struct ScriptedDirectory {
    chats: Mutex<HashMap<i64, ChatInfo>>,
    rosters: Mutex<HashMap<i64, Vec<ChatAdmin>>>,
    roster_outage: Mutex<bool>,
    chat_info_calls: AtomicUsize,
    admin_list_calls: AtomicUsize,
    leave_calls: AtomicUsize,
}

impl ScriptedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat(self, chat_id: i64, chat_type: &str, title: &str) -> Self {
        self.chats.lock().unwrap().insert(
            chat_id,
            ChatInfo {
                chat_type: chat_type.to_string(),
                title: Some(title.to_string()),
                permissions: None,
            },
        );
        self
    }

    pub fn with_roster(self, chat_id: i64, roster: Vec<ChatAdmin>) -> Self {
        self.rosters.lock().unwrap().insert(chat_id, roster);
        self
    }

    /// Make every roster fetch time out from now on.
    pub fn break_rosters(&self) {
        *self.roster_outage.lock().unwrap() = true;
    }

    pub fn chat_info_calls(&self) -> usize {
        self.chat_info_calls.load(Ordering::SeqCst)
    }

    pub fn admin_list_calls(&self) -> usize {
        self.admin_list_calls.load(Ordering::SeqCst)
    }

    pub fn leave_calls(&self) -> usize {
        self.leave_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatDirectory for ScriptedDirectory {
    async fn fetch_chat_info(&self, chat_id: i64) -> Result<ChatInfo, DirectoryError> {
        self.chat_info_calls.fetch_add(1, Ordering::SeqCst);
        self.chats
            .lock()
            .unwrap()
            .get(&chat_id)
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }

    async fn fetch_admin_list(&self, chat_id: i64) -> Result<Vec<ChatAdmin>, DirectoryError> {
        self.admin_list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.roster_outage.lock().unwrap() {
            return Err(DirectoryError::Timeout);
        }
        self.rosters
            .lock()
            .unwrap()
            .get(&chat_id)
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }

    async fn leave_chat(&self, _chat_id: i64) -> Result<(), DirectoryError> {
        self.leave_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
