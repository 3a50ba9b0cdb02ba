//! Internationalization module
//!
//! This module handles multi-language support for the ChatWarden bot.
//! It provides translation loading, message formatting and a fallback
//! chain into the default language.

pub mod loader;

// Re-export commonly used i18n components
pub use loader::{I18n, TranslationParams};
