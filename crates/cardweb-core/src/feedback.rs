//! User feedback channel: notifications and DOM patches
//!
//! Handlers never talk to the user directly. They collect [`Notification`]s
//! and [`DomPatch`]es into a [`Feedback`], which the web layer ships to the
//! browser as a single `HX-Trigger` header. The page script turns
//! notifications into toasts and applies patches by element id.

use crate::error::ClientError;
use serde::Serialize;

/// Notification level, used for toast styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, text: text.into() }
    }

    /// "Error: ..." or "Network error: ..." depending on the failure kind
    pub fn from_error(error: &ClientError) -> Self {
        Self::error(error.user_message())
    }
}

/// A minimal change to one element, addressed by its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DomPatch {
    /// Replace the element's text content
    SetText { target: String, text: String },
    /// Disable a control
    Disable { target: String },
    /// Drop the option with this value from a select
    RemoveOption { target: String, value: String },
    /// Set an input's or select's value
    SetValue { target: String, value: String },
}

impl DomPatch {
    pub fn set_text(target: &str, text: impl Into<String>) -> Self {
        DomPatch::SetText { target: target.to_string(), text: text.into() }
    }

    pub fn disable(target: &str) -> Self {
        DomPatch::Disable { target: target.to_string() }
    }

    pub fn remove_option(target: &str, value: impl Into<String>) -> Self {
        DomPatch::RemoveOption { target: target.to_string(), value: value.into() }
    }

    pub fn set_value(target: &str, value: impl Into<String>) -> Self {
        DomPatch::SetValue { target: target.to_string(), value: value.into() }
    }
}

/// Everything a handler wants the browser to show or change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feedback {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notify: Vec<Notification>,
    #[serde(rename = "domPatch", skip_serializing_if = "Vec::is_empty")]
    pub patches: Vec<DomPatch>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feedback carrying a single error notification
    pub fn from_error(error: &ClientError) -> Self {
        Self::new().with_notification(Notification::from_error(error))
    }

    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notify.push(notification);
        self
    }

    pub fn with_patch(mut self, patch: DomPatch) -> Self {
        self.patches.push(patch);
        self
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.notify.push(notification);
    }

    pub fn is_empty(&self) -> bool {
        self.notify.is_empty() && self.patches.is_empty()
    }

    /// `HX-Trigger` header value, `None` when there is nothing to send.
    ///
    /// Header values must be visible ASCII, so everything else is written as
    /// JSON `\u` escapes.
    pub fn to_trigger_header(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let json = serde_json::to_string(self).ok()?;
        Some(ascii_json(&json))
    }
}

fn ascii_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\x7f' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}
