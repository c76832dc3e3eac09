//! Content written into managed sections
//!
//! Each variant renders to the exact text that replaces a section's span.

use serde::{Deserialize, Serialize};

use super::section::SectionKind;

/// Challenge status shown in the Status section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatusContent {
    /// Nobody has picked up the challenge
    Unclaimed,

    /// Picked up outside of any program
    Challenger { login: String },

    /// Picked up as part of a challenge program
    ChallengerWithProgram { login: String, program: String },
}

impl StatusContent {
    /// Builds the status from optional inputs.
    ///
    /// A program without a challenger is treated as unclaimed.
    pub fn from_parts(challenger: Option<String>, program: Option<String>) -> Self {
        match (challenger, program) {
            (Some(login), Some(program)) => StatusContent::ChallengerWithProgram { login, program },
            (Some(login), None) => StatusContent::Challenger { login },
            (None, Some(program)) => {
                tracing::debug!(
                    %program,
                    "program given without challenger, rendering as unclaimed"
                );
                StatusContent::Unclaimed
            }
            (None, None) => StatusContent::Unclaimed,
        }
    }

    pub fn render(&self) -> String {
        match self {
            StatusContent::Unclaimed => "The challenge has not picked yet.\n".to_string(),
            StatusContent::Challenger { login } => format!("Current challenger: @{}\n", login),
            StatusContent::ChallengerWithProgram { login, program } => format!(
                "Current challenger: @{}\nCurrent Program: {}\n",
                login, program
            ),
        }
    }
}

/// Message shown in the Notification section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub message: String,

    /// Login mentioned in front of the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl NotificationContent {
    pub fn new(message: impl Into<String>, sender: Option<String>) -> Self {
        Self {
            message: message.into(),
            sender,
        }
    }

    /// Renders the message, mentioning the sender when there is one.
    ///
    /// Leading line breaks are dropped: the span always starts after the blank
    /// lines below the header, so they could never be read back.
    pub fn render(&self) -> String {
        let message = self.message.trim_start_matches(['\r', '\n']);

        match &self.sender {
            Some(sender) => format!("@{} {}", sender, message),
            None => message.to_string(),
        }
    }
}

/// Content for one managed section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionContent {
    Status(StatusContent),
    Notification(NotificationContent),
}

impl SectionContent {
    /// Section this content belongs in
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionContent::Status(_) => SectionKind::Status,
            SectionContent::Notification(_) => SectionKind::Notification,
        }
    }

    /// Exact replacement text for the section's span
    pub fn render(&self) -> String {
        match self {
            SectionContent::Status(status) => status.render(),
            SectionContent::Notification(notification) => notification.render(),
        }
    }
}

impl From<StatusContent> for SectionContent {
    fn from(status: StatusContent) -> Self {
        SectionContent::Status(status)
    }
}

impl From<NotificationContent> for SectionContent {
    fn from(notification: NotificationContent) -> Self {
        SectionContent::Notification(notification)
    }
}
