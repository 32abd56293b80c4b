//! Messages API payload pieces
//!
//! Every analysis is a single user turn; the system prompt travels
//! separately as the Messages API expects.

use repolens_foundation::ContextDocument;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// The one user turn of an analysis: context document, then the request
    pub fn analysis_request(context: &ContextDocument, prompt: &str) -> Self {
        Self::user(format!(
            "Here is the repository information:\n\n{}\n\n---\n\nUser's Request:\n{}\n\nPlease analyze the codebase and respond to the user's request.",
            context.as_str(),
            prompt
        ))
    }
}
