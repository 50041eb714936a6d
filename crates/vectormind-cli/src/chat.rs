//! Interactive chat session state

use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

/// One line typed at the chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Ask(String),
    Upload(String),
    Clear,
    Status,
    Help,
    Exit,
    Empty,
}

impl ChatCommand {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return ChatCommand::Empty;
        }

        let lower = input.to_lowercase();
        match lower.as_str() {
            "exit" | "quit" | "/exit" | "/quit" => return ChatCommand::Exit,
            "help" | "/help" => return ChatCommand::Help,
            "/clear" => return ChatCommand::Clear,
            "/status" => return ChatCommand::Status,
            _ => {}
        }

        if lower == "/upload" || lower.starts_with("/upload ") {
            return ChatCommand::Upload(input["/upload".len()..].trim().to_string());
        }

        ChatCommand::Ask(input.to_string())
    }
}

/// Conversation kept for the lifetime of the process only
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    document_ready: bool,
}

impl ChatSession {
    /// Start a session; `document_ready` is true when the collection already holds points
    pub fn new(document_ready: bool) -> Self {
        Self {
            messages: Vec::new(),
            document_ready,
        }
    }

    pub fn is_document_ready(&self) -> bool {
        self.document_ready
    }

    pub fn mark_document_ready(&mut self) {
        self.document_ready = true;
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Forget the conversation and return how many messages were dropped.
    ///
    /// Indexed documents stay available.
    pub fn clear(&mut self) -> usize {
        let dropped = self.messages.len();
        self.messages.clear();
        dropped
    }
}
