//! Terminal interface for VectorMind

mod chat;
mod ui;


pub use chat::{ChatCommand, ChatMessage, ChatSession, Role};
pub use ui::{
    clear_screen, display_banner, handle_input_with_history, print_help, print_status,
    render_answer,
};

// Re-export core types
pub use vectormind_core::{Error, Result, ServiceStatus};
