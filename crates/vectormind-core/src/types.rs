//! Common types used across the VectorMind system

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload key under which a chunk's text is stored in the index
pub const TEXT_PAYLOAD_KEY: &str = "text";

/// A chunk of document text together with its embedding, as persisted in the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
}

/// A point returned by a similarity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub id: String,
    pub text: String,
    pub score: f32,
}

/// Reachability of an external service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    Online,
    Offline,
}

impl ServiceStatus {
    pub fn is_online(self) -> bool {
        self == ServiceStatus::Online
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Online => write!(f, "Online"),
            ServiceStatus::Offline => write!(f, "Offline"),
        }
    }
}
