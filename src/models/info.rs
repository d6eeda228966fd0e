use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Author;

/// Display metadata from `GET /hospital-info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HospitalInfo {
    #[serde(default)]
    pub info: HospitalDetails,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub faq_questions: Vec<String>,
    #[serde(default)]
    pub popular_questions: Vec<String>,
}

/// Contact details. The backend sends a free-form map, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HospitalDetails {
    pub name: String,
    pub location: String,
    pub emergency_number: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub visiting_hours: String,
    pub pharmacy_hours: String,
}

impl HospitalInfo {
    /// Name for the chat header, with a generic fallback.
    pub fn display_name(&self) -> &str {
        if self.info.name.trim().is_empty() {
            "AI Assistant"
        } else {
            &self.info.name
        }
    }
}

/// Server-side history from `GET /conversation/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationHistory {
    pub conversation_id: String,
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
    #[serde(default)]
    pub message_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub role: Author,
    pub content: String,
    /// Unix seconds with fractional part
    pub timestamp: f64,
    #[serde(default)]
    pub is_faq: bool,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

impl HistoryEntry {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.timestamp.trunc() as i64;
        let nanos = (self.timestamp.fract() * 1e9) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}
