use serde::{Deserialize, Serialize};

use super::HospitalInfo;

/// Labels longer than this many characters are shortened.
pub const QUICK_REPLY_LABEL_CHARS: usize = 30;

/// A one-tap suggestion; sending it sends `full_text`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickReply {
    pub id: String,
    pub label: String,
    pub full_text: String,
}

/// Suggestions built from the first `limit` FAQ questions.
pub fn quick_replies(info: &HospitalInfo, limit: usize) -> Vec<QuickReply> {
    info.faq_questions
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, question)| QuickReply {
            id: format!("faq_{}", index),
            label: shorten(question),
            full_text: question.clone(),
        })
        .collect()
}

// Character based so Arabic text is never cut inside a code point
fn shorten(text: &str) -> String {
    if text.chars().count() > QUICK_REPLY_LABEL_CHARS {
        let head: String = text.chars().take(QUICK_REPLY_LABEL_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
