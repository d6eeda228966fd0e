mod info;
mod message;
mod quick_reply;
mod request;

pub use info::{ConversationHistory, HistoryEntry, HospitalDetails, HospitalInfo};
pub use message::{Author, ConversationMessage, MessageId, MessageStatus};
pub use quick_reply::{quick_replies, QuickReply, QUICK_REPLY_LABEL_CHARS};
pub use request::{ChatRequest, ChatResponse};
