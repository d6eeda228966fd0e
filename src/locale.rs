//! User-facing strings.
//!
//! The widget ships Arabic by default; English is available for operators
//! and tests.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Arabic,
    English,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" | "arabic" => Ok(Locale::Arabic),
            "en" | "english" => Ok(Locale::English),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

impl Locale {
    /// Message text for an in-band `error` event.
    pub fn stream_error(self, detail: Option<&str>) -> String {
        let detail = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| self.generic_error_detail());
        match self {
            Locale::Arabic => format!("عذراً، حدث خطأ: {}", detail),
            Locale::English => format!("Sorry, an error occurred: {}", detail),
        }
    }

    /// Fallback when the backend gives no error detail.
    pub fn generic_error_detail(self) -> &'static str {
        match self {
            Locale::Arabic => "حدث خطأ أثناء معالجة الرسالة",
            Locale::English => "An error occurred while processing the message",
        }
    }

    /// Message text after a transport failure.
    pub fn send_failed(self) -> &'static str {
        match self {
            Locale::Arabic => "عذراً، حدث خطأ في الإرسال. يرجى المحاولة مرة أخرى.",
            Locale::English => "Sorry, the message could not be sent. Please try again.",
        }
    }

    /// Notification title for send failures and in-band errors.
    pub fn send_error_title(self) -> &'static str {
        match self {
            Locale::Arabic => "خطأ في الإرسال",
            Locale::English => "Send error",
        }
    }

    /// Notification description for a transport failure.
    pub fn send_failed_detail(self) -> &'static str {
        match self {
            Locale::Arabic => "فشل في إرسال الرسالة",
            Locale::English => "Failed to send the message",
        }
    }

    /// Notification after the user stopped an answer.
    pub fn stopped_title(self) -> &'static str {
        match self {
            Locale::Arabic => "تم إيقاف الإجابة",
            Locale::English => "Answer stopped",
        }
    }

    pub fn stopped_detail(self) -> &'static str {
        match self {
            Locale::Arabic => "تم إيقاف الإجابة قبل اكتمالها",
            Locale::English => "The answer was stopped before it finished",
        }
    }

    /// Notification when the stream ended without `end` or `error`.
    pub fn incomplete_title(self) -> &'static str {
        match self {
            Locale::Arabic => "إجابة غير مكتملة",
            Locale::English => "Incomplete answer",
        }
    }

    pub fn incomplete_detail(self) -> &'static str {
        match self {
            Locale::Arabic => "انقطع الاتصال قبل اكتمال الإجابة",
            Locale::English => "The connection closed before the answer finished",
        }
    }

    pub fn load_error_title(self) -> &'static str {
        match self {
            Locale::Arabic => "خطأ في التحميل",
            Locale::English => "Loading error",
        }
    }

    pub fn load_info_failed(self) -> &'static str {
        match self {
            Locale::Arabic => "فشل في تحميل معلومات المستشفى",
            Locale::English => "Failed to load hospital information",
        }
    }

    pub fn greeting(self) -> &'static str {
        match self {
            Locale::Arabic => "كيف يمكنني مساعدتك اليوم؟",
            Locale::English => "How can I help you today?",
        }
    }
}
