use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// The day counter never advances past this value.
pub const DAY_CEILING: u32 = 30;

/// Persisted progress for one portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub last_question: Option<String>,
    pub last_answer: Option<String>,
    pub resume_code: Option<String>,
    pub notes: Option<String>,
    pub day: u32,
    pub updated_at: Option<DateTime<Local>>,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            last_question: None,
            last_answer: None,
            resume_code: None,
            notes: None,
            day: 1,
            updated_at: None,
        }
    }
}

impl SessionRecord {
    /// The stored exchange, if both halves are present.
    pub fn last_exchange(&self) -> Option<(&str, &str)> {
        match (&self.last_question, &self.last_answer) {
            (Some(q), Some(a)) => Some((q.as_str(), a.as_str())),
            _ => None,
        }
    }

    pub fn advance_day(&mut self) {
        self.day = self.day.saturating_add(1).min(DAY_CEILING);
    }
}
