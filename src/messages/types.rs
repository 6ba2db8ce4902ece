use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the conversation, either typed by the user or returned by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(text: impl Into<String>, is_bot: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_bot,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_author() {
        assert!(!Message::user("hi").is_bot);
        assert!(Message::bot("hello").is_bot);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(Message::user("a").id, Message::user("a").id);
    }
}
