use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Ai,
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ai" => Some(Self::Ai),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Question,
    Answer,
    Suggestion,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Answer => "answer",
            Self::Suggestion => "suggestion",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "question" => Some(Self::Question),
            "answer" => Some(Self::Answer),
            "suggestion" => Some(Self::Suggestion),
            _ => None,
        }
    }
}

/// One entry of the advisory conversation kept for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
}

impl ConversationMessage {
    pub fn question(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Ai,
            kind: MessageKind::Question,
            content: content.into(),
        }
    }

    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            kind: MessageKind::Answer,
            content: content.into(),
        }
    }

    pub fn suggestion(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Ai,
            kind: MessageKind::Suggestion,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        for role in [MessageRole::Ai, MessageRole::User] {
            assert_eq!(MessageRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(MessageRole::parse("system"), None);
    }

    #[test]
    fn kind_round_trips_through_text() {
        for kind in [MessageKind::Question, MessageKind::Answer, MessageKind::Suggestion] {
            assert_eq!(MessageKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::parse("advice"), None);
    }

    #[test]
    fn constructors_pair_role_and_kind() {
        let q = ConversationMessage::question("Do you pay rent?");
        let a = ConversationMessage::answer("Yes");
        let s = ConversationMessage::suggestion("Invest in ELSS");

        assert_eq!((q.role, q.kind), (MessageRole::Ai, MessageKind::Question));
        assert_eq!((a.role, a.kind), (MessageRole::User, MessageKind::Answer));
        assert_eq!((s.role, s.kind), (MessageRole::Ai, MessageKind::Suggestion));
    }
}
