use serde::Deserialize;

/// Inbound update object as delivered by the chat platform. The platform owns
/// this schema and has changed the shape of reaction data more than once, so
/// every field is optional and unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Update {
    pub message: Option<IncomingMessage>,
    pub edited_message: Option<IncomingMessage>,
    /// Reaction-change event; newer platform revisions deliver reactions here
    /// instead of on the message itself.
    pub message_reaction: Option<ReactionEvent>,
    /// Oldest observed shape: a single reaction paired with a top-level actor.
    pub reaction: Option<ReactionEntry>,
    pub actor: Option<Actor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IncomingMessage {
    pub message_id: Option<i64>,
    pub chat: Option<Chat>,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub date: Option<i64>,
    pub reactions: Option<Vec<ReactionEntry>>,
}

impl IncomingMessage {
    /// Message body for barcode extraction: `text` falling back to `caption`.
    pub fn body(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Chat {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Actor {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// One reaction as found in a message-level `reactions` array or the singular
/// top-level `reaction` field. Some revisions key the acting user as `actor`,
/// others as `user`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReactionEntry {
    pub emoji: Option<String>,
    #[serde(alias = "actor")]
    pub user: Option<Actor>,
    pub date: Option<i64>,
}

/// Reaction-change event (`message_reaction` on the update). Carries the actor
/// and timestamp at the event level; the emoji list is nested.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReactionEvent {
    pub chat: Option<Chat>,
    pub message_id: Option<i64>,
    #[serde(alias = "actor")]
    pub user: Option<Actor>,
    pub date: Option<i64>,
    pub new_reaction: Option<Vec<ReactionEntry>>,
}

impl Update {
    /// The message (or edited message) this update is about, if any.
    pub fn any_message(&self) -> Option<&IncomingMessage> {
        self.message.as_ref().or(self.edited_message.as_ref())
    }

    pub fn chat_id(&self) -> Option<i64> {
        self.any_message()
            .and_then(|m| m.chat.as_ref())
            .or_else(|| self.message_reaction.as_ref().and_then(|r| r.chat.as_ref()))
            .and_then(|c| c.id)
    }

    pub fn message_id(&self) -> Option<i64> {
        self.any_message()
            .and_then(|m| m.message_id)
            .or_else(|| self.message_reaction.as_ref().and_then(|r| r.message_id))
    }
}
