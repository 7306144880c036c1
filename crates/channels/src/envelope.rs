//! Webhook payload subsets and their normalization.
//!
//! These types deserialize only the fields superclaw reads; unknown
//! fields in the platform payloads are ignored. Normalization rejects
//! payloads that carry no routable message (edited-message updates,
//! bot-authored messages, empty text) with an `EnvelopeError` the caller
//! can turn into a quiet 200.

use serde::Deserialize;
use thiserror::Error;

use superclaw_core::domain::Channel;
use superclaw_router::RouteRequest;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("payload carries no message")]
    NoMessage,
    #[error("message has no sender identity")]
    NoSender,
    #[error("message text is empty")]
    EmptyText,
    #[error("sender is a bot")]
    BotSender,
}

/// A normalized inbound message, one per platform payload shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub channel: Channel,
    pub external_user_id: String,
    pub text: String,
}

impl InboundMessage {
    pub fn into_request(self) -> RouteRequest {
        RouteRequest {
            channel: self.channel,
            external_user_id: self.external_user_id,
            text: self.text,
        }
    }
}

/// Telegram `Update` subset. Only plain `message` updates are routable;
/// edits, channel posts and the rest of the update zoo normalize to
/// `NoMessage`.
#[derive(Clone, Debug, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TelegramMessage {
    #[serde(default)]
    pub from: Option<TelegramUser>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
}

impl TelegramUpdate {
    pub fn normalize(self) -> Result<InboundMessage, EnvelopeError> {
        let message = self.message.ok_or(EnvelopeError::NoMessage)?;
        let from = message.from.ok_or(EnvelopeError::NoSender)?;
        if from.is_bot {
            return Err(EnvelopeError::BotSender);
        }
        let text = message.text.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(EnvelopeError::EmptyText);
        }
        Ok(InboundMessage {
            channel: Channel::Telegram,
            external_user_id: from.id.to_string(),
            text,
        })
    }
}

/// Discord message-create subset.
#[derive(Clone, Debug, Deserialize)]
pub struct DiscordMessage {
    pub id: String,
    #[serde(default)]
    pub author: Option<DiscordAuthor>,
    #[serde(default)]
    pub content: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DiscordAuthor {
    pub id: String,
    #[serde(default)]
    pub bot: bool,
}

impl DiscordMessage {
    pub fn normalize(self) -> Result<InboundMessage, EnvelopeError> {
        let author = self.author.ok_or(EnvelopeError::NoSender)?;
        if author.bot {
            return Err(EnvelopeError::BotSender);
        }
        if self.content.trim().is_empty() {
            return Err(EnvelopeError::EmptyText);
        }
        Ok(InboundMessage {
            channel: Channel::Discord,
            external_user_id: author.id,
            text: self.content,
        })
    }
}

/// Slack Events API callback subset. `bot_id` on the inner event marks
/// bot messages, which includes our own replies echoed back.
#[derive(Clone, Debug, Deserialize)]
pub struct SlackEventCallback {
    #[serde(rename = "type")]
    pub callback_type: String,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub event: Option<SlackMessageEvent>,
}

impl SlackEventCallback {
    /// Slack verifies the webhook URL by posting a challenge that must
    /// be echoed back.
    pub fn verification_challenge(&self) -> Option<&str> {
        (self.callback_type == "url_verification").then_some(self.challenge.as_deref()).flatten()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SlackMessageEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
}

impl SlackEventCallback {
    pub fn normalize(self) -> Result<InboundMessage, EnvelopeError> {
        if self.callback_type != "event_callback" {
            return Err(EnvelopeError::NoMessage);
        }
        let event = self.event.ok_or(EnvelopeError::NoMessage)?;
        if event.event_type != "message" {
            return Err(EnvelopeError::NoMessage);
        }
        if event.bot_id.is_some() {
            return Err(EnvelopeError::BotSender);
        }
        let user = event.user.ok_or(EnvelopeError::NoSender)?;
        let text = event.text.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(EnvelopeError::EmptyText);
        }
        Ok(InboundMessage { channel: Channel::Slack, external_user_id: user, text })
    }
}

#[cfg(test)]
mod tests {
    use superclaw_core::domain::Channel;

    use super::{DiscordMessage, EnvelopeError, SlackEventCallback, TelegramUpdate};

    #[test]
    fn telegram_message_normalizes_to_sender_and_text() {
        let update: TelegramUpdate = serde_json::from_str(
            r#"{
                "update_id": 10,
                "message": {
                    "message_id": 55,
                    "from": {"id": 42, "is_bot": false, "first_name": "Ana"},
                    "chat": {"id": 42, "type": "private"},
                    "text": "write me a post"
                }
            }"#,
        )
        .unwrap();

        let inbound = update.normalize().unwrap();
        assert_eq!(inbound.channel, Channel::Telegram);
        assert_eq!(inbound.external_user_id, "42");
        assert_eq!(inbound.text, "write me a post");
    }

    #[test]
    fn telegram_update_without_message_is_not_routable() {
        let update: TelegramUpdate =
            serde_json::from_str(r#"{"update_id": 11, "edited_message": {}}"#).unwrap();
        assert_eq!(update.normalize().unwrap_err(), EnvelopeError::NoMessage);
    }

    #[test]
    fn telegram_bot_senders_are_dropped() {
        let update: TelegramUpdate = serde_json::from_str(
            r#"{"update_id": 12, "message": {"from": {"id": 9, "is_bot": true}, "text": "hi"}}"#,
        )
        .unwrap();
        assert_eq!(update.normalize().unwrap_err(), EnvelopeError::BotSender);
    }

    #[test]
    fn telegram_photo_only_message_has_empty_text() {
        let update: TelegramUpdate = serde_json::from_str(
            r#"{"update_id": 13, "message": {"from": {"id": 9}, "photo": []}}"#,
        )
        .unwrap();
        assert_eq!(update.normalize().unwrap_err(), EnvelopeError::EmptyText);
    }

    #[test]
    fn discord_message_normalizes() {
        let message: DiscordMessage = serde_json::from_str(
            r#"{
                "id": "111",
                "channel_id": "222",
                "author": {"id": "333", "username": "ana", "bot": false},
                "content": "help with my ticket"
            }"#,
        )
        .unwrap();

        let inbound = message.normalize().unwrap();
        assert_eq!(inbound.channel, Channel::Discord);
        assert_eq!(inbound.external_user_id, "333");
    }

    #[test]
    fn discord_bot_echo_is_dropped() {
        let message: DiscordMessage = serde_json::from_str(
            r#"{"id": "111", "author": {"id": "333", "bot": true}, "content": "reply"}"#,
        )
        .unwrap();
        assert_eq!(message.normalize().unwrap_err(), EnvelopeError::BotSender);
    }

    #[test]
    fn slack_event_callback_normalizes() {
        let callback: SlackEventCallback = serde_json::from_str(
            r#"{
                "type": "event_callback",
                "event": {"type": "message", "user": "U123", "channel": "C1", "text": "stats chart"}
            }"#,
        )
        .unwrap();

        let inbound = callback.normalize().unwrap();
        assert_eq!(inbound.channel, Channel::Slack);
        assert_eq!(inbound.external_user_id, "U123");
    }

    #[test]
    fn slack_url_verification_is_not_a_message() {
        let callback: SlackEventCallback =
            serde_json::from_str(r#"{"type": "url_verification", "challenge": "abc"}"#).unwrap();
        assert_eq!(callback.verification_challenge(), Some("abc"));
        assert_eq!(callback.normalize().unwrap_err(), EnvelopeError::NoMessage);
    }

    #[test]
    fn slack_bot_message_is_dropped() {
        let callback: SlackEventCallback = serde_json::from_str(
            r#"{
                "type": "event_callback",
                "event": {"type": "message", "user": "U123", "bot_id": "B9", "text": "echo"}
            }"#,
        )
        .unwrap();
        assert_eq!(callback.normalize().unwrap_err(), EnvelopeError::BotSender);
    }
}
