use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Inbound surface a message arrived on. Chat channels resolve users by
/// the matching external identity; `Api` resolves by internal user id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Telegram,
    Discord,
    Slack,
    Api,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telegram => "telegram",
            Self::Discord => "discord",
            Self::Slack => "slack",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "telegram" => Ok(Self::Telegram),
            "discord" => Ok(Self::Discord),
            "slack" => Ok(Self::Slack),
            "api" => Ok(Self::Api),
            other => Err(DomainError::UnknownChannel(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Channel;

    #[test]
    fn string_codec_round_trips() {
        for channel in [Channel::Telegram, Channel::Discord, Channel::Slack, Channel::Api] {
            assert_eq!(channel.as_str().parse::<Channel>(), Ok(channel));
        }
        assert!("irc".parse::<Channel>().is_err());
    }
}
