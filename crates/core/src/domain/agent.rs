use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Running,
    Paused,
    Stopped,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }

    /// Only active and running agents may receive messages.
    pub fn is_dispatchable(&self) -> bool {
        matches!(self, Self::Active | Self::Running)
    }
}

impl std::str::FromStr for AgentStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            "stopped" => Ok(Self::Stopped),
            other => Err(DomainError::UnknownAgentStatus(other.to_owned())),
        }
    }
}

/// What an agent is, as a closed set of personas rather than a free-form
/// type string plus untyped config blob. The serialized `kind` doubles as
/// the skill string the selector matches intents against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AgentPersona {
    ContentWriter {
        #[serde(default)]
        focus_topics: Vec<String>,
    },
    SeoSpecialist {
        #[serde(default)]
        focus_topics: Vec<String>,
    },
    Marketing {
        #[serde(default)]
        focus_topics: Vec<String>,
    },
    CustomerSupport {
        #[serde(default)]
        focus_topics: Vec<String>,
    },
    DataAnalyst {
        #[serde(default)]
        focus_topics: Vec<String>,
    },
    Custom {
        instructions: String,
        #[serde(default)]
        focus_topics: Vec<String>,
    },
}

impl AgentPersona {
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::ContentWriter { .. } => "content-writer",
            Self::SeoSpecialist { .. } => "seo-specialist",
            Self::Marketing { .. } => "marketing",
            Self::CustomerSupport { .. } => "customer-support",
            Self::DataAnalyst { .. } => "data-analyst",
            Self::Custom { .. } => "custom",
        }
    }

    pub fn focus_topics(&self) -> &[String] {
        match self {
            Self::ContentWriter { focus_topics }
            | Self::SeoSpecialist { focus_topics }
            | Self::Marketing { focus_topics }
            | Self::CustomerSupport { focus_topics }
            | Self::DataAnalyst { focus_topics }
            | Self::Custom { focus_topics, .. } => focus_topics,
        }
    }

    /// Rebuild a persona from its stored parts (kind column, optional
    /// instructions column, focus-topics list).
    pub fn from_parts(
        kind: &str,
        instructions: Option<String>,
        focus_topics: Vec<String>,
    ) -> Result<Self, DomainError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "content-writer" => Ok(Self::ContentWriter { focus_topics }),
            "seo-specialist" => Ok(Self::SeoSpecialist { focus_topics }),
            "marketing" => Ok(Self::Marketing { focus_topics }),
            "customer-support" => Ok(Self::CustomerSupport { focus_topics }),
            "data-analyst" => Ok(Self::DataAnalyst { focus_topics }),
            "custom" => Ok(Self::Custom {
                instructions: instructions.unwrap_or_default(),
                focus_topics,
            }),
            other => Err(DomainError::UnknownPersonaKind(other.to_owned())),
        }
    }

    pub fn instructions(&self) -> Option<&str> {
        match self {
            Self::Custom { instructions, .. } => Some(instructions),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub owner_id: UserId,
    pub name: String,
    pub status: AgentStatus,
    pub persona: AgentPersona,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        persona: AgentPersona,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AgentId::new(),
            owner_id,
            name: name.into(),
            status: AgentStatus::Active,
            persona,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AgentPersona, AgentStatus};

    #[test]
    fn dispatchable_statuses() {
        assert!(AgentStatus::Active.is_dispatchable());
        assert!(AgentStatus::Running.is_dispatchable());
        assert!(!AgentStatus::Paused.is_dispatchable());
        assert!(!AgentStatus::Stopped.is_dispatchable());
    }

    #[test]
    fn persona_kind_strings_are_stable() {
        let persona = AgentPersona::ContentWriter { focus_topics: vec![] };
        assert_eq!(persona.kind_str(), "content-writer");

        let rebuilt = AgentPersona::from_parts("content-writer", None, vec![]).unwrap();
        assert_eq!(rebuilt, persona);
    }

    #[test]
    fn custom_persona_keeps_instructions() {
        let persona = AgentPersona::from_parts(
            "custom",
            Some("Answer only in haiku.".to_owned()),
            vec!["poetry".to_owned()],
        )
        .unwrap();

        assert_eq!(persona.instructions(), Some("Answer only in haiku."));
        assert_eq!(persona.focus_topics(), ["poetry".to_owned()]);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(AgentPersona::from_parts("wizard", None, vec![]).is_err());
    }

    #[test]
    fn persona_serde_tag_matches_kind_string() {
        let persona = AgentPersona::SeoSpecialist { focus_topics: vec!["b2b".to_owned()] };
        let json = serde_json::to_value(&persona).unwrap();
        assert_eq!(json["kind"], "seo-specialist");
    }
}
