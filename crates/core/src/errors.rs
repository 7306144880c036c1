use thiserror::Error;

/// Invariant violations raised while decoding or constructing domain
/// values. Layers above wrap these in their own taxonomies (repository,
/// completion, route) rather than passing them through raw.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown subscription tier `{0}`")]
    UnknownTier(String),
    #[error("unknown agent status `{0}`")]
    UnknownAgentStatus(String),
    #[error("unknown persona kind `{0}`")]
    UnknownPersonaKind(String),
    #[error("unknown channel `{0}`")]
    UnknownChannel(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[cfg(test)]
mod tests {
    use crate::errors::DomainError;

    #[test]
    fn messages_carry_the_offending_value() {
        assert_eq!(
            DomainError::UnknownTier("GOLD".to_owned()).to_string(),
            "unknown subscription tier `GOLD`"
        );
        assert_eq!(
            DomainError::UnknownChannel("irc".to_owned()).to_string(),
            "unknown channel `irc`"
        );
    }
}
