use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Sentinel limit meaning "no cap".
pub const UNLIMITED: i64 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Free,
    Starter,
    Pro,
    Agency,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Starter => "STARTER",
            Self::Pro => "PRO",
            Self::Agency => "AGENCY",
        }
    }

    /// The single authoritative monthly message allowance per tier.
    /// Nothing else in the workspace defines limits; the per-user
    /// `message_limit` column is initialized from this table.
    pub fn message_limit(&self) -> i64 {
        match self {
            Self::Free => 100,
            Self::Starter => 500,
            Self::Pro | Self::Agency => UNLIMITED,
        }
    }

    /// Tiers covered by the monthly reset job. Free is excluded: its
    /// counter is a cumulative lifetime cap, not a monthly allowance.
    pub fn is_billable(&self) -> bool {
        !matches!(self, Self::Free)
    }

    /// Per-message overage price once a capped billable tier exceeds its
    /// allowance. Only Starter accrues overage; Free is hard-capped and
    /// the unlimited tiers never go over.
    pub fn overage_cents_per_message(&self) -> i64 {
        match self {
            Self::Starter => 10,
            _ => 0,
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionTier {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FREE" => Ok(Self::Free),
            "STARTER" => Ok(Self::Starter),
            "PRO" => Ok(Self::Pro),
            "AGENCY" => Ok(Self::Agency),
            other => Err(DomainError::UnknownTier(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SubscriptionTier, UNLIMITED};

    #[test]
    fn limits_match_pricing_table() {
        assert_eq!(SubscriptionTier::Free.message_limit(), 100);
        assert_eq!(SubscriptionTier::Starter.message_limit(), 500);
        assert_eq!(SubscriptionTier::Pro.message_limit(), UNLIMITED);
        assert_eq!(SubscriptionTier::Agency.message_limit(), UNLIMITED);
    }

    #[test]
    fn free_is_not_billable() {
        assert!(!SubscriptionTier::Free.is_billable());
        assert!(SubscriptionTier::Starter.is_billable());
        assert!(SubscriptionTier::Pro.is_billable());
        assert!(SubscriptionTier::Agency.is_billable());
    }

    #[test]
    fn only_starter_accrues_overage() {
        assert_eq!(SubscriptionTier::Starter.overage_cents_per_message(), 10);
        assert_eq!(SubscriptionTier::Free.overage_cents_per_message(), 0);
        assert_eq!(SubscriptionTier::Pro.overage_cents_per_message(), 0);
    }

    #[test]
    fn string_codec_round_trips() {
        for tier in [
            SubscriptionTier::Free,
            SubscriptionTier::Starter,
            SubscriptionTier::Pro,
            SubscriptionTier::Agency,
        ] {
            assert_eq!(tier.as_str().parse::<SubscriptionTier>(), Ok(tier));
        }
        assert_eq!("starter".parse::<SubscriptionTier>(), Ok(SubscriptionTier::Starter));
        assert!("GOLD".parse::<SubscriptionTier>().is_err());
    }
}
