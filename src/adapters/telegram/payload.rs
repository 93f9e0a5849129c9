//! Callback payload codec.
//!
//! Inline keyboard buttons carry opaque strings of the form
//! `<action>_<user_id>[_<tier>]`:
//!
//! - `subscription_<tier>` - a user picked a tier
//! - `approve_<user_id>_<tier>` - the approver accepted a payment proof
//! - `reject_<user_id>` - the approver declined it
//!
//! Anything else parses to `None`; the caller logs and ignores it.

use crate::domain::{Tier, UserId};

/// Decoded callback button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackPayload {
    /// A user chose a subscription tier.
    TierSelected(Tier),
    /// The approver accepted a payment proof.
    Approve { user_id: UserId, tier: Tier },
    /// The approver declined a payment proof.
    Reject { user_id: UserId },
}

impl CallbackPayload {
    /// Render the payload into its wire form.
    pub fn encode(&self) -> String {
        match self {
            CallbackPayload::TierSelected(tier) => format!("subscription_{}", tier),
            CallbackPayload::Approve { user_id, tier } => {
                format!("approve_{}_{}", user_id, tier)
            }
            CallbackPayload::Reject { user_id } => format!("reject_{}", user_id),
        }
    }

    /// Parse a wire payload. Returns `None` for anything unrecognized.
    pub fn parse(data: &str) -> Option<Self> {
        let mut parts = data.splitn(3, '_');
        let action = parts.next()?;
        match action {
            "subscription" => {
                let tier = parts.next()?.parse().ok()?;
                if parts.next().is_some() {
                    return None;
                }
                Some(CallbackPayload::TierSelected(tier))
            }
            "approve" => {
                let user_id = parts.next()?.parse().ok()?;
                let tier = parts.next()?.parse().ok()?;
                Some(CallbackPayload::Approve { user_id, tier })
            }
            "reject" => {
                let user_id = parts.next()?.parse().ok()?;
                if parts.next().is_some() {
                    return None;
                }
                Some(CallbackPayload::Reject { user_id })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_tier_selection() {
        assert_eq!(
            CallbackPayload::parse("subscription_weekly"),
            Some(CallbackPayload::TierSelected(Tier::Weekly))
        );
    }

    #[test]
    fn parses_approval_with_tier() {
        assert_eq!(
            CallbackPayload::parse("approve_1618347551_monthly"),
            Some(CallbackPayload::Approve {
                user_id: UserId::new(1618347551),
                tier: Tier::Monthly,
            })
        );
    }

    #[test]
    fn parses_rejection() {
        assert_eq!(
            CallbackPayload::parse("reject_42"),
            Some(CallbackPayload::Reject {
                user_id: UserId::new(42)
            })
        );
    }

    #[test]
    fn rejects_junk() {
        for junk in [
            "",
            "approve",
            "approve_notanumber_weekly",
            "approve_12_lifetime",
            "subscription_lifetime",
            "subscription_weekly_extra",
            "reject_",
            "reject_12_weekly",
            "ban_12",
        ] {
            assert_eq!(CallbackPayload::parse(junk), None, "accepted {:?}", junk);
        }
    }

    fn any_tier() -> impl Strategy<Value = Tier> {
        prop_oneof![
            Just(Tier::Weekly),
            Just(Tier::Monthly),
            Just(Tier::Annual)
        ]
    }

    fn any_payload() -> impl Strategy<Value = CallbackPayload> {
        prop_oneof![
            any_tier().prop_map(CallbackPayload::TierSelected),
            (any::<i64>(), any_tier()).prop_map(|(id, tier)| CallbackPayload::Approve {
                user_id: UserId::new(id),
                tier,
            }),
            any::<i64>().prop_map(|id| CallbackPayload::Reject {
                user_id: UserId::new(id)
            }),
        ]
    }

    proptest! {
        #[test]
        fn encode_parse_roundtrip(payload in any_payload()) {
            prop_assert_eq!(CallbackPayload::parse(&payload.encode()), Some(payload));
        }
    }
}
