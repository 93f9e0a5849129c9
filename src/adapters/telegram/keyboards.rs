//! Inline keyboards for the subscription flows.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use super::payload::CallbackPayload;
use crate::domain::{Tier, UserId};

fn price_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Weekly => "Weekly - 50 CUP",
        Tier::Monthly => "Monthly - 150 CUP",
        Tier::Annual => "Annual - 550 CUP",
    }
}

/// One button per tier, one tier per row.
pub fn tier_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(Tier::all().map(|tier| {
        vec![InlineKeyboardButton::callback(
            price_label(tier),
            CallbackPayload::TierSelected(tier).encode(),
        )]
    }))
}

/// Approve/Reject buttons attached to a forwarded payment proof.
pub fn decision_keyboard(user_id: UserId, tier: Tier) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![InlineKeyboardButton::callback(
            "Approve",
            CallbackPayload::Approve { user_id, tier }.encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "Reject",
            CallbackPayload::Reject { user_id }.encode(),
        )],
    ])
}
