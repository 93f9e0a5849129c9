//! User-facing message texts.
//!
//! All texts are HTML (the dispatcher sends them with `ParseMode::Html`).
//! User-controlled strings must pass through [`html::escape`] before being
//! interpolated.

use teloxide::utils::html;

use crate::domain::{Tier, UserId, TRIAL_DURATION_MINUTES};

fn admin_mention(admin_name: &str, admin_id: UserId) -> String {
    format!(
        r#"<a href="tg://user?id={}">{}</a>"#,
        admin_id,
        html::escape(admin_name)
    )
}

fn user_mention(user_id: UserId) -> String {
    format!(r#"<a href="tg://user?id={}">{}</a>"#, user_id, user_id)
}

/// Caption for the `/start` welcome photo.
pub fn welcome(user_name: &str, admin_name: &str, admin_id: UserId) -> String {
    format!(
        "<b>Hello {}!</b>\n\n\
         <i>This bot sells access to private media channels.</i>\n\
         - Use /subscribe to pick a subscription.\n\
         - Use /trial_subscribe for a one-time {}-minute trial.\n\n\
         <b>Admin:</b> {}",
        html::escape(user_name),
        TRIAL_DURATION_MINUTES,
        admin_mention(admin_name, admin_id)
    )
}

/// Prompt above the tier keyboard.
pub fn choose_tier() -> &'static str {
    "<b>Select a subscription tier:</b>"
}

/// Payment instructions shown after a tier is picked.
pub fn payment_instructions(card_number: &str, admin_name: &str, admin_id: UserId) -> String {
    format!(
        "<b>Please send a photo of the transfer showing the transaction number.</b>\n\n\
         <b>Card:</b> <code>{}</code>\n\
         <b>Admin:</b> {}",
        html::escape(card_number),
        admin_mention(admin_name, admin_id)
    )
}

/// Sent with each single-use invite link after approval.
pub fn invite_for_subscriber(invite_url: &str) -> String {
    format!(
        "<b>Single-use invite link to the channel:</b>\n{}\n\
         <blockquote>Thank you for subscribing. Contact the admin with any \
         problem. You will be notified one day before your subscription \
         expires.</blockquote>",
        invite_url
    )
}

/// Sent with each single-use invite link after a trial activation.
pub fn invite_for_trial(invite_url: &str) -> String {
    format!(
        "<b>Single-use invite link to the channel:</b>\n{}\n\
         <b>Trial subscription active for {} minutes.</b>",
        invite_url, TRIAL_DURATION_MINUTES
    )
}

/// Reply when the one-time trial was already claimed.
pub fn trial_already_claimed() -> &'static str {
    "You have already claimed the trial subscription."
}

/// Reply after payment proof is forwarded to the approver.
pub fn proof_received() -> &'static str {
    "Photo received. Please wait for approval."
}

/// Reply when a photo arrives without a prior tier selection.
pub fn select_tier_first() -> &'static str {
    "Please select a subscription tier first using /subscribe."
}

/// Caption on the proof forwarded to the approver.
pub fn approval_request_caption(user_id: UserId, tier: Tier) -> String {
    format!(
        "New subscription request: {} from {}",
        tier.display_name(),
        user_mention(user_id)
    )
}

/// Caption edit once a request is approved.
pub fn approved_caption(tier: Tier) -> String {
    format!("Subscription approved: {}", tier.display_name())
}

/// Caption edit once a request is rejected.
pub fn rejected_caption() -> &'static str {
    "Subscription rejected."
}

/// Direct confirmation to the subscriber after approval.
pub fn subscription_approved(tier: Tier) -> String {
    format!(
        "Your {} subscription has been approved.",
        tier.display_name()
    )
}

/// Direct notice to the subscriber after rejection.
pub fn subscription_rejected() -> &'static str {
    "Your subscription request has been rejected."
}

/// Notice sent when the expiration sweep removes a user.
pub fn removed_from_channels() -> &'static str {
    "Your subscription expired and you have been removed from the channels."
}

/// Day-ahead renewal reminder.
pub fn expiry_reminder() -> &'static str {
    "Your subscription expires tomorrow. To renew it, please make the corresponding payment."
}

/// Generic failure notice when an invite could not be produced.
pub fn delivery_failure() -> &'static str {
    "Something went wrong generating your invite link. Please try again later."
}
