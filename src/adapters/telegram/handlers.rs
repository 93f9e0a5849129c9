//! Update handlers: commands, payment-proof photos, and callback buttons.
//!
//! Handlers catch domain errors themselves and answer the user; platform
//! errors propagate to the dispatcher's logging error handler. Nothing
//! crashes the process and nothing is retried.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, ParseMode};
use teloxide::utils::command::BotCommands;
use tracing::{error, warn};

use super::keyboards::{decision_keyboard, tier_keyboard};
use super::messages;
use super::payload::CallbackPayload;
use crate::application::{deliver_invites, AppState, SubscriptionError};
use crate::domain::{Tier, Timestamp, UserId};

/// Text commands exposed by the bot.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "snake_case")]
pub enum Command {
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "choose a subscription tier")]
    Subscribe,
    #[command(description = "claim the one-time trial")]
    TrialSubscribe,
}

/// The dispatcher tree: commands, then payment-proof photos, then buttons.
pub fn schema() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.photo().is_some())
                .endpoint(photo_handler),
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}

fn sender_id(msg: &Message) -> Option<UserId> {
    msg.from.as_ref().map(|u| UserId::new(u.id.0 as i64))
}

async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: AppState,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => start(&bot, &msg, &state).await,
        Command::Subscribe => {
            bot.send_message(msg.chat.id, messages::choose_tier())
                .parse_mode(ParseMode::Html)
                .reply_markup(tier_keyboard())
                .await?;
            Ok(())
        }
        Command::TrialSubscribe => trial_subscribe(&bot, &msg, &state).await,
    }
}

async fn start(bot: &Bot, msg: &Message, state: &AppState) -> ResponseResult<()> {
    let user_name = msg
        .from
        .as_ref()
        .map(|u| u.full_name())
        .unwrap_or_else(|| "there".to_string());
    let caption = messages::welcome(
        &user_name,
        &state.config.bot.admin_display_name,
        UserId::new(state.config.bot.admin_chat_id),
    );

    match &state.config.bot.welcome_photo_path {
        Some(path) => {
            bot.send_photo(msg.chat.id, InputFile::file(path.clone()))
                .caption(caption)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        None => {
            bot.send_message(msg.chat.id, caption)
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }
    Ok(())
}

async fn trial_subscribe(bot: &Bot, msg: &Message, state: &AppState) -> ResponseResult<()> {
    let Some(user_id) = sender_id(msg) else {
        return Ok(());
    };

    match state.engine.activate_trial(user_id, Timestamp::now()).await {
        Ok(_) => {
            let delivery =
                deliver_invites(state.gateway.as_ref(), user_id, messages::invite_for_trial).await;
            if let Err(e) = delivery {
                warn!(user_id = %user_id, error = %e, "trial invite delivery failed");
                bot.send_message(msg.chat.id, messages::delivery_failure())
                    .await?;
            }
        }
        Err(SubscriptionError::TrialAlreadyClaimed(_)) => {
            bot.send_message(msg.chat.id, messages::trial_already_claimed())
                .await?;
        }
        Err(e) => {
            error!(user_id = %user_id, error = %e, "trial activation failed");
            bot.send_message(msg.chat.id, messages::delivery_failure())
                .await?;
        }
    }
    Ok(())
}

async fn photo_handler(bot: Bot, msg: Message, state: AppState) -> ResponseResult<()> {
    let Some(user_id) = sender_id(&msg) else {
        return Ok(());
    };

    match state.engine.pending_tier(user_id).await {
        Ok(tier) => forward_proof(&bot, &msg, &state, user_id, tier).await,
        Err(SubscriptionError::NoTierSelected(_)) => {
            bot.send_message(msg.chat.id, messages::select_tier_first())
                .await?;
            Ok(())
        }
        Err(e) => {
            error!(user_id = %user_id, error = %e, "pending selection lookup failed");
            bot.send_message(msg.chat.id, messages::delivery_failure())
                .await?;
            Ok(())
        }
    }
}

async fn forward_proof(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    user_id: UserId,
    tier: Tier,
) -> ResponseResult<()> {
    // Largest rendition carries the readable transaction number.
    let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) else {
        return Ok(());
    };

    bot.send_photo(
        ChatId(state.config.bot.admin_chat_id),
        InputFile::file_id(photo.file.id.clone()),
    )
    .caption(messages::approval_request_caption(user_id, tier))
    .parse_mode(ParseMode::Html)
    .reply_markup(decision_keyboard(user_id, tier))
    .await?;

    bot.send_message(msg.chat.id, messages::proof_received())
        .await?;
    Ok(())
}

async fn callback_handler(bot: Bot, q: CallbackQuery, state: AppState) -> ResponseResult<()> {
    let Some(data) = q.data.as_deref() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    match CallbackPayload::parse(data) {
        Some(CallbackPayload::TierSelected(tier)) => tier_selected(&bot, &q, &state, tier).await,
        Some(CallbackPayload::Approve { user_id, tier }) => {
            decide(&bot, &q, &state, Decision::Approve { user_id, tier }).await
        }
        Some(CallbackPayload::Reject { user_id }) => {
            decide(&bot, &q, &state, Decision::Reject { user_id }).await
        }
        None => {
            warn!(payload = data, "ignoring unrecognized callback payload");
            bot.answer_callback_query(q.id.clone()).await?;
            Ok(())
        }
    }
}

async fn tier_selected(
    bot: &Bot,
    q: &CallbackQuery,
    state: &AppState,
    tier: Tier,
) -> ResponseResult<()> {
    let user_id = UserId::new(q.from.id.0 as i64);
    bot.answer_callback_query(q.id.clone()).await?;

    if let Err(e) = state.engine.select_tier(user_id, tier).await {
        error!(user_id = %user_id, error = %e, "recording tier selection failed");
        bot.send_message(ChatId(user_id.as_i64()), messages::delivery_failure())
            .await?;
        return Ok(());
    }

    let instructions = messages::payment_instructions(
        &state.config.bot.payment_card,
        &state.config.bot.admin_display_name,
        UserId::new(state.config.bot.admin_chat_id),
    );
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id.as_i64()));
    bot.send_message(chat_id, instructions)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

enum Decision {
    Approve { user_id: UserId, tier: Tier },
    Reject { user_id: UserId },
}

async fn decide(
    bot: &Bot,
    q: &CallbackQuery,
    state: &AppState,
    decision: Decision,
) -> ResponseResult<()> {
    // Decision buttons only ever exist in the approver's chat, but the
    // payload alone must not be enough to grant access.
    if q.from.id.0 as i64 != state.config.bot.admin_chat_id {
        warn!(from = %q.from.id, "decision callback from non-approver");
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    }
    bot.answer_callback_query(q.id.clone()).await?;

    match decision {
        Decision::Approve { user_id, tier } => {
            if let Err(e) = state.engine.approve(user_id, tier, Timestamp::now()).await {
                error!(user_id = %user_id, error = %e, "approval failed");
                return Ok(());
            }

            let delivery = deliver_invites(
                state.gateway.as_ref(),
                user_id,
                messages::invite_for_subscriber,
            )
            .await;
            if let Err(e) = delivery {
                warn!(user_id = %user_id, error = %e, "invite delivery failed after approval");
                let _ = state
                    .gateway
                    .notify_user(user_id, messages::delivery_failure())
                    .await;
            }

            edit_caption(bot, q, messages::approved_caption(tier)).await?;
            if let Err(e) = state
                .gateway
                .notify_user(user_id, &messages::subscription_approved(tier))
                .await
            {
                warn!(user_id = %user_id, error = %e, "approval notice failed");
            }
        }
        Decision::Reject { user_id } => {
            if let Err(e) = state.engine.clear_selection(user_id).await {
                error!(user_id = %user_id, error = %e, "clearing selection failed");
            }

            edit_caption(bot, q, messages::rejected_caption().to_string()).await?;
            if let Err(e) = state
                .gateway
                .notify_user(user_id, messages::subscription_rejected())
                .await
            {
                warn!(user_id = %user_id, error = %e, "rejection notice failed");
            }
        }
    }
    Ok(())
}

async fn edit_caption(bot: &Bot, q: &CallbackQuery, caption: String) -> ResponseResult<()> {
    if let Some(message) = q.message.as_ref() {
        bot.edit_message_caption(message.chat().id, message.id())
            .caption(caption)
            .await?;
    }
    Ok(())
}
