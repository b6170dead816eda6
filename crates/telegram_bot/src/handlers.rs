//! Update handling.
//!
//! Two branches per message: free text becomes a ledger row, recognized
//! commands render a reply. Replies to other messages are ignored, and so is
//! everything that is not a message. Errors from outbound sends propagate to
//! the run loop; everything upstream (providers, ledger reads) degrades to a
//! reduced or fixed reply instead.

use teloxide::{
    prelude::*,
    types::{ChatAction, Message, ParseMode, Update, UpdateKind},
    utils::command::BotCommands,
};

use crate::{commands::Command, parsing, ui};

pub(crate) struct BotContext {
    pub ledger: ledger::Ledger,
    pub rates: rates::RateSources,
    pub bot_name: String,
}

pub(crate) async fn handle_update(
    bot: &Bot,
    ctx: &BotContext,
    update: Update,
) -> ResponseResult<()> {
    let UpdateKind::Message(msg) = update.kind else {
        tracing::debug!("ignoring non-message update");
        return Ok(());
    };
    handle_message(bot, ctx, &msg).await
}

async fn handle_message(bot: &Bot, ctx: &BotContext, msg: &Message) -> ResponseResult<()> {
    if msg.reply_to_message().is_some() {
        return Ok(());
    }
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if text.starts_with('/') {
        let Ok(cmd) = Command::parse(text, &ctx.bot_name) else {
            tracing::debug!("ignoring unrecognized command: {text}");
            return Ok(());
        };
        // Best effort; a failed typing indicator is not worth a restart.
        let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
        return handle_command(bot, ctx, msg, cmd).await;
    }

    handle_expense(bot, ctx, msg, text).await
}

async fn handle_command(
    bot: &Bot,
    ctx: &BotContext,
    msg: &Message,
    cmd: Command,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, ui::help_text()).await?;
        }
        Command::Rates => {
            let quotes = ctx.rates.fetch_all().await;
            bot.send_message(msg.chat.id, ui::render_rates(&quotes))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Command::List => {
            let text = match ctx.ledger.totals_by_user(true).await {
                Ok(totals) => ui::render_totals(&totals),
                Err(err) => {
                    tracing::error!("failed to load ledger totals: {err}");
                    ui::NO_DATA.to_string()
                }
            };
            bot.send_message(msg.chat.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }

    Ok(())
}

async fn handle_expense(
    bot: &Bot,
    ctx: &BotContext,
    msg: &Message,
    text: &str,
) -> ResponseResult<()> {
    let input = parsing::parse_expense(text);
    let username = msg
        .from
        .as_ref()
        .and_then(|user| user.username.clone())
        .unwrap_or_default();

    let expense = ledger::Expense {
        id: i64::from(msg.id.0),
        amount: input.amount,
        reason: input.reason.clone(),
        source: String::new(),
        date: msg.date.timestamp().to_string(),
        username,
        active: true,
    };

    let reply = if ctx.ledger.append(std::slice::from_ref(&expense)).await {
        ui::render_saved(input.amount, &input.reason)
    } else {
        ui::SAVE_FAILED.to_string()
    };
    bot.send_message(msg.chat.id, reply).await?;

    Ok(())
}
