//! Telegram bot.
//!
//! The bot is a thin front-end: free-text messages become ledger rows, the
//! few commands either render aggregated provider rates or ledger totals.
//! Updates are pulled by a long-poll task into a channel and consumed by a
//! single task, so each update is processed to completion before the next
//! one starts.

use std::time::Duration;

use teloxide::{
    RequestError,
    prelude::*,
    types::{Update, UpdateId},
    utils::command::BotCommands,
};
use tokio::sync::mpsc;

mod commands;
mod handlers;
mod parsing;
mod ui;

const POLL_TIMEOUT_SECS: u32 = 30;
const POLL_RETRY: Duration = Duration::from_secs(1);

pub struct Bot {
    token: String,
    ledger: ledger::Ledger,
    rates: rates::RateSources,
}

impl Bot {
    pub fn new(token: &str, ledger: ledger::Ledger, rates: rates::RateSources) -> Self {
        Self {
            token: token.to_string(),
            ledger,
            rates,
        }
    }

    /// Runs the bot until an outbound send fails. A send failure is not
    /// recoverable here and is returned to the caller.
    pub async fn run(self) -> Result<(), RequestError> {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        let me = bot.get_me().await?;
        bot.set_my_commands(commands::Command::bot_commands())
            .await?;

        let ctx = handlers::BotContext {
            ledger: self.ledger,
            rates: self.rates,
            bot_name: me.username().to_string(),
        };

        let (updates_tx, mut updates_rx) = mpsc::channel::<Update>(100);
        let poller = tokio::spawn(poll_updates(bot.clone(), updates_tx));

        // Single consumer: one update at a time, each handled to completion.
        let result = loop {
            let Some(update) = updates_rx.recv().await else {
                break Ok(());
            };
            if let Err(err) = handlers::handle_update(&bot, &ctx, update).await {
                break Err(err);
            }
        };

        poller.abort();
        result
    }
}

/// Long-polls the update feed and forwards every update into the channel.
/// Poll failures are retried after a short pause; the task stops once the
/// consumer goes away.
async fn poll_updates(bot: teloxide::Bot, updates_tx: mpsc::Sender<Update>) {
    let mut offset: i32 = 0;

    loop {
        let updates = match bot
            .get_updates()
            .offset(offset)
            .timeout(POLL_TIMEOUT_SECS)
            .await
        {
            Ok(updates) => updates,
            Err(err) => {
                tracing::warn!("long poll failed: {err}");
                tokio::time::sleep(POLL_RETRY).await;
                continue;
            }
        };

        for update in updates {
            offset = next_offset(update.id, offset);
            if updates_tx.send(update).await.is_err() {
                return;
            }
        }
    }
}

// The Bot API offset field is i32 while update ids are u32; saturate
// instead of wrapping for ids beyond i32::MAX.
fn next_offset(id: UpdateId, current: i32) -> i32 {
    let next = i32::try_from(id.0).map_or(i32::MAX, |id| id.saturating_add(1));
    current.max(next)
}
