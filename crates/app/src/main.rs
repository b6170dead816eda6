use std::path::Path;
use std::process::ExitCode;

mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match settings::Settings::new() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to load settings: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "fundbot={level},telegram_bot={level},ledger={level},rates={level}",
            level = settings.app.level
        ))
        .init();

    // The bot cannot function without ledger access.
    let ledger = match ledger::Ledger::new(
        settings.ledger.spreadsheet_id,
        Path::new(&settings.ledger.credentials),
    ) {
        Ok(ledger) => ledger,
        Err(err) => {
            tracing::error!("failed to initialize ledger access: {err}");
            return ExitCode::FAILURE;
        }
    };

    let rates = rates::RateSources::new(settings.providers.alpha_vantage_api_key);

    let bot = telegram_bot::Bot::new(&settings.telegram.token, ledger, rates);
    if let Err(err) = bot.run().await {
        tracing::error!("telegram bot stopped: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
