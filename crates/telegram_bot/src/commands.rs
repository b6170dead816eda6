//! Command definitions.

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub(crate) enum Command {
    #[command(description = "list available commands")]
    Start,
    #[command(description = "list active debts")]
    List,
    #[command(description = "exchange RUB => USD/EUR/GEL rates")]
    Rates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_command_parses_under_its_own_name() {
        assert_eq!(Command::parse("/start", "fundbot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/list", "fundbot").unwrap(), Command::List);
        assert_eq!(Command::parse("/rates", "fundbot").unwrap(), Command::Rates);
    }

    #[test]
    fn unknown_commands_do_not_parse() {
        assert!(Command::parse("/help", "fundbot").is_err());
    }
}
