use crate::cli::commands::CommandDefinition;
use crate::cli::context::{CliContext, CommandError, CommandResult};
use crate::cli::output;
use crate::config::Config;
use crate::core::period::PeriodKind;
use crate::extraction::ModelRouter;

const KEYS: &str = "currency, period, trend-days, models, cooldown";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show or change preferences",
        "config [set <currency|period|trend-days|models|cooldown> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut CliContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show(context),
        ["set", key, value @ ..] if !value.is_empty() => {
            let updated = apply(context.config.clone(), key, &value.join(" "))?;
            context.save_config(updated)?;
            output::success(format!("Updated {key}."));
            show(context)
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [set <key> <value>]".into(),
        )),
    }
}

fn show(context: &CliContext) -> CommandResult {
    let config = &context.config;
    let router = ModelRouter::from_config(config)?;
    output::section("Preferences");
    output::info(format!("  Currency     : {}", config.currency_prefix));
    output::info(format!("  Period       : {}", config.default_period));
    output::info(format!("  Trend days   : {}", config.trend_days));
    output::info(format!("  Models       : {}", router.chain().join(" -> ")));
    output::info(format!("  Cooldown     : {}s", config.model_cooldown().num_seconds()));
    Ok(())
}

fn apply(mut config: Config, key: &str, value: &str) -> Result<Config, CommandError> {
    let value = value.trim();
    match key.to_lowercase().as_str() {
        "currency" => config.currency_prefix = value.to_string(),
        "period" => config.default_period = PeriodKind::parse(value)?,
        "trend-days" => config.trend_days = parse_number(key, value)?,
        "models" => {
            config.models = value
                .split(',')
                .map(|model| model.trim().to_string())
                .filter(|model| !model.is_empty())
                .collect();
        }
        "cooldown" => config.model_cooldown_secs = parse_number(key, value)?,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown key `{other}`; expected one of {KEYS}"
            )))
        }
    }
    Ok(config)
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{value}` is not a valid {key}")))
}
