use crate::cli::commands::{CommandDefinition, CommandRegistry};
use crate::cli::context::{CliContext, CommandError, CommandResult};
use crate::cli::output;
use crate::storage::json_backend::STORE_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new("help", "Show available commands", "help [command]", cmd_help),
    ]
}

fn cmd_version(context: &mut CliContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Expense Core {}", meta.version));
    output::info(format!("  CLI version  : {}", build_info::CLI_VERSION));
    output::info(format!("  Store schema : v{STORE_SCHEMA_VERSION}"));
    output::info(format!("  Build hash   : {}", meta.git_hash));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Target       : {}", meta.target));
    output::info(format!("  Profile      : {}", meta.profile));
    output::info(format!("  Rustc        : {}", meta.rustc));
    output::info(format!("  Data dir     : {}", context.base_dir.display()));
    Ok(())
}

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for entry in registry.iter() {
        output::info(format!("  {:<10} {}", entry.name, entry.description));
    }
    output::info("Use `help <command>` for details.");
}

pub fn cmd_help(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        print_overview(&context.registry);
        return Ok(());
    };
    let entry = context
        .registry
        .get(&name.to_lowercase())
        .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
    output::section(format!("Help: {}", entry.name));
    output::info(format!("  Description: {}", entry.description));
    output::info(format!("  Usage: {}", entry.usage));
    Ok(())
}
