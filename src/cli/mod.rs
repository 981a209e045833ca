//! Non-interactive command line front end over the JSON expense store.

pub mod commands;
pub mod context;
pub mod output;

use std::env;

pub use commands::{all_definitions, CommandDefinition, CommandRegistry};
pub use commands::system::cmd_help;
pub use context::{CliContext, CommandError, CommandResult};

/// Runs the command named by the process arguments.
pub fn run_cli() -> CommandResult {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut context = CliContext::from_env()?;
    run_with_args(&mut context, &args)
}

/// Dispatches `args[0]` against the registry; no arguments prints help.
pub fn run_with_args(context: &mut CliContext, args: &[String]) -> CommandResult {
    let Some((name, rest)) = args.split_first() else {
        return cmd_help(context, &[]);
    };
    let name = match name.to_lowercase().as_str() {
        "--help" | "-h" => "help".to_string(),
        other => other.to_string(),
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    let handler = context
        .registry
        .get(&name)
        .map(|command| command.handler)
        .ok_or(CommandError::UnknownCommand(name))?;
    handler(context, &rest)
}
