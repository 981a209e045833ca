use std::{fs, path::Path};

use crate::cli::commands::CommandDefinition;
use crate::cli::context::{CliContext, CommandError, CommandResult};
use crate::cli::output;
use crate::core::utils::write_atomic;
use crate::errors::ExpenseError;
use crate::storage::migrate_local_to_user;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "export",
            "Write every expense as JSON to a file or stdout",
            "export [file]",
            cmd_export,
        ),
        CommandDefinition::new(
            "import",
            "Add expenses from an exported JSON file",
            "import <file>",
            cmd_import,
        ),
        CommandDefinition::new("clear", "Delete every stored expense", "clear", cmd_clear),
        CommandDefinition::new(
            "migrate",
            "Move on-device expenses into the signed-in user's store",
            "migrate",
            cmd_migrate,
        ),
    ]
}

fn cmd_export(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let json = context.repository().export_json()?;
    match args.first() {
        Some(path) => {
            write_atomic(Path::new(path), &json)?;
            output::success(format!("Exported to {path}"));
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_import(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let path = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: import <file>".into()))?;
    let json = fs::read_to_string(path)?;
    let count = context.repository().import_json(&json)?;
    output::success(format!("Imported {count} expenses"));
    Ok(())
}

fn cmd_clear(context: &mut CliContext, _args: &[&str]) -> CommandResult {
    let removed = context.repository().clear_all()?;
    output::success(format!("Removed {removed} expenses"));
    Ok(())
}

fn cmd_migrate(context: &mut CliContext, _args: &[&str]) -> CommandResult {
    let Some(user) = context.session.identity().cloned() else {
        return Err(ExpenseError::NotAuthenticated.into());
    };
    let migrated = migrate_local_to_user(context.local.as_ref(), context.repository())?;
    if migrated == 0 {
        output::info("Nothing to migrate.");
    } else {
        output::success(format!("Migrated {migrated} expenses to {user}"));
    }
    Ok(())
}
