use uuid::Uuid;

use crate::cli::context::{CliContext, CommandError, CommandResult, ParsedArgs};
use crate::cli::output;
use crate::cli::commands::CommandDefinition;
use crate::core::format::format_day_label;
use crate::core::grouping::YearMonth;
use crate::core::services::ExpenseService;
use crate::domain::{parse_date, Category, NewExpense, CATEGORIES};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add",
            "Record an expense",
            "add <amount> <category> [item] [--date YYYY-MM-DD] [--note TEXT]",
            cmd_add,
        ),
        CommandDefinition::new(
            "list",
            "List a month of expenses grouped by day",
            "list [YYYY-MM]",
            cmd_list,
        ),
        CommandDefinition::new("remove", "Delete an expense by id", "remove <id>", cmd_remove),
    ]
}

fn cmd_add(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["date", "note"])?;
    let (amount, category, item) = match parsed.positional.as_slice() {
        [amount, category, item @ ..] => (*amount, *category, item.join(" ")),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: add <amount> <category> [item]".into(),
            ))
        }
    };

    let amount: f64 = amount
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{amount}` is not a number")))?;
    let category = Category::lookup(&category.to_lowercase()).ok_or_else(|| {
        let ids: Vec<&str> = CATEGORIES.iter().map(|info| info.id.as_str()).collect();
        CommandError::InvalidArguments(format!(
            "unknown category `{category}`, expected one of: {}",
            ids.join(", ")
        ))
    })?;
    let date = match parsed.flag("date") {
        Some(raw) => parse_date(raw)?,
        None => context.clock.today(),
    };

    let mut expense = NewExpense::new(amount, category, item, date);
    if let Some(note) = parsed.flag("note") {
        expense = expense.with_note(note);
    }
    let id = ExpenseService::add(context.repository(), expense)?;
    output::success(format!(
        "Recorded {} {} on {} ({id})",
        context.money(amount),
        category.info().label(),
        date
    ));
    Ok(())
}

fn cmd_list(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let month = match args.first() {
        Some(raw) => YearMonth::parse(raw)?,
        None => YearMonth::of(context.clock.today()),
    };
    let view = ExpenseService::month(context.repository(), month)?;

    output::section(format!("Expenses {}", view.month));
    if view.groups.is_empty() {
        output::warning("No expenses recorded this month.");
        return Ok(());
    }
    for group in &view.groups {
        output::info(format!(
            "{}  {}",
            format_day_label(group.date),
            context.money(group.total)
        ));
        for expense in &group.items {
            let note = if expense.note.is_empty() {
                String::new()
            } else {
                format!("  ({})", expense.note)
            };
            output::info(format!(
                "  {} {:<20} {:>14}{note}  {}",
                expense.category.info().emoji,
                expense.item,
                context.money(expense.amount),
                expense.id
            ));
        }
    }
    output::info(format!("Month total: {}", context.money(view.total)));
    Ok(())
}

fn cmd_remove(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: remove <id>".into()))?;
    let id = Uuid::parse_str(raw)
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not an expense id")))?;
    ExpenseService::remove(context.repository(), id)?;
    output::success(format!("Removed {id}"));
    Ok(())
}
