use crate::cli::commands::CommandDefinition;
use crate::cli::context::{CliContext, CommandError, CommandResult, ParsedArgs};
use crate::cli::output;
use crate::core::{
    charts::has_activity,
    period::{PeriodKind, PeriodRange},
    services::{AnalyticsReport, AnalyticsService},
};
use crate::domain::{parse_date, Displayable};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "summary",
            "Compare a period against the one before it",
            "summary [day|week|month|year] [--date YYYY-MM-DD] [--days N]",
            cmd_summary,
        ),
        CommandDefinition::new(
            "trend",
            "Daily totals over the trailing window (default from config)",
            "trend [--date YYYY-MM-DD] [--days N]",
            cmd_trend,
        ),
    ]
}

fn parse_days(raw: &str) -> Result<u32, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a day count")))
}

fn cmd_summary(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["date", "days"])?;
    let reference = match parsed.flag("date") {
        Some(raw) => parse_date(raw)?,
        None => context.clock.today(),
    };

    let report = match parsed.flag("days") {
        Some(raw) => {
            let range = PeriodRange::last_n_days(parse_days(raw)?, reference)?;
            AnalyticsService::report_for_range(context.repository(), PeriodKind::Day, range)?
        }
        None => {
            let kind = match parsed.positional.first() {
                Some(raw) => PeriodKind::parse(raw)?,
                None => context.config.default_period,
            };
            AnalyticsService::report(context.repository(), kind, reference)?
        }
    };
    render(context, &report);
    Ok(())
}

fn cmd_trend(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["date", "days"])?;
    if let Some(extra) = parsed.positional.first() {
        return Err(CommandError::InvalidArguments(format!(
            "unexpected argument `{extra}`"
        )));
    }
    let reference = match parsed.flag("date") {
        Some(raw) => parse_date(raw)?,
        None => context.clock.today(),
    };
    let days = match parsed.flag("days") {
        Some(raw) => parse_days(raw)?,
        None => context.config.trend_days,
    };

    let range = PeriodRange::last_n_days(days, reference)?;
    let report = AnalyticsService::report_for_range(context.repository(), PeriodKind::Day, range)?;
    output::section(format!("Last {} days {}", report.range.len_days(), report.range));
    for point in &report.trend {
        output::info(format!("  {:<6} {}", point.label, context.money(point.amount)));
    }
    output::info(format!(
        "  Total  {} ({})",
        context.money(report.snapshot.total_amount),
        output::change(report.snapshot.total_change)
    ));
    Ok(())
}

fn render(context: &CliContext, report: &AnalyticsReport) {
    let snapshot = &report.snapshot;
    output::section(format!("{} {}", report.kind, report.range));
    output::info(format!(
        "  Total        : {} ({} vs {})",
        context.money(snapshot.total_amount),
        output::change(snapshot.total_change),
        context.money(snapshot.previous_total)
    ));
    output::info(format!("  Transactions : {}", snapshot.transaction_count));
    output::info(format!(
        "  Average      : {}",
        context.money(snapshot.average_amount)
    ));
    if let Some(max) = &snapshot.max_expense {
        output::info(format!(
            "  Largest      : {} {}",
            context.money(max.amount),
            max.display_label()
        ));
    }

    if !report.bars.is_empty() {
        output::section("By category");
        for bar in &report.bars {
            let share = snapshot
                .category_stats
                .iter()
                .find(|stat| stat.name == bar.name)
                .map_or(0, |stat| stat.percentage);
            output::info(format!(
                "  {} {:<14} {:>14} {:>4}%  {}",
                bar.emoji,
                bar.name,
                context.money(bar.amount),
                share,
                output::change(bar.change)
            ));
        }
    }

    if has_activity(&report.trend) {
        output::section("Trend");
        for point in &report.trend {
            output::info(format!("  {:<6} {}", point.label, context.money(point.amount)));
        }
    }
}
