use std::fmt;

use colored::Colorize;

pub fn section(title: impl fmt::Display) {
    println!("{}", format!("=== {} ===", title.to_string().trim()).bold());
}

pub fn info(message: impl fmt::Display) {
    println!("{message}");
}

pub fn success(message: impl fmt::Display) {
    println!("{}", message.to_string().green());
}

pub fn warning(message: impl fmt::Display) {
    println!("{}", message.to_string().yellow());
}

/// Green for spending decreases, red for increases.
pub fn change(change: i64) -> String {
    let text = crate::core::format::format_percent_change(change);
    match change {
        c if c > 0 => text.red().to_string(),
        c if c < 0 => text.green().to_string(),
        _ => text.dimmed().to_string(),
    }
}
