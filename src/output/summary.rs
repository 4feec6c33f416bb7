use std::fmt::Write;

use comfy_table::Cell;

use crate::report::BackupReport;

use super::styling::{bright, bright_green, bright_yellow, dim};
use super::tables::{create_table, status_cell};

/// Prints a human-readable summary of the backup run to stdout.
///
/// Displays one row per category with its record count, pages fetched,
/// completeness, and the file it was written to (if any). A closing line
/// states whether the whole run was complete or lost data somewhere.
pub fn print_summary(report: &BackupReport) {
    println!("{}", render_summary(report));
}

fn render_summary(report: &BackupReport) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{}  {}",
        bright("📦"),
        bright("Backup summary").underlined()
    );
    let _ = writeln!(
        output,
        "{}",
        dim(format!(
            "User {} · collected {}",
            report.user_id,
            report.collected_at.format("%Y-%m-%d %H:%M UTC")
        ))
    );

    let mut table = create_table();
    table.set_header(vec!["Category", "Records", "Pages", "Status", "File"]);
    for (name, category) in &report.categories {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(category.records),
            Cell::new(category.pages),
            status_cell(category),
            Cell::new(category.file.as_deref().unwrap_or("-")),
        ]);
    }
    let _ = writeln!(output, "{table}");

    if report.is_complete() {
        let _ = writeln!(
            output,
            "{}",
            bright_green("All categories backed up completely ✓")
        );
    } else {
        let _ = writeln!(
            output,
            "{}",
            bright_yellow("Some categories are incomplete - see the status column")
        );
    }

    output
}
