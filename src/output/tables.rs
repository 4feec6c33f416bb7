use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::report::CategoryReport;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn status_cell(category: &CategoryReport) -> Cell {
    if category.complete {
        Cell::new("complete").fg(TableColor::Green)
    } else {
        let text = match &category.error {
            Some(error) => format!("partial: {error}"),
            None => "partial".to_string(),
        };
        Cell::new(text).fg(TableColor::Yellow)
    }
}
