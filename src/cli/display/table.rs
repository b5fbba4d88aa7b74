//! Table builder wrapper around comfy-table for consistent list display.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};

use crate::domain::models::LabelScores;

/// Create a standard list table with the given headers.
///
/// Uses the NOTHING preset (no borders) for a clean CLI aesthetic.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Label/score table in response order.
pub fn label_table(scores: &LabelScores) -> Table {
    let mut table = list_table(&["label", "score"]);
    for (label, score) in scores {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format!("{score:.4}")).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
