use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::formats::registry;

pub fn run() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Separator", "Header", "Detection"]);
    for entry in registry() {
        let separator = match entry.field_separator {
            Some('\t') => "tab".to_string(),
            Some(sep) => sep.to_string(),
            None => "auto".to_string(),
        };
        let detection = if entry.is_generic() {
            "fallback".to_string()
        } else {
            entry.detection_keywords.join(", ")
        };
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(entry.display_name),
            Cell::new(separator),
            Cell::new(if entry.has_header_row { "yes" } else { "no" }),
            Cell::new(detection),
        ]);
    }
    println!("Supported statement formats\n{table}");
    Ok(())
}
