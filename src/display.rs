//! Row rendering for the `show_*` inspection paths.

use comfy_table::{presets::UTF8_FULL, Cell, Table};

use crate::session::Row;

/// Renders rows as a bordered table, columns in the given declared order.
/// Columns a row lacks render as `NULL`.
pub(crate) fn render_rows(columns: &[String], rows: &[Row]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(columns.iter().map(Cell::new));
    for row in rows {
        table.add_row(columns.iter().map(|column| {
            Cell::new(row.get(column).map(String::as_str).unwrap_or("NULL"))
        }));
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_values_in_declared_column_order() {
        let columns = vec!["ID".to_string(), "NAME".to_string()];
        let row: Row = [
            ("NAME".to_string(), "Ali".to_string()),
            ("ID".to_string(), "1".to_string()),
        ]
        .into_iter()
        .collect();
        let rendered = render_rows(&columns, &[row]);
        assert!(rendered.contains("ID"));
        assert!(rendered.contains("NAME"));
        assert!(rendered.contains("Ali"));
        let id_pos = rendered.find("ID").unwrap();
        let name_pos = rendered.find("NAME").unwrap();
        assert!(id_pos < name_pos);
    }

    #[test]
    fn missing_column_renders_null() {
        let columns = vec!["ID".to_string(), "AGE".to_string()];
        let row: Row = [("ID".to_string(), "1".to_string())].into_iter().collect();
        let rendered = render_rows(&columns, &[row]);
        assert!(rendered.contains("NULL"));
    }
}
